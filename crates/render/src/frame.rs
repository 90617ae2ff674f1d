//! Frame buffers and the display they are borrowed from.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use glam::Vec2;
use slingshot_common::{Canvas, Image, Paint};

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Image { image: Arc<Image>, origin: Vec2 },
    Line { from: Vec2, to: Vec2, paint: Paint },
    Circle { center: Vec2, radius: f32, paint: Paint },
    Text { text: String, origin: Vec2, paint: Paint },
}

/// A frame buffer that records drawing operations in paint order.
///
/// The display behind a [`Surface`] replays or rasterizes the list when the
/// frame is posted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text of every `Text` command, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for DisplayList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_image(&mut self, image: &Arc<Image>, origin: Vec2, _paint: &Paint) {
        self.commands.push(DrawCommand::Image {
            image: Arc::clone(image),
            origin,
        });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, paint: &Paint) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            paint: *paint,
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            paint: *paint,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Vec2, paint: &Paint) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            origin,
            paint: *paint,
        });
    }
}

/// The display system frames are borrowed from.
///
/// At most one frame is out at a time. Every frame handed out by
/// [`lock_frame`](Surface::lock_frame) must come back through
/// [`post_frame`](Surface::post_frame); use [`FrameLease`] to guarantee it.
pub trait Surface: Send + Sync {
    /// Take exclusive access to the next frame, or `None` if the display
    /// cannot hand one out right now.
    fn lock_frame(&self) -> Option<DisplayList>;

    /// Return a painted frame to the display for presentation.
    fn post_frame(&self, frame: DisplayList);
}

/// Scoped frame buffer: posts the frame back to its surface when dropped,
/// including during unwinding.
pub struct FrameLease<'a> {
    surface: &'a dyn Surface,
    frame: DisplayList,
}

impl<'a> FrameLease<'a> {
    pub fn acquire(surface: &'a dyn Surface) -> Option<Self> {
        let frame = surface.lock_frame()?;
        Some(Self { surface, frame })
    }
}

impl Deref for FrameLease<'_> {
    type Target = DisplayList;

    fn deref(&self) -> &DisplayList {
        &self.frame
    }
}

impl DerefMut for FrameLease<'_> {
    fn deref_mut(&mut self) -> &mut DisplayList {
        &mut self.frame
    }
}

impl Drop for FrameLease<'_> {
    fn drop(&mut self) {
        self.surface.post_frame(std::mem::take(&mut self.frame));
    }
}

#[derive(Debug, Default)]
struct HeadlessState {
    width: u32,
    height: u32,
    busy: bool,
    locked: bool,
    posted: u64,
    last: Option<DisplayList>,
}

/// In-memory display: keeps the most recently posted frame.
///
/// Used by the CLI and by tests; `set_busy` simulates a display that
/// refuses to hand out frames.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    state: Mutex<HeadlessState>,
    posted: Condvar,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: Mutex::new(HeadlessState {
                width,
                height,
                ..HeadlessState::default()
            }),
            posted: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_size(&self, width: u32, height: u32) {
        let mut state = self.lock();
        state.width = width;
        state.height = height;
    }

    pub fn set_busy(&self, busy: bool) {
        self.lock().busy = busy;
    }

    /// Number of frames posted so far.
    pub fn frames_posted(&self) -> u64 {
        self.lock().posted
    }

    /// Whether a frame is currently out and not yet posted.
    pub fn is_locked(&self) -> bool {
        self.lock().locked
    }

    pub fn last_frame(&self) -> Option<DisplayList> {
        self.lock().last.clone()
    }

    /// Block until at least `count` frames have been posted. Returns false
    /// on timeout.
    pub fn wait_for_frames(&self, count: u64, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        while state.posted < count {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                return false;
            };
            let (guard, _) = self
                .posted
                .wait_timeout(state, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
        true
    }
}

impl Surface for HeadlessSurface {
    fn lock_frame(&self) -> Option<DisplayList> {
        let mut state = self.lock();
        if state.busy || state.locked {
            return None;
        }
        state.locked = true;
        Some(DisplayList::new(state.width, state.height))
    }

    fn post_frame(&self, frame: DisplayList) {
        let mut state = self.lock();
        state.locked = false;
        state.posted += 1;
        state.last = Some(frame);
        drop(state);
        self.posted.notify_all();
    }
}
