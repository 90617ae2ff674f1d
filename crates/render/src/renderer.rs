use std::fmt::Write as _;
use std::sync::Arc;

use glam::Vec2;
use slingshot_common::{BodyId, Canvas, Image, LayoutConfig};
use slingshot_kernel::{BodyHandle, GameStatus, Viewport};

use crate::frame::{DisplayList, DrawCommand};

/// Errors from painting a single frame. Never fatal to the render loop.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("viewport has no area")]
    EmptyViewport,
    #[error("paint panicked: {0}")]
    Panicked(String),
    #[error("failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Immutable copy of everything one frame needs.
///
/// Taken under the scene lock, then painted without it, so a frame never
/// observes a half-applied scene mutation.
#[derive(Debug, Clone, Default)]
pub struct FrameSnapshot {
    pub status: GameStatus,
    pub viewport: Viewport,
    pub background: Option<Arc<Image>>,
    /// Paint order.
    pub bodies: Vec<BodyHandle>,
    pub mounted: Option<BodyId>,
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads a snapshot and draws it. It never mutates the scene;
/// scene truth is owned by the game surface.
pub trait Renderer {
    fn render(&self, frame: &FrameSnapshot, canvas: &mut dyn Canvas) -> Result<(), RenderError>;
}

/// Paints the slingshot scene: background, bodies with the launcher
/// connectors around the mounted one, and the WIN/LOSS banner.
#[derive(Debug, Clone, Default)]
pub struct SceneRenderer {
    config: LayoutConfig,
}

impl SceneRenderer {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }
}

impl Renderer for SceneRenderer {
    fn render(&self, frame: &FrameSnapshot, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
        let viewport = frame.viewport;
        if viewport.is_empty() {
            return Err(RenderError::EmptyViewport);
        }
        let paint = self.config.stroke_paint();

        if let Some(background) = &frame.background {
            canvas.draw_image(background, Vec2::ZERO, &paint);
        }

        let [fork_back, fork_front] = viewport.fork_anchors(&self.config);
        for handle in &frame.bodies {
            let body = handle.lock();
            if frame.mounted == Some(handle.id()) {
                // Connectors wrap the body: one stroke under it, one over it.
                let pouch = body.position()
                    - Vec2::new(body.width() * self.config.connector_offset, 0.0);
                canvas.draw_line(fork_back, pouch, &paint);
                body.draw(canvas, &paint);
                canvas.draw_line(fork_front, pouch, &paint);
            } else {
                body.draw(canvas, &paint);
            }
        }

        if let Some(banner) = frame.status.banner() {
            let overlay = self.config.overlay_paint(viewport.width, viewport.height);
            canvas.draw_text(banner, viewport.banner_origin(&self.config), &overlay);
        }
        Ok(())
    }
}

/// Debug text renderer for display lists.
///
/// Produces a human-readable listing of a posted frame. Useful for CLI
/// output, logging, and testing what the scene renderer drew.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn describe(&self, frame: &DisplayList) -> String {
        let (width, height) = frame.size();
        let mut out = format!(
            "=== Frame {width}x{height} ({} commands) ===\n",
            frame.commands().len()
        );
        for command in frame.commands() {
            // Writing into a String cannot fail.
            let _ = match command {
                DrawCommand::Image { image, origin } => writeln!(
                    out,
                    "  image {}x{} at ({:.1}, {:.1})",
                    image.width(),
                    image.height(),
                    origin.x,
                    origin.y
                ),
                DrawCommand::Line { from, to, paint } => writeln!(
                    out,
                    "  line ({:.1}, {:.1}) -> ({:.1}, {:.1}) width={:.0}",
                    from.x, from.y, to.x, to.y, paint.stroke_width
                ),
                DrawCommand::Circle {
                    center, radius, ..
                } => writeln!(
                    out,
                    "  circle ({:.1}, {:.1}) r={:.1}",
                    center.x, center.y, radius
                ),
                DrawCommand::Text {
                    text,
                    origin,
                    paint,
                } => writeln!(
                    out,
                    "  text {text:?} at ({:.1}, {:.1}) size={:.0}",
                    origin.x, origin.y, paint.text_size
                ),
            };
        }
        out
    }
}
