use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Kind of raw pointer event delivered by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Press,
    Move,
    Release,
}

/// A raw pointer or touch event in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn press(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Press,
            position: Vec2::new(x, y),
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Move,
            position: Vec2::new(x, y),
        }
    }

    pub fn release(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Release,
            position: Vec2::new(x, y),
        }
    }
}

/// What a pointer event means for the slingshot.
///
/// The view consumes actions, never raw pointer events, so the drag rules
/// stay in one place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SlingAction {
    /// The pointer grabbed the mounted body.
    Grab,
    /// Move the mounted body here (already clamped to the drag radius).
    DragTo(Vec2),
    /// Fire the mounted body from the launcher anchor `origin`.
    Launch { origin: Vec2 },
    /// A release that was not a slingshot release.
    Tap(Vec2),
    /// Nothing to do.
    Noop,
}
