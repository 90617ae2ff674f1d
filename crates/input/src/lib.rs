//! Slingshot input: raw pointer events mapped to slingshot actions.
//!
//! # Invariants
//! - A drag only starts on a press inside the mounted body.
//! - A dragged body never leaves the drag radius around the launcher anchor.
//! - Every release is either a launch or a tap, never both.

pub mod action;
pub mod drag;

pub use action::{PointerEvent, PointerKind, SlingAction};
pub use drag::{DragSession, MountedTarget, clamp_to_radius};

pub fn crate_info() -> &'static str {
    concat!("slingshot-input v", env!("CARGO_PKG_VERSION"))
}
