//! Slingshot Surface: the game view that ties scene, input, rendering and
//! external game logic together.
//!
//! # Invariants
//! - Scene and status mutations flow through [`GameSurface`] operations.
//! - The render thread only ever reads an immutable per-frame snapshot.
//! - Listeners are invoked with no internal lock held.

pub mod game_surface;
pub mod listener;

pub use game_surface::{GameSurface, SurfaceError};
pub use listener::{
    CreatedListener, DestroyedListener, EventChannel, GameEvent, LaunchListener, ResumedListener,
    TapListener,
};

pub fn crate_info() -> &'static str {
    concat!("slingshot-surface v", env!("CARGO_PKG_VERSION"))
}
