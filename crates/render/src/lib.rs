//! Rendering Adapter: renderer-agnostic scene painting and the render loop.
//!
//! # Invariants
//! - Renderers cannot mutate scene truth; they paint immutable snapshots.
//! - Every leased frame buffer is posted back, on success, error and panic.
//! - A failed frame never stops the loop; only an explicit stop does.

mod frame;
mod render_loop;
mod renderer;

pub use frame::{DisplayList, DrawCommand, FrameLease, HeadlessSurface, Surface};
pub use render_loop::{FrameOutcome, RenderLoop, SceneSource, paint_frame};
pub use renderer::{DebugTextRenderer, FrameSnapshot, RenderError, Renderer, SceneRenderer};

pub fn crate_info() -> &'static str {
    concat!("slingshot-render v", env!("CARGO_PKG_VERSION"))
}
