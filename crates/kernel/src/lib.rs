//! Slingshot Kernel: the scene the view paints, the game status machine, and
//! the readiness barrier that gates access until the surface exists.
//!
//! # Invariants
//! - A mounted body is always a member of the scene.
//! - Status only moves along the legal transitions of [`GameStatus::apply`].
//! - Geometry is meaningless until the status leaves `NotReady`.

pub mod body;
pub mod gate;
pub mod scene;
pub mod status;
pub mod viewport;

pub use body::{Body, BodyHandle, DiscBody};
pub use gate::ReadinessGate;
pub use scene::SceneState;
pub use status::{GameStatus, StatusError, StatusTransition};
pub use viewport::Viewport;
