//! Shared types for the slingshot view.
//!
//! # Invariants
//! - Geometry constants are viewport fractions, never pixels.
//! - Types here carry no threading or lifecycle behavior.

pub mod canvas;
pub mod config;
pub mod image;
pub mod types;

pub use canvas::Canvas;
pub use config::{ConfigError, LayoutConfig};
pub use image::Image;
pub use types::{BodyId, Paint, ParseColorError, Rgba, StrokeCap, TextAlign};
