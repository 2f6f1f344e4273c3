//! Coordinate and geometry types shared by the scene model, renderers and backends.
//!
//! Canonical space:
//! - Logical pixels (the backend canvas applies the device pixel ratio)
//! - Origin top-left
//! - +X right, +Y down

mod matrix;
mod rect;
mod vec2;

pub use matrix::Matrix;
pub use rect::Rect;
pub use vec2::Vec2;
