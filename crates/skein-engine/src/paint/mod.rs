//! Paint model shared between the scene, the renderers and the backends.
//!
//! Scope:
//! - color representation (straight-alpha sRGB) and CSS color parsing
//! - paint style, stroke cap/join, tile modes
//! - gradient and color-matrix parameters
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod filter;
pub mod gradient;
pub mod style;

pub use color::Color;
pub use filter::ColorMatrix;
pub use gradient::{GradientSpec, LinearGradientSpec, RadialGradientSpec};
pub use style::{PaintOptions, PaintStyle, StrokeCap, StrokeJoin, TileMode};
