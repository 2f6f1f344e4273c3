//! Font loading and CPU text rasterization.
//!
//! Text is rasterized into a straight-alpha RGBA bitmap which the text
//! renderer turns into a backend image. Layout is single-line, left aligned,
//! top baseline box.

mod font_system;
mod raster;

pub use font_system::{FontId, FontLoadError, FontSystem};
pub use raster::{rasterize_text, TextBitmap, TextRasterError, TEXT_PADDING};
