//! Graphics backend capability interface.
//!
//! The renderers never touch a rasterizer directly; they go through these
//! traits. Every native handle is an owned value and dropping it releases the
//! underlying resource, so paints, shaders, filters, paths and images are freed
//! on every exit path of a draw.
//!
//! Implementations:
//! - `raster`: CPU rasterizer on `tiny-skia` (production)
//! - `recording`: records canvas calls and live handles (tests, inspection)

pub mod raster;
pub mod recording;

use crate::coords::{Matrix, Rect, Vec2};
use crate::paint::{Color, ColorMatrix, PaintStyle, StrokeCap, StrokeJoin, TileMode};
use crate::path::PathData;

/// Factories for native drawing resources.
///
/// Factories return `None` when the native allocation fails; callers log and
/// degrade instead of aborting the frame.
pub trait Backend: Sized + 'static {
    type Paint: PaintOps<Self>;
    type Path;
    type Shader;
    type ImageFilter;
    type Image: ImageOps;
    type Canvas: CanvasOps<Self>;

    fn new_paint(&self) -> Option<Self::Paint>;

    fn make_linear_gradient(
        &self,
        start: Vec2,
        end: Vec2,
        colors: &[Color],
        positions: Option<&[f32]>,
        mode: TileMode,
    ) -> Option<Self::Shader>;

    fn make_radial_gradient(
        &self,
        center: Vec2,
        radius: f32,
        colors: &[Color],
        positions: Option<&[f32]>,
        mode: TileMode,
    ) -> Option<Self::Shader>;

    /// Gaussian blur with independent sigmas (logical pixels).
    fn make_blur_filter(&self, sigma_x: f32, sigma_y: f32, mode: TileMode) -> Option<Self::ImageFilter>;

    fn make_color_matrix_filter(&self, matrix: &ColorMatrix) -> Option<Self::ImageFilter>;

    fn make_path(&self, data: &PathData) -> Option<Self::Path>;

    /// Builds an image from tightly packed straight-alpha RGBA8 pixels.
    fn make_image(&self, width: u32, height: u32, rgba: &[u8]) -> Option<Self::Image>;
}

/// Mutable paint state.
///
/// A fresh paint is opaque black, fill style, stroke width 1, no shader and no
/// filter.
pub trait PaintOps<B: Backend> {
    fn set_color(&mut self, color: Color);
    /// Replaces the alpha of the paint color; also modulates an attached shader.
    fn set_alpha(&mut self, alpha: f32);
    fn set_style(&mut self, style: PaintStyle);
    fn set_stroke_width(&mut self, width: f32);
    fn set_stroke_cap(&mut self, cap: StrokeCap);
    fn set_stroke_join(&mut self, join: StrokeJoin);
    fn set_anti_alias(&mut self, aa: bool);
    /// Attaches `shader`. The paint keeps what it needs; the caller may drop
    /// the shader right after.
    fn set_shader(&mut self, shader: &B::Shader);
    fn set_image_filter(&mut self, filter: &B::ImageFilter);
}

pub trait ImageOps {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

/// Drawing surface with a save/restore stack.
///
/// The stack starts at count 1. `save` and `save_layer` return the count before
/// the push, suitable for `restore_to_count`.
pub trait CanvasOps<B: Backend> {
    fn clear(&mut self, color: Color);

    fn save(&mut self) -> usize;

    /// Pushes an offscreen layer; on restore the layer is filtered and
    /// composited using `paint`'s alpha and image filter.
    fn save_layer(&mut self, paint: Option<&B::Paint>) -> usize;

    /// Pops one entry; a no-op on an empty stack.
    fn restore(&mut self);

    fn restore_to_count(&mut self, count: usize) {
        let count = count.max(1);
        while self.save_count() > count {
            self.restore();
        }
    }

    fn save_count(&self) -> usize;

    /// Pre-multiplies the current transform by `matrix`.
    fn concat(&mut self, matrix: &Matrix);

    fn draw_rect(&mut self, rect: Rect, paint: &B::Paint);

    fn draw_circle(&mut self, center: Vec2, radius: f32, paint: &B::Paint);

    fn draw_path(&mut self, path: &B::Path, paint: &B::Paint);

    /// Draws the `src` region of `image` scaled into `dst`.
    fn draw_image_rect(&mut self, image: &B::Image, src: Rect, dst: Rect, paint: &B::Paint);

    fn flush(&mut self);

    /// Device pixel ratio the canvas was created for, when it knows one.
    fn pixel_ratio(&self) -> Option<f32> {
        None
    }
}
