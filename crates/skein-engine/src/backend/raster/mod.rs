//! CPU backend on `tiny-skia`.
//!
//! Scope:
//! - paints, gradient shaders, paths and images as tiny-skia values
//! - a canvas with a save/layer stack; blur and color-matrix filters run when a
//!   layer is restored
//! - device pixel ratio applied through the root transform

mod canvas;
mod filter;
mod paint;

use std::cell::Cell;

use tiny_skia::{GradientStop, IntSize, LinearGradient, PathBuilder, Pixmap, Point, RadialGradient, Shader, SpreadMode, Transform};

use crate::coords::Vec2;
use crate::paint::gradient::even_positions;
use crate::paint::{Color, ColorMatrix, TileMode};
use crate::path::{PathData, PathVerb};

use super::Backend;

pub use canvas::RasterCanvas;
pub use filter::{apply_color_matrix, gaussian_blur};
pub use paint::{RasterFilter, RasterImage, RasterPaint};

/// Path geometry built from [`PathData`].
#[derive(Debug, Clone)]
pub struct RasterPath {
    path: tiny_skia::Path,
}

#[derive(Debug, Default)]
pub struct RasterBackend {
    decal_warned: Cell<bool>,
}

impl RasterBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas sized for `width × height` logical pixels at `pixel_ratio`.
    pub fn canvas(&self, width: f32, height: f32, pixel_ratio: f32) -> Option<RasterCanvas> {
        let w = (width * pixel_ratio).ceil().max(1.0) as u32;
        let h = (height * pixel_ratio).ceil().max(1.0) as u32;
        RasterCanvas::new(w, h, pixel_ratio)
    }

    fn spread(&self, mode: TileMode) -> SpreadMode {
        match mode {
            TileMode::Clamp => SpreadMode::Pad,
            TileMode::Repeat => SpreadMode::Repeat,
            TileMode::Mirror => SpreadMode::Reflect,
            TileMode::Decal => {
                if !self.decal_warned.replace(true) {
                    log::warn!("decal tile mode is not supported by the raster backend; clamping");
                }
                SpreadMode::Pad
            }
        }
    }

    fn stops(colors: &[Color], positions: Option<&[f32]>) -> Vec<GradientStop> {
        let even;
        let positions: &[f32] = match positions {
            Some(p) if p.len() == colors.len() => p,
            _ => {
                even = even_positions(colors.len());
                &even[..]
            }
        };
        colors
            .iter()
            .zip(positions)
            .map(|(c, p)| GradientStop::new(*p, paint::to_skia_color(*c)))
            .collect()
    }
}

#[inline]
fn point(v: Vec2) -> Point {
    Point::from_xy(v.x, v.y)
}

impl Backend for RasterBackend {
    type Paint = RasterPaint;
    type Path = RasterPath;
    type Shader = Shader<'static>;
    type ImageFilter = RasterFilter;
    type Image = RasterImage;
    type Canvas = RasterCanvas;

    fn new_paint(&self) -> Option<RasterPaint> {
        Some(RasterPaint::default())
    }

    fn make_linear_gradient(
        &self,
        start: Vec2,
        end: Vec2,
        colors: &[Color],
        positions: Option<&[f32]>,
        mode: TileMode,
    ) -> Option<Shader<'static>> {
        if colors.is_empty() {
            return None;
        }
        LinearGradient::new(
            point(start),
            point(end),
            Self::stops(colors, positions),
            self.spread(mode),
            Transform::identity(),
        )
    }

    fn make_radial_gradient(
        &self,
        center: Vec2,
        radius: f32,
        colors: &[Color],
        positions: Option<&[f32]>,
        mode: TileMode,
    ) -> Option<Shader<'static>> {
        if colors.is_empty() || !radius.is_finite() || radius <= 0.0 {
            return None;
        }
        RadialGradient::new(
            point(center),
            point(center),
            radius,
            Self::stops(colors, positions),
            self.spread(mode),
            Transform::identity(),
        )
    }

    fn make_blur_filter(&self, sigma_x: f32, sigma_y: f32, mode: TileMode) -> Option<RasterFilter> {
        if !sigma_x.is_finite() || !sigma_y.is_finite() {
            return None;
        }
        if mode != TileMode::Clamp {
            log::debug!("blur tile mode {mode:?} treated as clamp");
        }
        Some(RasterFilter::Blur {
            sigma_x: sigma_x.max(0.0),
            sigma_y: sigma_y.max(0.0),
        })
    }

    fn make_color_matrix_filter(&self, matrix: &ColorMatrix) -> Option<RasterFilter> {
        Some(RasterFilter::ColorMatrix(*matrix))
    }

    fn make_path(&self, data: &PathData) -> Option<RasterPath> {
        let mut pb = PathBuilder::new();
        for verb in data.verbs() {
            match *verb {
                PathVerb::MoveTo(p) => pb.move_to(p.x, p.y),
                PathVerb::LineTo(p) => pb.line_to(p.x, p.y),
                PathVerb::QuadTo(c, p) => pb.quad_to(c.x, c.y, p.x, p.y),
                PathVerb::CubicTo(c1, c2, p) => pb.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
                PathVerb::Close => pb.close(),
            }
        }
        pb.finish().map(|path| RasterPath { path })
    }

    fn make_image(&self, width: u32, height: u32, rgba: &[u8]) -> Option<RasterImage> {
        if rgba.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        let pixels: &[[u8; 4]] = bytemuck::cast_slice(rgba);
        let mut data = Vec::with_capacity(rgba.len());
        for &[r, g, b, a] in pixels {
            let premul = |v: u8| ((v as u16 * a as u16 + 127) / 255) as u8;
            data.extend_from_slice(&[premul(r), premul(g), premul(b), a]);
        }
        let pixmap = Pixmap::from_vec(data, IntSize::from_wh(width, height)?)?;
        Some(RasterImage { pixmap })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CanvasOps, PaintOps};
    use crate::coords::{Matrix, Rect};
    use crate::paint::PaintStyle;

    fn pixel(canvas: &RasterCanvas, x: u32, y: u32) -> [u8; 4] {
        let c = canvas.pixmap().pixel(x, y).unwrap();
        [c.red(), c.green(), c.blue(), c.alpha()]
    }

    fn solid(backend: &RasterBackend, color: Color) -> RasterPaint {
        let mut p = backend.new_paint().unwrap();
        p.set_color(color);
        p
    }

    // ── primitives ────────────────────────────────────────────────────────

    #[test]
    fn clear_and_fill_rect() {
        let backend = RasterBackend::new();
        let mut canvas = backend.canvas(10.0, 10.0, 1.0).unwrap();
        canvas.clear(Color::WHITE);
        canvas.draw_rect(Rect::new(0.0, 0.0, 5.0, 10.0), &solid(&backend, Color::rgba(1.0, 0.0, 0.0, 1.0)));

        assert_eq!(pixel(&canvas, 2, 5), [255, 0, 0, 255]);
        assert_eq!(pixel(&canvas, 7, 5), [255, 255, 255, 255]);
    }

    #[test]
    fn pixel_ratio_scales_geometry() {
        let backend = RasterBackend::new();
        let mut canvas = backend.canvas(10.0, 10.0, 2.0).unwrap();
        assert_eq!(canvas.width(), 20);
        assert_eq!(canvas.pixel_ratio(), Some(2.0));
        canvas.draw_rect(Rect::new(0.0, 0.0, 5.0, 5.0), &solid(&backend, Color::BLACK));
        assert_eq!(pixel(&canvas, 9, 9)[3], 255);
        assert_eq!(pixel(&canvas, 11, 11)[3], 0);
    }

    #[test]
    fn stroke_leaves_interior_empty() {
        let backend = RasterBackend::new();
        let mut canvas = backend.canvas(20.0, 20.0, 1.0).unwrap();
        let mut paint = solid(&backend, Color::BLACK);
        paint.set_style(PaintStyle::Stroke);
        paint.set_stroke_width(2.0);
        canvas.draw_circle(Vec2::new(10.0, 10.0), 8.0, &paint);

        assert_eq!(pixel(&canvas, 10, 10)[3], 0);
        assert!(pixel(&canvas, 18, 10)[3] > 0);
    }

    #[test]
    fn concat_translates_subsequent_draws() {
        let backend = RasterBackend::new();
        let mut canvas = backend.canvas(10.0, 10.0, 1.0).unwrap();
        let n = canvas.save();
        canvas.concat(&Matrix::translate(5.0, 0.0));
        canvas.draw_rect(Rect::new(0.0, 0.0, 2.0, 2.0), &solid(&backend, Color::BLACK));
        canvas.restore_to_count(n);
        canvas.draw_rect(Rect::new(0.0, 8.0, 2.0, 2.0), &solid(&backend, Color::BLACK));

        assert_eq!(pixel(&canvas, 0, 0)[3], 0);
        assert_eq!(pixel(&canvas, 6, 1)[3], 255);
        assert_eq!(pixel(&canvas, 1, 9)[3], 255);
    }

    #[test]
    fn path_fill_covers_triangle() {
        let backend = RasterBackend::new();
        let mut canvas = backend.canvas(10.0, 10.0, 1.0).unwrap();
        let data = PathData::from_svg("M0 0 L10 0 L0 10 Z").unwrap();
        let path = backend.make_path(&data).unwrap();
        canvas.draw_path(&path, &solid(&backend, Color::BLACK));

        assert_eq!(pixel(&canvas, 1, 1)[3], 255);
        assert_eq!(pixel(&canvas, 9, 9)[3], 0);
    }

    // ── shaders ───────────────────────────────────────────────────────────

    #[test]
    fn linear_gradient_runs_between_colors() {
        let backend = RasterBackend::new();
        let mut canvas = backend.canvas(100.0, 1.0, 1.0).unwrap();
        let shader = backend
            .make_linear_gradient(
                Vec2::new(0.0, 0.0),
                Vec2::new(100.0, 0.0),
                &[Color::rgba(1.0, 0.0, 0.0, 1.0), Color::rgba(0.0, 0.0, 1.0, 1.0)],
                None,
                TileMode::Clamp,
            )
            .unwrap();
        let mut paint = backend.new_paint().unwrap();
        paint.set_shader(&shader);
        drop(shader);
        canvas.draw_rect(Rect::new(0.0, 0.0, 100.0, 1.0), &paint);

        let left = pixel(&canvas, 1, 0);
        let right = pixel(&canvas, 98, 0);
        assert!(left[0] > 200 && left[2] < 50);
        assert!(right[2] > 200 && right[0] < 50);
    }

    #[test]
    fn decal_falls_back_to_clamp() {
        let backend = RasterBackend::new();
        let shader = backend.make_radial_gradient(
            Vec2::new(5.0, 5.0),
            5.0,
            &[Color::WHITE, Color::BLACK],
            Some(&[0.0, 1.0]),
            TileMode::Decal,
        );
        assert!(shader.is_some());
        assert!(backend.decal_warned.get());
    }

    // ── layers ────────────────────────────────────────────────────────────

    #[test]
    fn layer_opacity_applies_on_restore() {
        let backend = RasterBackend::new();
        let mut canvas = backend.canvas(4.0, 4.0, 1.0).unwrap();
        let mut layer_paint = backend.new_paint().unwrap();
        layer_paint.set_alpha(0.5);

        let n = canvas.save_layer(Some(&layer_paint));
        canvas.draw_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &solid(&backend, Color::BLACK));
        // Not composited yet.
        assert_eq!(pixel(&canvas, 1, 1)[3], 0);
        canvas.restore_to_count(n);

        let a = pixel(&canvas, 1, 1)[3];
        assert!((120..=135).contains(&a), "alpha {a}");
    }

    #[test]
    fn blur_layer_softens_edges() {
        let backend = RasterBackend::new();
        let mut canvas = backend.canvas(20.0, 20.0, 1.0).unwrap();
        let filter = backend.make_blur_filter(3.0, 3.0, TileMode::Clamp).unwrap();
        let mut layer_paint = backend.new_paint().unwrap();
        layer_paint.set_image_filter(&filter);

        canvas.save_layer(Some(&layer_paint));
        canvas.draw_rect(Rect::new(5.0, 5.0, 10.0, 10.0), &solid(&backend, Color::BLACK));
        canvas.flush();

        assert!(pixel(&canvas, 3, 10)[3] > 0);
        assert!(pixel(&canvas, 5, 10)[3] < 255);
        assert_eq!(canvas.save_count(), 1);
    }

    // ── images ────────────────────────────────────────────────────────────

    #[test]
    fn make_image_premultiplies_and_draws() {
        let backend = RasterBackend::new();
        let image = backend.make_image(1, 1, &[255, 0, 0, 128]).unwrap();
        let px = image.pixmap().pixel(0, 0).unwrap();
        assert_eq!((px.red(), px.alpha()), (128, 128));

        let opaque = backend.make_image(2, 2, &[0, 255, 0, 255].repeat(4)).unwrap();
        let mut canvas = backend.canvas(8.0, 8.0, 1.0).unwrap();
        let paint = backend.new_paint().unwrap();
        canvas.draw_image_rect(&opaque, Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(0.0, 0.0, 8.0, 8.0), &paint);
        assert_eq!(pixel(&canvas, 4, 4), [0, 255, 0, 255]);
    }

    #[test]
    fn make_image_rejects_wrong_length() {
        assert!(RasterBackend::new().make_image(2, 2, &[0; 4]).is_none());
    }
}
