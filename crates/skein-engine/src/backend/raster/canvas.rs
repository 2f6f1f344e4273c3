use tiny_skia::{FilterQuality, Pattern, Pixmap, PixmapPaint, SpreadMode, Transform};

use crate::coords::{Matrix, Rect, Vec2};
use crate::paint::{Color, PaintStyle};

use super::super::CanvasOps;
use super::filter::{apply_color_matrix, gaussian_blur};
use super::paint::{to_skia_color, RasterFilter, RasterImage, RasterPaint};
use super::{RasterBackend, RasterPath};

/// Offscreen layer opened by `save_layer`.
#[derive(Debug)]
struct Layer {
    pixmap: Pixmap,
    opacity: f32,
    filter: Option<RasterFilter>,
    /// Device-space scale at the time the layer was opened.
    scale: f32,
}

#[derive(Debug)]
struct SaveRecord {
    transform: Transform,
    layer: Option<Layer>,
}

/// Canvas rasterizing into a device-resolution [`Pixmap`].
///
/// Drawing coordinates are logical pixels; the initial transform scales them
/// by the device pixel ratio.
#[derive(Debug)]
pub struct RasterCanvas {
    base: Pixmap,
    stack: Vec<SaveRecord>,
    transform: Transform,
    root: Transform,
}

impl RasterCanvas {
    /// Creates a canvas of `width × height` device pixels.
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Option<Self> {
        let base = Pixmap::new(width, height)?;
        let root = Transform::from_scale(pixel_ratio, pixel_ratio);
        Some(Self {
            base,
            stack: Vec::new(),
            transform: root,
            root,
        })
    }

    /// The composited frame (premultiplied RGBA8).
    ///
    /// Open layers are not included until they are restored.
    #[inline]
    pub fn pixmap(&self) -> &Pixmap {
        &self.base
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.base
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.base.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.base.height()
    }

    /// Drops any open save/layer state and resets the transform.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.transform = self.root;
    }

    fn target(&mut self) -> &mut Pixmap {
        match self.stack.iter_mut().rev().find_map(|r| r.layer.as_mut()) {
            Some(layer) => &mut layer.pixmap,
            None => &mut self.base,
        }
    }

    fn device_scale(&self) -> f32 {
        let t = self.transform;
        (t.sx * t.sy - t.kx * t.ky).abs().sqrt()
    }

    fn fill_or_stroke(&mut self, path: &tiny_skia::Path, paint: &RasterPaint) {
        let skia = paint.to_skia();
        let transform = self.transform;
        match paint.style {
            PaintStyle::Fill => {
                self.target().fill_path(path, &skia, paint.fill_rule(), transform, None);
            }
            PaintStyle::Stroke => {
                let stroke = paint.stroke();
                self.target().stroke_path(path, &skia, &stroke, transform, None);
            }
        }
    }

    fn composite(&mut self, mut layer: Layer) {
        match &layer.filter {
            Some(RasterFilter::Blur { sigma_x, sigma_y }) => {
                gaussian_blur(&mut layer.pixmap, sigma_x * layer.scale, sigma_y * layer.scale)
            }
            Some(RasterFilter::ColorMatrix(m)) => apply_color_matrix(&mut layer.pixmap, m),
            None => {}
        }
        let paint = PixmapPaint {
            opacity: layer.opacity,
            quality: FilterQuality::Nearest,
            ..Default::default()
        };
        self.target()
            .draw_pixmap(0, 0, layer.pixmap.as_ref(), &paint, Transform::identity(), None);
    }
}

#[inline]
pub(crate) fn to_skia_transform(m: &Matrix) -> Transform {
    Transform::from_row(m.sx, m.ky, m.kx, m.sy, m.tx, m.ty)
}

#[inline]
fn to_skia_rect(r: Rect) -> Option<tiny_skia::Rect> {
    let r = r.normalized();
    tiny_skia::Rect::from_xywh(r.x(), r.y(), r.width(), r.height())
}

impl CanvasOps<RasterBackend> for RasterCanvas {
    fn clear(&mut self, color: Color) {
        self.target().fill(to_skia_color(color));
    }

    fn save(&mut self) -> usize {
        let count = self.save_count();
        self.stack.push(SaveRecord { transform: self.transform, layer: None });
        count
    }

    fn save_layer(&mut self, paint: Option<&RasterPaint>) -> usize {
        let count = self.save_count();
        let layer = Pixmap::new(self.base.width(), self.base.height()).map(|pixmap| Layer {
            pixmap,
            opacity: paint.map_or(1.0, RasterPaint::alpha),
            filter: paint.and_then(|p| p.filter.clone()),
            scale: self.device_scale(),
        });
        if layer.is_none() {
            log::warn!("layer allocation failed; drawing children without a layer");
        }
        self.stack.push(SaveRecord { transform: self.transform, layer });
        count
    }

    fn restore(&mut self) {
        let Some(record) = self.stack.pop() else { return };
        self.transform = record.transform;
        if let Some(layer) = record.layer {
            self.composite(layer);
        }
    }

    fn save_count(&self) -> usize {
        self.stack.len() + 1
    }

    fn pixel_ratio(&self) -> Option<f32> {
        Some(self.root.sx)
    }

    fn concat(&mut self, matrix: &Matrix) {
        self.transform = self.transform.pre_concat(to_skia_transform(matrix));
    }

    fn draw_rect(&mut self, rect: Rect, paint: &RasterPaint) {
        let Some(r) = to_skia_rect(rect) else { return };
        match paint.style {
            PaintStyle::Fill => {
                let skia = paint.to_skia();
                let transform = self.transform;
                self.target().fill_rect(r, &skia, transform, None);
            }
            PaintStyle::Stroke => {
                let path = tiny_skia::PathBuilder::from_rect(r);
                self.fill_or_stroke(&path, paint);
            }
        }
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, paint: &RasterPaint) {
        if let Some(path) = tiny_skia::PathBuilder::from_circle(center.x, center.y, radius) {
            self.fill_or_stroke(&path, paint);
        }
    }

    fn draw_path(&mut self, path: &RasterPath, paint: &RasterPaint) {
        self.fill_or_stroke(&path.path, paint);
    }

    fn draw_image_rect(&mut self, image: &RasterImage, src: Rect, dst: Rect, paint: &RasterPaint) {
        let src = src.normalized();
        let dst = dst.normalized();
        if src.is_empty() || dst.is_empty() {
            return;
        }
        let Some(dst_rect) = to_skia_rect(dst) else { return };

        let sx = dst.width() / src.width();
        let sy = dst.height() / src.height();
        let image_to_dst = Transform::from_row(sx, 0.0, 0.0, sy, dst.x() - src.x() * sx, dst.y() - src.y() * sy);
        let pattern = Pattern::new(
            image.pixmap.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Bilinear,
            paint.alpha(),
            image_to_dst,
        );
        let skia = tiny_skia::Paint {
            shader: pattern,
            anti_alias: paint.anti_alias,
            ..Default::default()
        };
        let transform = self.transform;
        self.target().fill_rect(dst_rect, &skia, transform, None);
    }

    fn flush(&mut self) {
        // Rasterization is immediate; close anything left open so the base
        // pixmap holds the whole frame.
        while !self.stack.is_empty() {
            self.restore();
        }
    }
}
