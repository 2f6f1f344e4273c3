use tiny_skia::{FillRule, LineCap, LineJoin, Pixmap, Shader, Stroke};

use crate::paint::{Color, ColorMatrix, PaintStyle, StrokeCap, StrokeJoin};

use super::super::{ImageOps, PaintOps};
use super::RasterBackend;

/// Converts a straight-alpha color to tiny-skia's color type.
#[inline]
pub(crate) fn to_skia_color(c: Color) -> tiny_skia::Color {
    let [r, g, b, a] = c.to_rgba8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

/// Image filter applied when a layer is restored.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterFilter {
    Blur { sigma_x: f32, sigma_y: f32 },
    ColorMatrix(ColorMatrix),
}

/// Premultiplied pixel buffer.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub(crate) pixmap: Pixmap,
}

impl RasterImage {
    #[inline]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

impl ImageOps for RasterImage {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }
}

/// Paint state resolved into tiny-skia types at draw time.
#[derive(Debug, Clone)]
pub struct RasterPaint {
    pub(crate) color: Color,
    pub(crate) style: PaintStyle,
    pub(crate) stroke_width: f32,
    pub(crate) cap: StrokeCap,
    pub(crate) join: StrokeJoin,
    pub(crate) anti_alias: bool,
    pub(crate) shader: Option<Shader<'static>>,
    pub(crate) filter: Option<RasterFilter>,
}

impl Default for RasterPaint {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            style: PaintStyle::Fill,
            stroke_width: 1.0,
            cap: StrokeCap::Butt,
            join: StrokeJoin::Miter,
            anti_alias: false,
            shader: None,
            filter: None,
        }
    }
}

impl RasterPaint {
    #[inline]
    pub(crate) fn alpha(&self) -> f32 {
        self.color.a.clamp(0.0, 1.0)
    }

    /// Builds the tiny-skia paint. A shader takes precedence over the color and
    /// is modulated by the color's alpha.
    pub(crate) fn to_skia(&self) -> tiny_skia::Paint<'static> {
        let mut paint = tiny_skia::Paint {
            anti_alias: self.anti_alias,
            ..Default::default()
        };
        match &self.shader {
            Some(shader) => {
                let mut shader = shader.clone();
                if self.alpha() < 1.0 {
                    shader.apply_opacity(self.alpha());
                }
                paint.shader = shader;
            }
            None => paint.set_color(to_skia_color(self.color)),
        }
        paint
    }

    pub(crate) fn stroke(&self) -> Stroke {
        Stroke {
            width: self.stroke_width.max(0.0),
            line_cap: match self.cap {
                StrokeCap::Butt => LineCap::Butt,
                StrokeCap::Round => LineCap::Round,
                StrokeCap::Square => LineCap::Square,
            },
            line_join: match self.join {
                StrokeJoin::Miter => LineJoin::Miter,
                StrokeJoin::Round => LineJoin::Round,
                StrokeJoin::Bevel => LineJoin::Bevel,
            },
            ..Default::default()
        }
    }

    #[inline]
    pub(crate) fn fill_rule(&self) -> FillRule {
        FillRule::Winding
    }
}

impl PaintOps<RasterBackend> for RasterPaint {
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.color = self.color.with_alpha(alpha);
    }

    fn set_style(&mut self, style: PaintStyle) {
        self.style = style;
    }

    fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = width;
    }

    fn set_stroke_cap(&mut self, cap: StrokeCap) {
        self.cap = cap;
    }

    fn set_stroke_join(&mut self, join: StrokeJoin) {
        self.join = join;
    }

    fn set_anti_alias(&mut self, aa: bool) {
        self.anti_alias = aa;
    }

    fn set_shader(&mut self, shader: &Shader<'static>) {
        self.shader = Some(shader.clone());
    }

    fn set_image_filter(&mut self, filter: &RasterFilter) {
        self.filter = Some(filter.clone());
    }
}
