use super::Color;

/// Fill vs. stroke geometry coverage.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum PaintStyle {
    #[default]
    Fill,
    Stroke,
}

impl PaintStyle {
    /// Parses a `style` prop; anything other than `"stroke"` fills.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("stroke") { PaintStyle::Stroke } else { PaintStyle::Fill }
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Gradient behavior outside the `[0, 1]` range.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum TileMode {
    /// Extend the edge colors.
    #[default]
    Clamp,
    /// Repeat the pattern.
    Repeat,
    /// Mirror-repeat the pattern.
    Mirror,
    /// Transparent outside the gradient.
    Decal,
}

impl TileMode {
    /// Parses a `mode` prop. Unknown values clamp.
    pub fn parse(s: &str) -> Self {
        match s {
            "repeat" => TileMode::Repeat,
            "mirror" => TileMode::Mirror,
            "decal" => TileMode::Decal,
            _ => TileMode::Clamp,
        }
    }
}

/// Inputs to paint construction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PaintOptions {
    pub color: Color,
    pub style: PaintStyle,
    pub stroke_width: f32,
}

impl PaintOptions {
    #[inline]
    pub fn new(color: Color, style: PaintStyle, stroke_width: f32) -> Self {
        Self { color, style, stroke_width }
    }
}

impl Default for PaintOptions {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            style: PaintStyle::Fill,
            stroke_width: 1.0,
        }
    }
}
