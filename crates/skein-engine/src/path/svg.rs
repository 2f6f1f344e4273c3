//! SVG path data (`d` attribute) parsed with `kurbo`.
//!
//! kurbo resolves relative and smooth commands and turns elliptical arcs into
//! cubics, so every segment maps directly onto a [`PathVerb`].

use kurbo::{BezPath, PathEl, Point};
use thiserror::Error;

use crate::coords::Vec2;

use super::{PathData, PathVerb};

/// Error produced while parsing SVG path data.
#[derive(Debug, Error)]
pub enum PathParseError {
    #[error("malformed path data: {0}")]
    Syntax(#[from] kurbo::SvgParseError),
    #[error("path data must start with a move command")]
    MissingMoveTo,
}

impl PathData {
    /// Parses SVG path data such as `"M10 10 L90 10 Q50 60 10 10 Z"`.
    ///
    /// Empty input yields an empty path.
    pub fn from_svg(d: &str) -> Result<PathData, PathParseError> {
        let d = d.trim();
        if d.is_empty() {
            return Ok(PathData::new());
        }
        if !d.starts_with(['M', 'm']) {
            return Err(PathParseError::MissingMoveTo);
        }
        let bez = BezPath::from_svg(d)?;
        Ok(PathData::from(&bez))
    }
}

#[inline]
fn vec2(p: Point) -> Vec2 {
    Vec2::new(p.x as f32, p.y as f32)
}

impl From<&BezPath> for PathData {
    fn from(bez: &BezPath) -> Self {
        let mut out = PathData::new();
        for el in bez.elements() {
            match *el {
                PathEl::MoveTo(p) => out.move_to(vec2(p)),
                PathEl::LineTo(p) => out.line_to(vec2(p)),
                PathEl::QuadTo(c, p) => out.quad_to(vec2(c), vec2(p)),
                PathEl::CurveTo(c1, c2, p) => out.cubic_to(vec2(c1), vec2(c2), vec2(p)),
                PathEl::ClosePath => out.close(),
            };
        }
        out
    }
}

impl From<&PathData> for BezPath {
    fn from(data: &PathData) -> Self {
        let pt = |v: Vec2| Point::new(v.x as f64, v.y as f64);
        let mut bez = BezPath::new();
        for verb in data.verbs() {
            bez.push(match *verb {
                PathVerb::MoveTo(p) => PathEl::MoveTo(pt(p)),
                PathVerb::LineTo(p) => PathEl::LineTo(pt(p)),
                PathVerb::QuadTo(c, p) => PathEl::QuadTo(pt(c), pt(p)),
                PathVerb::CubicTo(c1, c2, p) => PathEl::CurveTo(pt(c1), pt(c2), pt(p)),
                PathVerb::Close => PathEl::ClosePath,
            });
        }
        bez
    }
}
