use crate::coords::{Rect, Vec2};

/// One path command in absolute coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PathVerb {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo(Vec2, Vec2),
    CubicTo(Vec2, Vec2, Vec2),
    Close,
}

/// A sequence of path commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    verbs: Vec<PathVerb>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn verbs(&self) -> &[PathVerb] {
        &self.verbs
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    pub fn move_to(&mut self, p: Vec2) -> &mut Self {
        self.verbs.push(PathVerb::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Vec2) -> &mut Self {
        self.verbs.push(PathVerb::LineTo(p));
        self
    }

    pub fn quad_to(&mut self, c: Vec2, p: Vec2) -> &mut Self {
        self.verbs.push(PathVerb::QuadTo(c, p));
        self
    }

    pub fn cubic_to(&mut self, c1: Vec2, c2: Vec2, p: Vec2) -> &mut Self {
        self.verbs.push(PathVerb::CubicTo(c1, c2, p));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.verbs.push(PathVerb::Close);
        self
    }

    /// Bounding box of all points, including control points.
    pub fn control_bounds(&self) -> Option<Rect> {
        let mut points = self.verbs.iter().flat_map(|v| match *v {
            PathVerb::MoveTo(p) | PathVerb::LineTo(p) => vec![p],
            PathVerb::QuadTo(c, p) => vec![c, p],
            PathVerb::CubicTo(c1, c2, p) => vec![c1, c2, p],
            PathVerb::Close => Vec::new(),
        });

        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| {
            (
                Vec2::new(min.x.min(p.x), min.y.min(p.y)),
                Vec2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some(Rect::from_origin_size(min, max - min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_records_verbs_in_order() {
        let mut p = PathData::new();
        p.move_to(Vec2::new(0.0, 0.0)).line_to(Vec2::new(10.0, 0.0)).close();
        assert_eq!(
            p.verbs(),
            &[
                PathVerb::MoveTo(Vec2::new(0.0, 0.0)),
                PathVerb::LineTo(Vec2::new(10.0, 0.0)),
                PathVerb::Close,
            ]
        );
    }

    #[test]
    fn control_bounds_covers_control_points() {
        let mut p = PathData::new();
        p.move_to(Vec2::new(0.0, 0.0))
            .quad_to(Vec2::new(5.0, -10.0), Vec2::new(10.0, 0.0));
        assert_eq!(p.control_bounds(), Some(Rect::new(0.0, -10.0, 10.0, 10.0)));
        assert_eq!(PathData::new().control_bounds(), None);
    }
}
