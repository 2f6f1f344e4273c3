use crate::coords::Vec2;

use super::{Color, TileMode};

/// Linear gradient parameters.
///
/// `start` and `end` are in whatever space the producer chose; the gradient
/// resolver translates shape-relative coordinates before a shader is built.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradientSpec {
    pub start: Vec2,
    pub end: Vec2,
    pub colors: Vec<Color>,
    pub positions: Option<Vec<f32>>,
    pub mode: TileMode,
}

impl LinearGradientSpec {
    /// Returns the same gradient with both endpoints moved by `offset`.
    pub fn offset_by(&self, offset: Vec2) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
            ..self.clone()
        }
    }
}

/// Radial gradient parameters. `center` is always absolute.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradientSpec {
    pub center: Vec2,
    pub radius: f32,
    pub colors: Vec<Color>,
    pub positions: Option<Vec<f32>>,
    pub mode: TileMode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GradientSpec {
    Linear(LinearGradientSpec),
    Radial(RadialGradientSpec),
}

/// Reason a position list cannot be used as-is.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GradientIssue {
    NoColors,
    LengthMismatch { colors: usize, positions: usize },
    Decreasing { index: usize },
    OpenStart,
    OpenEnd,
    NonFinite,
}

/// Checks a gradient position list against its colors.
///
/// Positions must match the color count, be finite and non-decreasing, and
/// span exactly `0..=1`.
pub fn validate_positions(colors: usize, positions: &[f32]) -> Result<(), GradientIssue> {
    if colors == 0 {
        return Err(GradientIssue::NoColors);
    }
    if positions.len() != colors {
        return Err(GradientIssue::LengthMismatch { colors, positions: positions.len() });
    }
    if !positions.iter().all(|p| p.is_finite()) {
        return Err(GradientIssue::NonFinite);
    }
    if let Some(index) = positions.windows(2).position(|w| w[1] < w[0]) {
        return Err(GradientIssue::Decreasing { index: index + 1 });
    }
    if positions.first().copied() != Some(0.0) {
        return Err(GradientIssue::OpenStart);
    }
    if positions.last().copied() != Some(1.0) {
        return Err(GradientIssue::OpenEnd);
    }
    Ok(())
}

/// Returns `positions` when valid, otherwise logs the issue and returns `None`
/// so the backend spaces the colors evenly.
pub fn checked_positions(colors: usize, positions: Option<&[f32]>) -> Option<Vec<f32>> {
    let positions = positions?;
    match validate_positions(colors, positions) {
        Ok(()) => Some(positions.to_vec()),
        Err(issue) => {
            log::warn!("ignoring gradient positions {positions:?}: {issue:?}");
            None
        }
    }
}

/// Evenly spaced stop offsets for `count` colors.
pub fn even_positions(count: usize) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        n => (0..n).map(|i| i as f32 / (n - 1) as f32).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_positions_pass() {
        assert_eq!(validate_positions(3, &[0.0, 0.5, 1.0]), Ok(()));
        assert_eq!(validate_positions(2, &[0.0, 1.0]), Ok(()));
        assert_eq!(validate_positions(3, &[0.0, 0.0, 1.0]), Ok(()));
    }

    #[test]
    fn invalid_positions_are_reported() {
        assert_eq!(
            validate_positions(3, &[0.0, 1.0]),
            Err(GradientIssue::LengthMismatch { colors: 3, positions: 2 })
        );
        assert_eq!(validate_positions(3, &[0.0, 0.7, 0.5]), Err(GradientIssue::Decreasing { index: 2 }));
        assert_eq!(validate_positions(2, &[0.1, 1.0]), Err(GradientIssue::OpenStart));
        assert_eq!(validate_positions(2, &[0.0, 0.9]), Err(GradientIssue::OpenEnd));
        assert_eq!(validate_positions(0, &[]), Err(GradientIssue::NoColors));
    }

    #[test]
    fn checked_positions_drops_invalid_lists() {
        assert_eq!(checked_positions(2, Some(&[0.0, 1.0])), Some(vec![0.0, 1.0]));
        assert_eq!(checked_positions(2, Some(&[0.5, 0.2])), None);
        assert_eq!(checked_positions(2, None), None);
    }

    #[test]
    fn even_positions_span_unit_interval() {
        assert_eq!(even_positions(3), vec![0.0, 0.5, 1.0]);
        assert_eq!(even_positions(1), vec![0.0]);
    }

    #[test]
    fn offset_moves_both_endpoints() {
        let g = LinearGradientSpec {
            start: Vec2::new(0.0, 0.0),
            end: Vec2::new(100.0, 0.0),
            colors: vec![Color::BLACK, Color::WHITE],
            positions: None,
            mode: TileMode::Clamp,
        };
        let moved = g.offset_by(Vec2::new(10.0, 10.0));
        assert_eq!(moved.start, Vec2::new(10.0, 10.0));
        assert_eq!(moved.end, Vec2::new(110.0, 10.0));
    }
}
