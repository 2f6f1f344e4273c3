/// 4×5 row-major color matrix applied to straight-alpha RGBA in `[0, 1]`.
///
/// Each output channel is `m[0]*r + m[1]*g + m[2]*b + m[3]*a + m[4]`; the
/// fifth column is an offset in the same normalized range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorMatrix(pub [f32; 20]);

impl ColorMatrix {
    pub const IDENTITY: ColorMatrix = ColorMatrix([
        1.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]);

    /// Luminance-preserving grayscale (Rec. 709 weights).
    pub const GRAYSCALE: ColorMatrix = ColorMatrix([
        0.2126, 0.7152, 0.0722, 0.0, 0.0, //
        0.2126, 0.7152, 0.0722, 0.0, 0.0, //
        0.2126, 0.7152, 0.0722, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]);

    /// Builds a matrix from a flat list of exactly 20 finite numbers.
    pub fn from_slice(values: &[f32]) -> Option<Self> {
        if values.len() != 20 || !values.iter().all(|v| v.is_finite()) {
            return None;
        }
        let mut m = [0.0; 20];
        m.copy_from_slice(values);
        Some(ColorMatrix(m))
    }

    /// Applies the matrix to one straight-alpha pixel.
    #[inline]
    pub fn apply(&self, [r, g, b, a]: [f32; 4]) -> [f32; 4] {
        let m = &self.0;
        let row = |i: usize| {
            (m[i] * r + m[i + 1] * g + m[i + 2] * b + m[i + 3] * a + m[i + 4]).clamp(0.0, 1.0)
        };
        [row(0), row(5), row(10), row(15)]
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_noop() {
        let px = [0.2, 0.4, 0.6, 0.8];
        assert_eq!(ColorMatrix::IDENTITY.apply(px), px);
    }

    #[test]
    fn grayscale_equalizes_channels() {
        let [r, g, b, a] = ColorMatrix::GRAYSCALE.apply([1.0, 0.0, 0.0, 1.0]);
        assert!((r - 0.2126).abs() < 1e-6);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 1.0);
    }

    #[test]
    fn from_slice_requires_twenty_values() {
        assert!(ColorMatrix::from_slice(&[0.0; 19]).is_none());
        assert_eq!(ColorMatrix::from_slice(&ColorMatrix::IDENTITY.0), Some(ColorMatrix::IDENTITY));
    }
}
