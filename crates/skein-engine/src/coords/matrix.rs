use super::Vec2;

/// 2D affine transform.
///
/// Layout follows the first two rows of a row-major 3×3 matrix:
///
/// ```text
/// | sx kx tx |
/// | ky sy ty |
/// |  0  0  1 |
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix {
    pub sx: f32,
    pub kx: f32,
    pub tx: f32,
    pub ky: f32,
    pub sy: f32,
    pub ty: f32,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix { sx: 1.0, kx: 0.0, tx: 0.0, ky: 0.0, sy: 1.0, ty: 0.0 };

    #[inline]
    pub const fn translate(tx: f32, ty: f32) -> Self {
        Matrix { tx, ty, ..Self::IDENTITY }
    }

    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Matrix { sx, sy, ..Self::IDENTITY }
    }

    /// Rotation by `degrees` about the origin.
    pub fn rotate(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Matrix { sx: cos, kx: -sin, tx: 0.0, ky: sin, sy: cos, ty: 0.0 }
    }

    /// Rotation by `degrees` about `pivot`.
    pub fn rotate_about(degrees: f32, pivot: Vec2) -> Self {
        Matrix::translate(pivot.x, pivot.y)
            .concat(&Matrix::rotate(degrees))
            .concat(&Matrix::translate(-pivot.x, -pivot.y))
    }

    /// Builds a matrix from 6 (`[sx, kx, tx, ky, sy, ty]`) or 9 (row-major 3×3) numbers.
    ///
    /// The perspective row of a 9-number matrix is not supported; a non-identity
    /// row is ignored with a warning. Any other length returns `None`.
    pub fn from_slice(values: &[f32]) -> Option<Self> {
        if !values.iter().all(|v| v.is_finite()) {
            return None;
        }
        match values.len() {
            6 | 9 => {
                if values.len() == 9 && (values[6] != 0.0 || values[7] != 0.0 || values[8] != 1.0) {
                    log::warn!("perspective transforms are not supported; ignoring row {:?}", &values[6..]);
                }
                Some(Matrix {
                    sx: values[0],
                    kx: values[1],
                    tx: values[2],
                    ky: values[3],
                    sy: values[4],
                    ty: values[5],
                })
            }
            _ => None,
        }
    }

    /// Returns `self × other` (apply `other` first, then `self`).
    pub fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            sx: self.sx * other.sx + self.kx * other.ky,
            kx: self.sx * other.kx + self.kx * other.sy,
            tx: self.sx * other.tx + self.kx * other.ty + self.tx,
            ky: self.ky * other.sx + self.sy * other.ky,
            sy: self.ky * other.kx + self.sy * other.sy,
            ty: self.ky * other.tx + self.sy * other.ty + self.ty,
        }
    }

    #[inline]
    pub fn map_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.sx * p.x + self.kx * p.y + self.tx,
            self.ky * p.x + self.sy * p.y + self.ty,
        )
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}
