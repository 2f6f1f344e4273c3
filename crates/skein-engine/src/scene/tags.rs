//! Tag names understood by the default renderers.

pub const RECT: &str = "rect";
pub const CIRCLE: &str = "circle";
pub const PATH: &str = "path";
pub const TEXT: &str = "text";
pub const IMAGE: &str = "image";
pub const GROUP: &str = "group";
pub const BLUR: &str = "blur";
pub const COLOR_MATRIX: &str = "color-matrix";
pub const LINEAR_GRADIENT: &str = "linear-gradient";
pub const RADIAL_GRADIENT: &str = "radial-gradient";

/// Primitives that draw and terminate; the walker never descends into their
/// children (gradient children are consumed by the primitive itself).
pub const LEAF_PRIMITIVES: [&str; 4] = [RECT, CIRCLE, PATH, TEXT];

#[inline]
pub fn is_leaf_primitive(tag: &str) -> bool {
    LEAF_PRIMITIVES.contains(&tag)
}

#[inline]
pub fn is_gradient(tag: &str) -> bool {
    tag == LINEAR_GRADIENT || tag == RADIAL_GRADIENT
}
