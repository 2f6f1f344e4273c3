use crate::backend::Backend;

/// Per-pass context handed to every renderer.
pub struct RenderContext<'a, B: Backend> {
    pub backend: &'a B,
    pub canvas: &'a mut B::Canvas,
    /// Device pixel ratio of `canvas`.
    pub pixel_ratio: f32,
}

impl<'a, B: Backend> RenderContext<'a, B> {
    #[inline]
    pub fn new(backend: &'a B, canvas: &'a mut B::Canvas, pixel_ratio: f32) -> Self {
        Self {
            backend,
            canvas,
            pixel_ratio,
        }
    }
}
