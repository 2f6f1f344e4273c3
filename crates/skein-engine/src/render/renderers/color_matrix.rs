use crate::backend::{Backend, CanvasOps, PaintOps};
use crate::paint::ColorMatrix;
use crate::render::ctx::RenderContext;
use crate::render::error::RenderError;
use crate::scene::Element;

use super::{Renderer, Scope};

/// `color-matrix`: applies a 4×5 `matrix` (20 numbers) to its children.
#[derive(Debug, Default)]
pub struct ColorMatrixRenderer;

impl<B: Backend> Renderer<B> for ColorMatrixRenderer {
    fn render(&self, element: &Element, cx: &mut RenderContext<'_, B>) -> Result<Scope, RenderError> {
        let values = element.read().numbers("matrix")?;
        let matrix = ColorMatrix::from_slice(values);

        let count = cx.canvas.save();
        let Some(matrix) = matrix else {
            log::warn!("<color-matrix> needs 20 finite values, got {}; drawing children unfiltered", values.len());
            return Ok(Scope::Restore(count));
        };
        let filter = cx.backend.make_color_matrix_filter(&matrix);
        match (filter, cx.backend.new_paint()) {
            (Some(filter), Some(mut paint)) => {
                paint.set_image_filter(&filter);
                cx.canvas.save_layer(Some(&paint));
            }
            _ => log::error!("<color-matrix> filter or paint allocation failed; drawing children unfiltered"),
        }
        Ok(Scope::Restore(count))
    }
}
