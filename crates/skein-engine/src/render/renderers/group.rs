use crate::backend::{Backend, CanvasOps, PaintOps};
use crate::coords::Matrix;
use crate::render::ctx::RenderContext;
use crate::render::error::RenderError;
use crate::scene::Element;

use super::{Renderer, Scope};

/// `group`: optional `transform` (6 or 9 numbers) and `opacity` (default 1).
///
/// Opacity below 1 composites the children through one offscreen layer so
/// overlapping children do not double-blend.
#[derive(Debug, Default)]
pub struct GroupRenderer;

impl<B: Backend> Renderer<B> for GroupRenderer {
    fn render(&self, element: &Element, cx: &mut RenderContext<'_, B>) -> Result<Scope, RenderError> {
        let r = element.read();
        let transform = match r.opt_numbers("transform")? {
            Some(values) => {
                let m = Matrix::from_slice(values);
                if m.is_none() {
                    log::warn!("<group> ignoring transform with {} values", values.len());
                }
                m
            }
            None => None,
        };
        let opacity = r.number_or("opacity", 1.0)?.clamp(0.0, 1.0);

        let count = cx.canvas.save();
        if let Some(m) = transform {
            cx.canvas.concat(&m);
        }
        if opacity < 1.0 {
            match cx.backend.new_paint() {
                Some(mut paint) => {
                    paint.set_alpha(opacity);
                    cx.canvas.save_layer(Some(&paint));
                }
                None => log::error!("<group> opacity layer skipped: paint allocation failed"),
            }
        }
        Ok(Scope::Restore(count))
    }
}
