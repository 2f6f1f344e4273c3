use crate::backend::{Backend, CanvasOps, PaintOps};
use crate::paint::TileMode;
use crate::render::ctx::RenderContext;
use crate::render::error::RenderError;
use crate::scene::Element;

use super::{Renderer, Scope};

/// `blur`: gaussian blur of its children with sigma `blur` on both axes.
#[derive(Debug, Default)]
pub struct BlurRenderer;

impl<B: Backend> Renderer<B> for BlurRenderer {
    fn render(&self, element: &Element, cx: &mut RenderContext<'_, B>) -> Result<Scope, RenderError> {
        let sigma = element.read().number_or("blur", 0.0)?;

        let count = cx.canvas.save();
        let Some(filter) = cx.backend.make_blur_filter(sigma, sigma, TileMode::Clamp) else {
            log::error!("<blur> filter creation failed for sigma {sigma}; drawing children unfiltered");
            return Ok(Scope::Restore(count));
        };
        let Some(mut paint) = cx.backend.new_paint() else {
            log::error!("<blur> paint allocation failed; drawing children unfiltered");
            return Ok(Scope::Restore(count));
        };
        paint.set_image_filter(&filter);
        cx.canvas.save_layer(Some(&paint));
        Ok(Scope::Restore(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::{Call, FailureModes, FilterSpec, RecordingBackend};
    use crate::render::renderers::testing::render_one;
    use crate::scene::build::blur;

    #[test]
    fn pushes_filtered_layer() {
        let backend = RecordingBackend::new();
        let (res, canvas) = render_one(&BlurRenderer, &backend, &blur(4.0));
        assert_eq!(res.unwrap(), Scope::Restore(1));
        match canvas.calls() {
            [Call::Save, Call::SaveLayer(Some(paint))] => assert_eq!(
                paint.filter,
                Some(FilterSpec::Blur { sigma_x: 4.0, sigma_y: 4.0, mode: TileMode::Clamp })
            ),
            other => panic!("unexpected calls {other:?}"),
        }
        assert_eq!(backend.live_transients(), 0);
    }

    #[test]
    fn filter_failure_skips_layer() {
        let backend = RecordingBackend::new();
        backend.set_failures(FailureModes { filters: true, ..Default::default() });
        let (res, canvas) = render_one(&BlurRenderer, &backend, &blur(4.0));
        assert_eq!(res.unwrap(), Scope::Restore(1));
        assert_eq!(canvas.calls(), &[Call::Save]);
    }
}
