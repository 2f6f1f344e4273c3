use crate::backend::{Backend, CanvasOps};
use crate::coords::Rect;
use crate::render::ctx::RenderContext;
use crate::render::error::RenderError;
use crate::scene::Element;

use super::{paint_options, shape_paint, Renderer, Scope};

/// `rect`: `x`, `y`, `width`, `height`; gradients are bounds-relative.
#[derive(Debug, Default)]
pub struct RectRenderer;

impl<B: Backend> Renderer<B> for RectRenderer {
    fn render(&self, element: &Element, cx: &mut RenderContext<'_, B>) -> Result<Scope, RenderError> {
        let r = element.read();
        let rect = Rect::new(r.number("x")?, r.number("y")?, r.number("width")?, r.number("height")?);
        let options = paint_options(&r)?;

        if let Some(paint) = shape_paint(cx.backend, element, &options, Some(rect))? {
            cx.canvas.draw_rect(rect, &paint);
        }
        Ok(Scope::Leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::{Call, RecordingBackend, ShaderSpec};
    use crate::coords::Vec2;
    use crate::paint::{Color, PaintStyle};
    use crate::render::renderers::testing::{draw_calls, render_one};
    use crate::scene::build::{linear_gradient, rect};

    #[test]
    fn draws_filled_rect_and_releases_paint() {
        let backend = RecordingBackend::new();
        let (res, canvas) = render_one(&RectRenderer, &backend, &rect(1.0, 2.0, 3.0, 4.0).color("#ff0000"));
        assert_eq!(res.unwrap(), Scope::Leaf);

        match draw_calls(&canvas).as_slice() {
            [Call::DrawRect { rect, paint }] => {
                assert_eq!(*rect, Rect::new(1.0, 2.0, 3.0, 4.0));
                assert_eq!(paint.color, Some(Color::rgba(1.0, 0.0, 0.0, 1.0)));
                assert_eq!(paint.style, PaintStyle::Fill);
            }
            other => panic!("unexpected calls {other:?}"),
        }
        assert_eq!(backend.live_transients(), 0);
    }

    #[test]
    fn gradient_start_is_offset_by_rect_origin() {
        let backend = RecordingBackend::new();
        let el = rect(10.0, 10.0, 100.0, 50.0)
            .child(linear_gradient(Vec2::zero(), Vec2::new(100.0, 50.0), &["red", "blue"]));
        let (res, canvas) = render_one(&RectRenderer, &backend, &el);
        res.unwrap();

        let paint = canvas.draws().next().and_then(Call::paint).unwrap();
        assert_eq!(paint.color, None);
        match &paint.shader {
            Some(ShaderSpec::Linear { start, end, .. }) => {
                assert_eq!(*start, Vec2::new(10.0, 10.0));
                assert_eq!(*end, Vec2::new(110.0, 60.0));
            }
            other => panic!("unexpected shader {other:?}"),
        }
        assert_eq!(backend.live_transients(), 0);
    }

    #[test]
    fn missing_geometry_is_an_error() {
        let backend = RecordingBackend::new();
        let el = Element::new("rect").prop("x", 0.0);
        let (res, canvas) = render_one(&RectRenderer, &backend, &el);
        assert!(matches!(res, Err(RenderError::InvalidProps(_))));
        assert!(canvas.calls().is_empty());
    }
}
