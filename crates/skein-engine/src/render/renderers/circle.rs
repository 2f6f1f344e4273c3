use crate::backend::{Backend, CanvasOps};
use crate::coords::{Rect, Vec2};
use crate::render::ctx::RenderContext;
use crate::render::error::RenderError;
use crate::scene::Element;

use super::{paint_options, shape_paint, Renderer, Scope};

/// `circle`: `cx`, `cy`, `r`; gradients get the bounding box as bounds.
#[derive(Debug, Default)]
pub struct CircleRenderer;

impl<B: Backend> Renderer<B> for CircleRenderer {
    fn render(&self, element: &Element, cx: &mut RenderContext<'_, B>) -> Result<Scope, RenderError> {
        let r = element.read();
        let center = Vec2::new(r.number("cx")?, r.number("cy")?);
        let radius = r.number("r")?;
        let options = paint_options(&r)?;

        let bounds = Rect::around_circle(center, radius);
        if let Some(paint) = shape_paint(cx.backend, element, &options, Some(bounds))? {
            cx.canvas.draw_circle(center, radius, &paint);
        }
        Ok(Scope::Leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::{Call, RecordingBackend, ShaderSpec};
    use crate::paint::{PaintStyle, StrokeCap};
    use crate::render::renderers::testing::{draw_calls, render_one};
    use crate::scene::build::{circle, linear_gradient, radial_gradient};

    #[test]
    fn stroked_circle() {
        let backend = RecordingBackend::new();
        let (res, canvas) = render_one(&CircleRenderer, &backend, &circle(50.0, 50.0, 25.0).stroke(4.0));
        res.unwrap();
        match draw_calls(&canvas).as_slice() {
            [Call::DrawCircle { center, radius, paint }] => {
                assert_eq!(*center, Vec2::new(50.0, 50.0));
                assert_eq!(*radius, 25.0);
                assert_eq!(paint.style, PaintStyle::Stroke);
                assert_eq!(paint.stroke_width, 4.0);
                assert_eq!(paint.cap, StrokeCap::Round);
            }
            other => panic!("unexpected calls {other:?}"),
        }
    }

    #[test]
    fn radial_gradient_center_stays_absolute() {
        let backend = RecordingBackend::new();
        let el = circle(50.0, 50.0, 25.0).child(radial_gradient(Vec2::new(50.0, 50.0), 25.0, &["white", "black"]));
        let (res, canvas) = render_one(&CircleRenderer, &backend, &el);
        res.unwrap();
        match canvas.draws().next().and_then(Call::paint).and_then(|p| p.shader.clone()) {
            Some(ShaderSpec::Radial { center, .. }) => assert_eq!(center, Vec2::new(50.0, 50.0)),
            other => panic!("unexpected shader {other:?}"),
        }
    }

    #[test]
    fn linear_gradient_uses_bounding_box_origin() {
        let backend = RecordingBackend::new();
        let el = circle(50.0, 50.0, 25.0).child(linear_gradient(Vec2::zero(), Vec2::new(50.0, 0.0), &["white", "black"]));
        let (res, canvas) = render_one(&CircleRenderer, &backend, &el);
        res.unwrap();
        match canvas.draws().next().and_then(Call::paint).and_then(|p| p.shader.clone()) {
            Some(ShaderSpec::Linear { start, .. }) => assert_eq!(start, Vec2::new(25.0, 25.0)),
            other => panic!("unexpected shader {other:?}"),
        }
    }
}
