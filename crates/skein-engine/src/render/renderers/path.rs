use std::borrow::Cow;

use crate::backend::{Backend, CanvasOps};
use crate::path::PathData;
use crate::render::ctx::RenderContext;
use crate::render::error::RenderError;
use crate::render::factory::create_paint;
use crate::render::gradient::apply_gradient_from_children;
use crate::scene::{Element, PropValue};

use super::{paint_options, Renderer, Scope};

/// `path`: SVG path string (parsed per draw) or shared [`PathData`].
///
/// The paint always carries the color; a gradient child is applied on top
/// without bounds, so its coordinates are absolute.
#[derive(Debug, Default)]
pub struct PathRenderer;

impl<B: Backend> Renderer<B> for PathRenderer {
    fn render(&self, element: &Element, cx: &mut RenderContext<'_, B>) -> Result<Scope, RenderError> {
        let r = element.read();
        let options = paint_options(&r)?;
        let data: Cow<'_, PathData> = match r.raw("path") {
            Some(PropValue::Str(d)) => match PathData::from_svg(d) {
                Ok(parsed) => Cow::Owned(parsed),
                Err(e) => {
                    log::error!("<path> invalid path data {d:?}: {e}");
                    return Ok(Scope::Leaf);
                }
            },
            Some(PropValue::Path(shared)) => Cow::Borrowed(shared.as_ref()),
            Some(other) => return Err(r.mistyped("path", "path string or path data", other).into()),
            None => return Err(r.missing("path").into()),
        };

        let Some(mut paint) = create_paint(cx.backend, &options) else {
            return Ok(Scope::Leaf);
        };
        apply_gradient_from_children(cx.backend, element, &mut paint, None)?;

        match cx.backend.make_path(&data) {
            Some(path) => cx.canvas.draw_path(&path, &paint),
            None => log::warn!("<path> backend could not build path ({} verbs)", data.verbs().len()),
        }
        Ok(Scope::Leaf)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend::recording::{Call, RecordingBackend, ShaderSpec};
    use crate::coords::Vec2;
    use crate::paint::Color;
    use crate::render::renderers::testing::{draw_calls, render_one};
    use crate::scene::build::{linear_gradient, path, path_data};

    #[test]
    fn string_path_is_parsed_and_released() {
        let backend = RecordingBackend::new();
        let (res, canvas) = render_one(&PathRenderer, &backend, &path("M0 0 L10 0 L10 10 Z").color("#00ff00"));
        res.unwrap();
        match draw_calls(&canvas).as_slice() {
            [Call::DrawPath { path, paint }] => {
                assert_eq!(path.verbs().len(), 4);
                assert_eq!(paint.color, Some(Color::rgba(0.0, 1.0, 0.0, 1.0)));
            }
            other => panic!("unexpected calls {other:?}"),
        }
        assert_eq!(backend.live_paths(), 0);
        assert_eq!(backend.live_paints(), 0);
    }

    #[test]
    fn shared_path_is_borrowed() {
        let backend = RecordingBackend::new();
        let mut data = PathData::new();
        data.move_to(Vec2::zero()).line_to(Vec2::new(5.0, 5.0));
        let shared = Arc::new(data);

        let el = path_data(shared.clone());
        let (res, canvas) = render_one(&PathRenderer, &backend, &el);
        res.unwrap();
        assert_eq!(canvas.draws().count(), 1);
        assert_eq!(Arc::strong_count(&shared), 2);
    }

    #[test]
    fn gradient_on_path_is_not_offset() {
        let backend = RecordingBackend::new();
        let el = path("M10 10 L50 10 L50 50 Z")
            .child(linear_gradient(Vec2::new(10.0, 10.0), Vec2::new(50.0, 50.0), &["red", "blue"]));
        let (res, canvas) = render_one(&PathRenderer, &backend, &el);
        res.unwrap();
        let paint = canvas.draws().next().and_then(Call::paint).unwrap();
        assert!(paint.color.is_some());
        match &paint.shader {
            Some(ShaderSpec::Linear { start, .. }) => assert_eq!(*start, Vec2::new(10.0, 10.0)),
            other => panic!("unexpected shader {other:?}"),
        }
    }

    #[test]
    fn invalid_path_data_is_skipped() {
        let backend = RecordingBackend::new();
        let (res, canvas) = render_one(&PathRenderer, &backend, &path("Q oops"));
        assert_eq!(res.unwrap(), Scope::Leaf);
        assert_eq!(canvas.draws().count(), 0);
    }
}
