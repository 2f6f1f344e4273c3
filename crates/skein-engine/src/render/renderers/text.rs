use std::rc::Rc;

use thiserror::Error;

use crate::backend::{Backend, CanvasOps};
use crate::coords::Rect;
use crate::paint::{Color, PaintOptions};
use crate::render::ctx::RenderContext;
use crate::render::error::RenderError;
use crate::render::factory::create_paint;
use crate::scene::Element;
use crate::text::{rasterize_text, FontSystem, TextRasterError, TEXT_PADDING};

use super::{Renderer, Scope};

#[derive(Debug, Error)]
pub enum TextDrawError {
    #[error(transparent)]
    Raster(#[from] TextRasterError),
    #[error("backend could not create a {width}x{height} text image")]
    Image { width: u32, height: u32 },
    #[error("paint allocation failed")]
    Paint,
}

/// Rasterizes `text` and draws it with its top-left padding box at `(x, y - padding)`.
///
/// The temporary image and paint are released before returning.
pub(crate) fn draw_text_image<B: Backend>(
    fonts: &FontSystem,
    cx: &mut RenderContext<'_, B>,
    text: &str,
    x: f32,
    y: f32,
    size: f32,
    color: Color,
) -> Result<(), TextDrawError> {
    let bitmap = rasterize_text(fonts, None, text, size, color, cx.pixel_ratio)?;
    let image = cx
        .backend
        .make_image(bitmap.width, bitmap.height, &bitmap.rgba)
        .ok_or(TextDrawError::Image { width: bitmap.width, height: bitmap.height })?;
    let paint = create_paint(cx.backend, &PaintOptions::default()).ok_or(TextDrawError::Paint)?;

    let src = Rect::new(0.0, 0.0, bitmap.width as f32, bitmap.height as f32);
    let dst = Rect::new(x, y - TEXT_PADDING, bitmap.logical_width, bitmap.logical_height);
    cx.canvas.draw_image_rect(&image, src, dst, &paint);
    Ok(())
}

/// `text`: `x`, `y`, `text`, `fontSize` (16), `color` (`#000000`).
///
/// Flat color only. When rasterization fails a placeholder rectangle of
/// roughly the text's size is drawn in the fallback color.
pub struct TextRenderer {
    fonts: Rc<FontSystem>,
    fallback_color: Color,
}

impl TextRenderer {
    pub fn new(fonts: Rc<FontSystem>, fallback_color: Color) -> Self {
        Self { fonts, fallback_color }
    }

    fn draw_placeholder<B: Backend>(&self, cx: &mut RenderContext<'_, B>, text: &str, x: f32, y: f32, size: f32) {
        let width = text.chars().count() as f32 * size * 0.6;
        let options = PaintOptions {
            color: self.fallback_color,
            ..PaintOptions::default()
        };
        if let Some(paint) = create_paint(cx.backend, &options) {
            cx.canvas.draw_rect(Rect::new(x, y, width, size), &paint);
        }
    }
}

impl<B: Backend> Renderer<B> for TextRenderer {
    fn render(&self, element: &Element, cx: &mut RenderContext<'_, B>) -> Result<Scope, RenderError> {
        let r = element.read();
        let x = r.number("x")?;
        let y = r.number("y")?;
        let text = r.str("text")?;
        let size = r.number_or("fontSize", 16.0)?;
        let color = Color::parse_or_black(r.str_or("color", "#000000")?);

        if let Err(e) = draw_text_image(&self.fonts, cx, text, x, y, size, color) {
            log::error!("text rendering failed for {text:?}: {e}");
            self.draw_placeholder(cx, text, x, y, size);
        }
        Ok(Scope::Leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::{Call, FailureModes, RecordingBackend};
    use crate::render::renderers::testing::{draw_calls, render_one};
    use crate::render::config::TextConfig;
    use crate::scene::build::text;

    const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);

    fn system_fonts() -> Option<Rc<FontSystem>> {
        let mut fonts = FontSystem::new();
        fonts.load_first(&TextConfig::default().font_paths).ok()?;
        Some(Rc::new(fonts))
    }

    #[test]
    fn without_font_draws_sized_placeholder() {
        let backend = RecordingBackend::new();
        let renderer = TextRenderer::new(Rc::new(FontSystem::new()), RED);
        let (res, canvas) = render_one(&renderer, &backend, &text(10.0, 20.0, "Hello").prop("fontSize", 10.0));
        res.unwrap();

        match draw_calls(&canvas).as_slice() {
            [Call::DrawRect { rect, paint }] => {
                assert_eq!(*rect, Rect::new(10.0, 20.0, 5.0 * 10.0 * 0.6, 10.0));
                assert_eq!(paint.color, Some(RED));
            }
            other => panic!("unexpected calls {other:?}"),
        }
        assert_eq!(backend.live_transients(), 0);
    }

    #[test]
    fn text_prop_is_required() {
        let backend = RecordingBackend::new();
        let renderer = TextRenderer::new(Rc::new(FontSystem::new()), RED);
        let el = Element::new("text").prop("x", 0.0).prop("y", 0.0);
        let (res, _) = render_one(&renderer, &backend, &el);
        assert!(matches!(res, Err(RenderError::InvalidProps(_))));
    }

    #[test]
    fn with_font_draws_image_and_releases_it() {
        let Some(fonts) = system_fonts() else { return };
        let backend = RecordingBackend::new();
        let renderer = TextRenderer::new(fonts, RED);
        let (res, canvas) = render_one(&renderer, &backend, &text(5.0, 10.0, "Hi"));
        res.unwrap();

        match draw_calls(&canvas).as_slice() {
            [Call::DrawImageRect { dst, .. }] => {
                assert_eq!(dst.x(), 5.0);
                assert_eq!(dst.y(), 8.0);
                assert_eq!(dst.height(), (16.0f32 * 1.2).ceil() + 4.0);
            }
            other => panic!("unexpected calls {other:?}"),
        }
        assert_eq!(backend.live_images(), 0);
        assert_eq!(backend.images_made(), 1);
    }

    #[test]
    fn image_failure_falls_back_to_placeholder() {
        let Some(fonts) = system_fonts() else { return };
        let backend = RecordingBackend::new();
        backend.set_failures(FailureModes { images: true, ..Default::default() });
        let renderer = TextRenderer::new(fonts, RED);
        let (res, canvas) = render_one(&renderer, &backend, &text(0.0, 0.0, "Hi"));
        res.unwrap();
        assert!(matches!(draw_calls(&canvas).as_slice(), [Call::DrawRect { .. }]));
    }
}
