use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::backend::{Backend, CanvasOps, ImageOps, PaintOps};
use crate::coords::Rect;
use crate::image::{compute_fit, ImageCache, ImageFit, LoadWaker};
use crate::paint::{Color, PaintOptions};
use crate::render::config::ImageConfig;
use crate::render::ctx::RenderContext;
use crate::render::error::RenderError;
use crate::render::factory::create_paint;
use crate::scene::Element;
use crate::text::FontSystem;

use super::text::draw_text_image;
use super::{Renderer, Scope};

const PLACEHOLDER_FILL: Color = Color::rgba(240.0 / 255.0, 240.0 / 255.0, 240.0 / 255.0, 1.0);
const PLACEHOLDER_TEXT: Color = Color::rgba(153.0 / 255.0, 153.0 / 255.0, 153.0 / 255.0, 1.0);
const LABEL_SIZE: f32 = 12.0;

/// `image`: `x`, `y`, `width`, `height`, `src`, `fit` (`fill`), `opacity` (1).
///
/// Uncached sources draw a "Loading..." placeholder and start a background
/// load; the image appears on the first frame after the load is polled in.
pub struct ImageRenderer<B: Backend> {
    cache: RefCell<ImageCache<B>>,
    fonts: Rc<FontSystem>,
}

impl<B: Backend> ImageRenderer<B> {
    pub fn new(config: ImageConfig, fonts: Rc<FontSystem>) -> Self {
        Self::with_cache(ImageCache::new(config), fonts)
    }

    pub fn with_cache(cache: ImageCache<B>, fonts: Rc<FontSystem>) -> Self {
        Self {
            cache: RefCell::new(cache),
            fonts,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.cache.borrow().has_pending()
    }

    fn draw_placeholder(&self, cx: &mut RenderContext<'_, B>, bounds: Rect) {
        let fill = PaintOptions {
            color: PLACEHOLDER_FILL,
            ..PaintOptions::default()
        };
        if let Some(paint) = create_paint(cx.backend, &fill) {
            cx.canvas.draw_rect(bounds, &paint);
        }

        // Baseline on the vertical center.
        let center = bounds.center();
        let top = center.y - self.fonts.ascent(LABEL_SIZE).unwrap_or(0.0);
        if let Err(e) = draw_text_image(&self.fonts, cx, "Loading...", center.x - 30.0, top, LABEL_SIZE, PLACEHOLDER_TEXT) {
            log::debug!("image placeholder label skipped: {e}");
        }
    }
}

impl<B: Backend> Renderer<B> for ImageRenderer<B> {
    fn render(&self, element: &Element, cx: &mut RenderContext<'_, B>) -> Result<Scope, RenderError> {
        let r = element.read();
        let bounds = Rect::new(r.number("x")?, r.number("y")?, r.number("width")?, r.number("height")?);
        let src = r.str("src")?;
        let fit = ImageFit::parse(r.str_or("fit", "fill")?);
        let opacity = r.number_or("opacity", 1.0)?;

        let mut cache = self.cache.borrow_mut();
        let Some(image) = cache.get(src) else {
            cache.request(src);
            drop(cache);
            self.draw_placeholder(cx, bounds);
            return Ok(Scope::Children);
        };

        let rects = compute_fit(fit, image.width() as f32, image.height() as f32, bounds);
        let Some(mut paint) = create_paint(cx.backend, &PaintOptions::default()) else {
            return Ok(Scope::Children);
        };
        if opacity < 1.0 {
            paint.set_alpha(opacity.max(0.0));
        }
        cx.canvas.draw_image_rect(image, rects.src, rects.dst, &paint);
        Ok(Scope::Children)
    }

    fn poll_resources(&self, backend: &B) -> bool {
        self.cache.borrow_mut().poll(backend)
    }

    fn wait_for_resources(&self, backend: &B, limit: Duration) -> bool {
        self.cache.borrow_mut().wait_for_pending(backend, limit)
    }

    fn set_waker(&self, waker: Option<LoadWaker>) {
        self.cache.borrow_mut().set_waker(waker);
    }

    fn cleanup(&mut self) {
        self.cache.get_mut().cleanup();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::backend::recording::{Call, RecordingBackend};
    use crate::image::{ImageError, ImageFetcher};
    use crate::render::config::TextConfig;
    use crate::text::TEXT_PADDING;
    use crate::render::renderers::testing::{draw_calls, render_one};
    use crate::scene::build::image;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100"/>"#;

    struct SvgFetcher;

    impl ImageFetcher for SvgFetcher {
        fn fetch(&self, _src: &str) -> Result<Vec<u8>, ImageError> {
            Ok(SVG.as_bytes().to_vec())
        }
    }

    fn renderer() -> ImageRenderer<RecordingBackend> {
        let cache = ImageCache::with_fetcher(ImageConfig::default(), Arc::new(SvgFetcher));
        ImageRenderer::with_cache(cache, Rc::new(FontSystem::new()))
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
    }

    impl ImageFetcher for CountingFetcher {
        fn fetch(&self, _src: &str) -> Result<Vec<u8>, ImageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SVG.as_bytes().to_vec())
        }
    }

    #[test]
    fn uncached_source_draws_placeholder_and_loads() {
        let backend = RecordingBackend::new();
        let renderer = renderer();
        let (res, canvas) = render_one(&renderer, &backend, &image(10.0, 20.0, 100.0, 50.0, "a.svg"));
        assert_eq!(res.unwrap(), Scope::Children);

        match draw_calls(&canvas).as_slice() {
            [Call::DrawRect { rect, paint }] => {
                assert_eq!(*rect, Rect::new(10.0, 20.0, 100.0, 50.0));
                assert_eq!(paint.color, Some(PLACEHOLDER_FILL));
            }
            other => panic!("unexpected calls {other:?}"),
        }
        assert!(renderer.has_pending());
        assert_eq!(backend.live_transients(), 0);
    }

    #[test]
    fn placeholder_label_sits_on_the_center_baseline() {
        let mut fonts = FontSystem::new();
        if fonts.load_first(&TextConfig::default().font_paths).is_err() {
            return;
        }
        let ascent = fonts.ascent(LABEL_SIZE).unwrap();
        let cache = ImageCache::with_fetcher(ImageConfig::default(), Arc::new(SvgFetcher));
        let renderer = ImageRenderer::with_cache(cache, Rc::new(fonts));

        let backend = RecordingBackend::new();
        let (res, canvas) = render_one(&renderer, &backend, &image(0.0, 0.0, 200.0, 100.0, "a.svg"));
        res.unwrap();
        match draw_calls(&canvas).as_slice() {
            [Call::DrawRect { .. }, Call::DrawImageRect { dst, .. }] => {
                assert_eq!(dst.x(), 100.0 - 30.0);
                assert!((dst.y() + TEXT_PADDING + ascent - 50.0).abs() < 1e-4);
            }
            other => panic!("unexpected calls {other:?}"),
        }
    }

    #[test]
    fn repeated_frames_fetch_an_uncached_source_once() {
        let fetcher = Arc::new(CountingFetcher::default());
        let cache = ImageCache::with_fetcher(ImageConfig::default(), fetcher.clone());
        let renderer = ImageRenderer::with_cache(cache, Rc::new(FontSystem::new()));
        let backend = RecordingBackend::new();
        let el = image(0.0, 0.0, 10.0, 10.0, "a.svg");

        let (first, _) = render_one(&renderer, &backend, &el);
        let (second, canvas) = render_one(&renderer, &backend, &el);
        first.unwrap();
        second.unwrap();
        assert!(matches!(draw_calls(&canvas).as_slice(), [Call::DrawRect { .. }]));

        assert!(renderer.wait_for_resources(&backend, WAIT));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(backend.images_made(), 1);
    }

    #[test]
    fn cached_image_is_drawn_with_fit() {
        let backend = RecordingBackend::new();
        let renderer = renderer();
        let el = image(0.0, 0.0, 100.0, 100.0, "a.svg").prop("fit", "contain").opacity(0.5);
        let _ = render_one(&renderer, &backend, &el);
        assert!(renderer.wait_for_resources(&backend, WAIT));

        let (res, canvas) = render_one(&renderer, &backend, &el);
        res.unwrap();
        match draw_calls(&canvas).as_slice() {
            [Call::DrawImageRect { src, dst, paint, .. }] => {
                assert_eq!(*src, Rect::new(0.0, 0.0, 200.0, 100.0));
                assert_eq!(*dst, Rect::new(0.0, 25.0, 100.0, 50.0));
                assert_eq!(paint.alpha, Some(0.5));
            }
            other => panic!("unexpected calls {other:?}"),
        }
        assert_eq!(backend.images_made(), 1);
    }

    #[test]
    fn cleanup_releases_cached_images() {
        let backend = RecordingBackend::new();
        let mut renderer = renderer();
        let _ = render_one(&renderer, &backend, &image(0.0, 0.0, 10.0, 10.0, "a.svg"));
        renderer.wait_for_resources(&backend, WAIT);
        assert_eq!(backend.live_images(), 1);

        Renderer::<RecordingBackend>::cleanup(&mut renderer);
        assert_eq!(backend.live_images(), 0);
    }
}
