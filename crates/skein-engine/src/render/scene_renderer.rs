use std::rc::Rc;
use std::time::Duration;

use crate::backend::{Backend, CanvasOps};
use crate::image::LoadWaker;
use crate::scene::{tags, Element, Node};
use crate::text::FontSystem;

use super::config::{RenderConfig, TextConfig};
use super::ctx::RenderContext;
use super::error::{resolve_component, RenderError};
use super::registry::RendererRegistry;
use super::renderers::{
    BlurRenderer, CircleRenderer, ColorMatrixRenderer, GroupRenderer, ImageRenderer, PathRenderer, RectRenderer,
    Renderer, Scope, TextRenderer,
};

/// Loads the configured font, preferring `font_bytes` over `font_paths`.
///
/// An empty font system is returned when nothing loads; text then renders as
/// placeholders.
pub fn load_fonts(config: &TextConfig) -> FontSystem {
    let mut fonts = FontSystem::new();
    if let Some(bytes) = &config.font_bytes {
        match fonts.load_font(bytes) {
            Ok(_) => return fonts,
            Err(e) => log::warn!("configured font bytes rejected: {e}"),
        }
    }
    if let Err(e) = fonts.load_first(&config.font_paths) {
        log::warn!("{e}; text will render as placeholders");
    }
    fonts
}

/// Walks scene trees and dispatches each element to the renderer registered
/// for its tag.
///
/// Containers (`group`, `blur`, `color-matrix`) open their save/layer scope in
/// `render`; the walker draws their children in order and restores the
/// canvas afterwards, on the error path too.
pub struct SceneRenderer<B: Backend> {
    registry: RendererRegistry<B>,
    config: RenderConfig,
    fonts: Rc<FontSystem>,
    waker: Option<LoadWaker>,
    disposed: bool,
}

impl<B: Backend> SceneRenderer<B> {
    /// Creates a renderer with the eight default tags registered.
    pub fn new(config: RenderConfig) -> Self {
        let fonts = Rc::new(load_fonts(&config.text));
        Self::with_fonts(config, fonts)
    }

    pub fn with_fonts(config: RenderConfig, fonts: Rc<FontSystem>) -> Self {
        let mut registry = RendererRegistry::new();
        registry.register(tags::RECT, Box::new(RectRenderer));
        registry.register(tags::CIRCLE, Box::new(CircleRenderer));
        registry.register(tags::PATH, Box::new(PathRenderer));
        registry.register(
            tags::TEXT,
            Box::new(TextRenderer::new(fonts.clone(), config.text.fallback_color)),
        );
        registry.register(
            tags::IMAGE,
            Box::new(ImageRenderer::<B>::new(config.image.clone(), fonts.clone())),
        );
        registry.register(tags::GROUP, Box::new(GroupRenderer));
        registry.register(tags::BLUR, Box::new(BlurRenderer));
        registry.register(tags::COLOR_MATRIX, Box::new(ColorMatrixRenderer));

        Self {
            registry,
            config,
            fonts,
            waker: None,
            disposed: false,
        }
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[inline]
    pub fn fonts(&self) -> &Rc<FontSystem> {
        &self.fonts
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Renders one frame: clears to `clear_color`, walks `root`, flushes.
    ///
    /// Text is rasterized at the canvas's own pixel ratio, falling back to
    /// `RenderConfig::pixel_ratio` for canvases that do not report one. The
    /// canvas is flushed even when the walk fails; the error is returned
    /// afterwards.
    pub fn render_frame(&self, root: &Node, backend: &B, canvas: &mut B::Canvas) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        let pixel_ratio = canvas.pixel_ratio().unwrap_or(self.config.pixel_ratio);
        canvas.clear(self.config.clear_color);
        let result = {
            let mut cx = RenderContext::new(backend, canvas, pixel_ratio);
            self.render(root, &mut cx)
        };
        canvas.flush();
        if let Err(e) = &result {
            log::error!("render pass aborted: {e}");
        }
        result
    }

    /// Walks `root` without clearing or flushing.
    pub fn render(&self, root: &Node, cx: &mut RenderContext<'_, B>) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        self.walk(root, cx)
    }

    fn walk(&self, node: &Node, cx: &mut RenderContext<'_, B>) -> Result<(), RenderError> {
        match node {
            Node::Empty => Ok(()),
            Node::Text(text) => Err(RenderError::InvalidElement(text.clone())),
            Node::Fragment(children) => children.iter().try_for_each(|child| self.walk(child, cx)),
            Node::Component(component) => {
                let resolved = resolve_component(component)?;
                self.walk(&resolved, cx)
            }
            Node::Element(element) => self.render_element(element, cx),
        }
    }

    fn render_element(&self, element: &Element, cx: &mut RenderContext<'_, B>) -> Result<(), RenderError> {
        let tag = element.tag.as_str();
        if tag.trim().is_empty() {
            return Err(RenderError::InvalidTag(element.tag.clone()));
        }

        let scope = match self.registry.get(tag) {
            Some(renderer) => renderer.render(element, cx)?,
            None => {
                log::warn!("unsupported element <{tag}>; skipped");
                Scope::Children
            }
        };

        let result = if scope != Scope::Leaf && !tags::is_leaf_primitive(tag) {
            element.children.iter().try_for_each(|child| self.walk(child, cx))
        } else {
            Ok(())
        };
        if let Scope::Restore(count) = scope {
            cx.canvas.restore_to_count(count);
        }
        result
    }

    /// Registers `renderer` for `tag`, replacing any previous one.
    pub fn add_renderer(&mut self, tag: impl Into<String>, renderer: impl Renderer<B> + 'static) {
        let tag = tag.into();
        renderer.set_waker(self.waker.clone());
        if self.registry.register(tag.clone(), Box::new(renderer)).is_some() {
            log::debug!("replaced renderer for <{tag}>");
        }
    }

    /// Returns whether a renderer was registered for `tag`.
    pub fn remove_renderer(&mut self, tag: &str) -> bool {
        self.registry.remove(tag)
    }

    /// Registered tags, sorted.
    pub fn supported_types(&self) -> Vec<String> {
        self.registry.tags()
    }

    /// Picks up finished background work. Returns `true` when a redraw would
    /// show something new.
    pub fn poll_resources(&self, backend: &B) -> bool {
        self.registry
            .renderers()
            .fold(false, |changed, r| r.poll_resources(backend) | changed)
    }

    /// Blocks up to `limit` for pending background work (image loads).
    pub fn wait_for_resources(&self, backend: &B, limit: Duration) -> bool {
        self.registry
            .renderers()
            .fold(false, |changed, r| r.wait_for_resources(backend, limit) | changed)
    }

    /// Installs `waker` on every renderer, current and future.
    pub fn set_waker(&mut self, waker: Option<LoadWaker>) {
        for r in self.registry.renderers() {
            r.set_waker(waker.clone());
        }
        self.waker = waker;
    }

    /// Releases every renderer's resources and empties the registry. The
    /// renderer cannot draw afterwards.
    pub fn cleanup(&mut self) {
        self.registry.clear();
        self.waker = None;
        self.disposed = true;
        log::debug!("scene renderer disposed");
    }
}
