//! Per-tag primitive renderers.
//!
//! Each renderer turns one element's props into backend calls and releases
//! every transient handle before returning. Renderers that wrap their children
//! in a drawing scope return [`Scope::Restore`]; the scene walker draws the
//! children and then restores the canvas.

mod blur;
mod circle;
mod color_matrix;
mod group;
mod image;
mod path;
mod rect;
mod text;

pub use blur::BlurRenderer;
pub use circle::CircleRenderer;
pub use color_matrix::ColorMatrixRenderer;
pub use group::GroupRenderer;
pub use image::ImageRenderer;
pub use path::PathRenderer;
pub use rect::RectRenderer;
pub use text::{TextDrawError, TextRenderer};

use std::time::Duration;

use crate::backend::Backend;
use crate::coords::Rect;
use crate::image::LoadWaker;
use crate::paint::{Color, PaintOptions, PaintStyle};
use crate::scene::{Element, PropError, PropReader};

use super::ctx::RenderContext;
use super::error::RenderError;
use super::factory::{create_paint, create_paint_without_color};
use super::gradient::{apply_gradient_from_children, has_gradient_children};

/// What the walker does after a renderer returns.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Scope {
    /// Drawn; children are not traversed.
    Leaf,
    /// Traverse children.
    Children,
    /// Traverse children, then restore the canvas to this save count.
    Restore(usize),
}

/// Handler for one element tag.
pub trait Renderer<B: Backend> {
    fn render(&self, element: &Element, cx: &mut RenderContext<'_, B>) -> Result<Scope, RenderError>;

    /// Moves finished background work (e.g. image loads) into the renderer.
    /// Returns `true` when a redraw would show something new.
    fn poll_resources(&self, _backend: &B) -> bool {
        false
    }

    /// Blocks up to `limit` for background work to finish.
    fn wait_for_resources(&self, _backend: &B, _limit: Duration) -> bool {
        false
    }

    /// Installs the callback background work uses to request a redraw.
    fn set_waker(&self, _waker: Option<LoadWaker>) {}

    /// Releases persistent resources held across frames.
    fn cleanup(&mut self) {}
}

/// `color` / `style` / `strokeWidth` props with their defaults.
pub(crate) fn paint_options(r: &PropReader<'_>) -> Result<PaintOptions, PropError> {
    Ok(PaintOptions {
        color: Color::parse_or_black(r.str_or("color", "#000000")?),
        style: PaintStyle::parse(r.str_or("style", "fill")?),
        stroke_width: r.number_or("strokeWidth", 1.0)?,
    })
}

/// Paint for a closed shape: gradient child if present, flat color otherwise.
pub(crate) fn shape_paint<B: Backend>(
    backend: &B,
    element: &Element,
    options: &PaintOptions,
    bounds: Option<Rect>,
) -> Result<Option<B::Paint>, RenderError> {
    if !has_gradient_children(element)? {
        return Ok(create_paint(backend, options));
    }
    let Some(mut paint) = create_paint_without_color(backend, options.style, options.stroke_width) else {
        return Ok(None);
    };
    apply_gradient_from_children(backend, element, &mut paint, bounds)?;
    Ok(Some(paint))
}
