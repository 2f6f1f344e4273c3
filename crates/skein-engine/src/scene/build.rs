//! Tree builders for the default tags.
//!
//! These only assemble [`Element`]s with the prop names the renderers read;
//! optional props are added with [`Element::prop`] or the helpers below.

use std::rc::Rc;
use std::sync::Arc;

use crate::coords::Vec2;
use crate::path::PathData;

use super::node::{Component, ComponentNode, Element, Node};
use super::tags;

pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Element {
    Element::new(tags::RECT)
        .prop("x", x)
        .prop("y", y)
        .prop("width", width)
        .prop("height", height)
}

pub fn circle(cx: f32, cy: f32, r: f32) -> Element {
    Element::new(tags::CIRCLE).prop("cx", cx).prop("cy", cy).prop("r", r)
}

/// Path from SVG path data, parsed at draw time.
pub fn path(d: &str) -> Element {
    Element::new(tags::PATH).prop("path", d)
}

/// Path from prebuilt geometry shared with the caller.
pub fn path_data(data: Arc<PathData>) -> Element {
    Element::new(tags::PATH).prop("path", data)
}

pub fn text(x: f32, y: f32, content: &str) -> Element {
    Element::new(tags::TEXT).prop("x", x).prop("y", y).prop("text", content)
}

pub fn image(x: f32, y: f32, width: f32, height: f32, src: &str) -> Element {
    Element::new(tags::IMAGE)
        .prop("x", x)
        .prop("y", y)
        .prop("width", width)
        .prop("height", height)
        .prop("src", src)
}

pub fn group() -> Element {
    Element::new(tags::GROUP)
}

pub fn blur(sigma: f32) -> Element {
    Element::new(tags::BLUR).prop("blur", sigma)
}

pub fn color_matrix(matrix: [f32; 20]) -> Element {
    Element::new(tags::COLOR_MATRIX).prop("matrix", matrix)
}

pub fn linear_gradient(start: Vec2, end: Vec2, colors: &[&str]) -> Element {
    Element::new(tags::LINEAR_GRADIENT)
        .prop("start", start)
        .prop("end", end)
        .prop("colors", colors.to_vec())
}

pub fn radial_gradient(center: Vec2, radius: f32, colors: &[&str]) -> Element {
    Element::new(tags::RADIAL_GRADIENT)
        .prop("center", center)
        .prop("radius", radius)
        .prop("colors", colors.to_vec())
}

pub fn fragment<I, N>(nodes: I) -> Node
where
    I: IntoIterator<Item = N>,
    N: Into<Node>,
{
    Node::Fragment(nodes.into_iter().map(Into::into).collect())
}

pub fn component(component: Rc<dyn Component>) -> ComponentNode {
    ComponentNode::new(component)
}

impl Element {
    pub fn color(self, color: &str) -> Self {
        self.prop("color", color)
    }

    /// Switches to stroke style with the given width.
    pub fn stroke(self, width: f32) -> Self {
        self.prop("style", "stroke").prop("strokeWidth", width)
    }

    pub fn opacity(self, opacity: f32) -> Self {
        self.prop("opacity", opacity)
    }

    /// Affine transform as 6 (`[sx, kx, tx, ky, sy, ty]`) or 9 numbers.
    pub fn transform(self, matrix: &[f32]) -> Self {
        self.prop("transform", matrix.to_vec())
    }
}
