//! Gradient children of shape elements.
//!
//! A shape draws with a shader when one of its immediate children is a
//! `linear-gradient` or `radial-gradient` element, or a component that renders
//! to one. Only the first such child is used.
//!
//! Linear gradient coordinates are relative to the shape bounds when the shape
//! supplies them (rect, circle); radial gradient coordinates are always
//! absolute.

use std::borrow::Cow;

use crate::backend::Backend;
use crate::coords::{Rect, Vec2};
use crate::paint::{Color, GradientSpec, LinearGradientSpec, RadialGradientSpec, TileMode};
use crate::scene::{tags, Element, Node};

use super::error::{resolve_component, RenderError};
use super::factory::{attach_shader, make_linear_gradient, make_radial_gradient};

/// Whether `element` has a gradient child. Component children are invoked.
pub fn has_gradient_children(element: &Element) -> Result<bool, RenderError> {
    Ok(first_gradient_child(element)?.is_some())
}

/// Parses the first gradient child of `element`, if any.
pub fn find_gradient(element: &Element) -> Result<Option<GradientSpec>, RenderError> {
    first_gradient_child(element)?
        .map(|child| parse_gradient(&child))
        .transpose()
}

/// Builds a shader from the first gradient child and attaches it to `paint`.
///
/// Returns whether a shader was attached. Shader allocation failure is logged
/// and leaves the paint without a shader.
pub fn apply_gradient_from_children<B: Backend>(
    backend: &B,
    element: &Element,
    paint: &mut B::Paint,
    bounds: Option<Rect>,
) -> Result<bool, RenderError> {
    let Some(spec) = find_gradient(element)? else {
        return Ok(false);
    };

    let shader = match &spec {
        GradientSpec::Linear(linear) => {
            let offset = bounds.map_or(Vec2::zero(), |b| b.origin);
            make_linear_gradient(backend, linear, offset)
        }
        GradientSpec::Radial(radial) => make_radial_gradient(backend, radial),
    };

    match shader {
        Some(shader) => {
            attach_shader::<B>(paint, shader);
            Ok(true)
        }
        None => {
            log::warn!("<{}>: gradient shader creation failed, drawing without shader", element.tag);
            Ok(false)
        }
    }
}

/// Absolute linear gradient for a shape with optional `bounds`.
pub fn resolve_linear(spec: &LinearGradientSpec, bounds: Option<Rect>) -> LinearGradientSpec {
    match bounds {
        Some(b) => spec.offset_by(b.origin),
        None => spec.clone(),
    }
}

fn first_gradient_child(element: &Element) -> Result<Option<Cow<'_, Element>>, RenderError> {
    for child in &element.children {
        match child {
            Node::Element(e) if tags::is_gradient(&e.tag) => return Ok(Some(Cow::Borrowed(e))),
            Node::Component(c) => {
                let mut node = resolve_component(c)?;
                while let Node::Component(inner) = &node {
                    node = resolve_component(inner)?;
                }
                if let Node::Element(e) = node {
                    if tags::is_gradient(&e.tag) {
                        return Ok(Some(Cow::Owned(e)));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(None)
}

fn parse_gradient(element: &Element) -> Result<GradientSpec, RenderError> {
    let r = element.read();
    let colors: Vec<Color> = r
        .strings("colors")?
        .iter()
        .map(|c| Color::parse_or_black(c))
        .collect();
    let positions = r.opt_numbers("positions")?.map(<[f32]>::to_vec);
    let mode = TileMode::parse(r.str_or("mode", "clamp")?);

    if element.tag == tags::LINEAR_GRADIENT {
        Ok(GradientSpec::Linear(LinearGradientSpec {
            start: r.point("start")?,
            end: r.point("end")?,
            colors,
            positions,
            mode,
        }))
    } else {
        Ok(GradientSpec::Radial(RadialGradientSpec {
            center: r.point("center")?,
            radius: r.number("radius")?,
            colors,
            positions,
            mode,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::backend::recording::{RecordingBackend, ShaderSpec};
    use crate::scene::build::{circle, linear_gradient, radial_gradient, rect};
    use crate::scene::{ComponentNode, FnComponent, Props};

    fn red_blue() -> [&'static str; 2] {
        ["red", "blue"]
    }

    // ── detection ─────────────────────────────────────────────────────────

    #[test]
    fn detects_direct_gradient_child() {
        let el = rect(0.0, 0.0, 10.0, 10.0)
            .child(linear_gradient(Vec2::zero(), Vec2::new(10.0, 0.0), &red_blue()));
        assert!(has_gradient_children(&el).unwrap());
        assert!(!has_gradient_children(&rect(0.0, 0.0, 1.0, 1.0)).unwrap());
    }

    #[test]
    fn detects_gradient_behind_component() {
        let comp = FnComponent::new("Fade", |_: &Props, _: &[Node]| {
            Ok(radial_gradient(Vec2::new(1.0, 1.0), 2.0, &["white", "black"]).into())
        });
        let el = circle(0.0, 0.0, 5.0).child(ComponentNode::new(Rc::new(comp)));
        match find_gradient(&el).unwrap() {
            Some(GradientSpec::Radial(spec)) => assert_eq!(spec.radius, 2.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn component_error_during_scan_is_fatal() {
        let comp = FnComponent::new("Broken", |_: &Props, _: &[Node]| Err("no".into()));
        let el = rect(0.0, 0.0, 1.0, 1.0).child(ComponentNode::new(Rc::new(comp)));
        assert!(matches!(has_gradient_children(&el), Err(RenderError::Component { .. })));
    }

    #[test]
    fn first_gradient_wins() {
        let el = rect(0.0, 0.0, 10.0, 10.0)
            .child(radial_gradient(Vec2::new(1.0, 1.0), 4.0, &red_blue()))
            .child(linear_gradient(Vec2::zero(), Vec2::new(1.0, 0.0), &red_blue()));
        assert!(matches!(find_gradient(&el).unwrap(), Some(GradientSpec::Radial(_))));
    }

    #[test]
    fn malformed_gradient_props_are_fatal() {
        let el = rect(0.0, 0.0, 10.0, 10.0).child(Element::new(tags::LINEAR_GRADIENT).prop("colors", ["red"]));
        assert!(matches!(find_gradient(&el), Err(RenderError::InvalidProps(_))));
    }

    // ── coordinate spaces ─────────────────────────────────────────────────

    #[test]
    fn linear_is_bounds_relative() {
        let backend = RecordingBackend::new();
        let el = rect(10.0, 10.0, 100.0, 50.0)
            .child(linear_gradient(Vec2::zero(), Vec2::new(100.0, 0.0), &red_blue()));
        let mut paint = backend.new_paint().unwrap();
        let bounds = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert!(apply_gradient_from_children(&backend, &el, &mut paint, Some(bounds)).unwrap());

        match paint.state.shader {
            Some(ShaderSpec::Linear { start, end, .. }) => {
                assert_eq!(start, Vec2::new(10.0, 10.0));
                assert_eq!(end, Vec2::new(110.0, 10.0));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(backend.live_shaders(), 0);
    }

    #[test]
    fn radial_ignores_bounds() {
        let backend = RecordingBackend::new();
        let el = circle(50.0, 50.0, 25.0).child(radial_gradient(Vec2::new(50.0, 50.0), 25.0, &red_blue()));
        let mut paint = backend.new_paint().unwrap();
        let bounds = Rect::around_circle(Vec2::new(50.0, 50.0), 25.0);
        apply_gradient_from_children(&backend, &el, &mut paint, Some(bounds)).unwrap();

        match paint.state.shader {
            Some(ShaderSpec::Radial { center, .. }) => assert_eq!(center, Vec2::new(50.0, 50.0)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn resolution_is_repeatable() {
        let spec = LinearGradientSpec {
            start: Vec2::new(1.0, 2.0),
            end: Vec2::new(3.0, 4.0),
            colors: vec![Color::BLACK, Color::WHITE],
            positions: None,
            mode: TileMode::Clamp,
        };
        let bounds = Some(Rect::new(10.0, 20.0, 5.0, 5.0));
        assert_eq!(resolve_linear(&spec, bounds), resolve_linear(&spec, bounds));
        assert_eq!(resolve_linear(&spec, bounds).start, Vec2::new(11.0, 22.0));
    }
}
