//! Paint and shader construction shared by the primitive renderers.

use crate::backend::{Backend, PaintOps};
use crate::coords::Vec2;
use crate::paint::gradient::checked_positions;
use crate::paint::{LinearGradientSpec, PaintOptions, PaintStyle, RadialGradientSpec, StrokeCap, StrokeJoin};

/// Paint with color, style and stroke width applied. Anti-aliasing is always on;
/// strokes always get round caps and joins.
pub fn create_paint<B: Backend>(backend: &B, options: &PaintOptions) -> Option<B::Paint> {
    let mut paint = create_paint_without_color(backend, options.style, options.stroke_width)?;
    paint.set_color(options.color);
    Some(paint)
}

/// Same as [`create_paint`] but leaves the color untouched, for paints that
/// will receive a shader.
pub fn create_paint_without_color<B: Backend>(
    backend: &B,
    style: PaintStyle,
    stroke_width: f32,
) -> Option<B::Paint> {
    let Some(mut paint) = backend.new_paint() else {
        log::error!("paint allocation failed");
        return None;
    };
    paint.set_anti_alias(true);
    paint.set_style(style);
    if style == PaintStyle::Stroke {
        paint.set_stroke_width(stroke_width);
        paint.set_stroke_cap(StrokeCap::Round);
        paint.set_stroke_join(StrokeJoin::Round);
    }
    Some(paint)
}

/// Builds a linear gradient shader with both endpoints moved by `offset`.
pub fn make_linear_gradient<B: Backend>(backend: &B, spec: &LinearGradientSpec, offset: Vec2) -> Option<B::Shader> {
    let positions = checked_positions(spec.colors.len(), spec.positions.as_deref());
    backend.make_linear_gradient(
        spec.start + offset,
        spec.end + offset,
        &spec.colors,
        positions.as_deref(),
        spec.mode,
    )
}

pub fn make_radial_gradient<B: Backend>(backend: &B, spec: &RadialGradientSpec) -> Option<B::Shader> {
    let positions = checked_positions(spec.colors.len(), spec.positions.as_deref());
    backend.make_radial_gradient(spec.center, spec.radius, &spec.colors, positions.as_deref(), spec.mode)
}

/// Attaches `shader` to `paint` and releases the shader.
#[inline]
pub fn attach_shader<B: Backend>(paint: &mut B::Paint, shader: B::Shader) {
    paint.set_shader(&shader);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::{RecordingBackend, ShaderSpec};
    use crate::paint::{Color, TileMode};

    #[test]
    fn fill_paint_defaults() {
        let backend = RecordingBackend::new();
        let paint = create_paint(&backend, &PaintOptions::default()).unwrap();
        assert_eq!(paint.state.color, Some(Color::BLACK));
        assert_eq!(paint.state.style, PaintStyle::Fill);
        assert!(paint.state.anti_alias);
        assert_eq!(paint.state.cap, StrokeCap::Butt);
    }

    #[test]
    fn stroke_paint_gets_round_cap_and_join() {
        let backend = RecordingBackend::new();
        let opts = PaintOptions::new(Color::WHITE, PaintStyle::Stroke, 3.0);
        let paint = create_paint(&backend, &opts).unwrap();
        assert_eq!(paint.state.stroke_width, 3.0);
        assert_eq!(paint.state.cap, StrokeCap::Round);
        assert_eq!(paint.state.join, StrokeJoin::Round);
    }

    #[test]
    fn paint_without_color_leaves_color_unset() {
        let backend = RecordingBackend::new();
        let paint = create_paint_without_color(&backend, PaintStyle::Fill, 1.0).unwrap();
        assert_eq!(paint.state.color, None);
    }

    #[test]
    fn attached_shader_is_released() {
        let backend = RecordingBackend::new();
        let spec = LinearGradientSpec {
            start: Vec2::zero(),
            end: Vec2::new(10.0, 0.0),
            colors: vec![Color::BLACK, Color::WHITE],
            positions: Some(vec![0.0, 0.7]),
            mode: TileMode::Repeat,
        };
        let mut paint = create_paint_without_color(&backend, PaintStyle::Fill, 1.0).unwrap();
        let shader = make_linear_gradient(&backend, &spec, Vec2::new(5.0, 5.0)).unwrap();
        attach_shader::<RecordingBackend>(&mut paint, shader);

        assert_eq!(backend.live_shaders(), 0);
        match paint.state.shader {
            Some(ShaderSpec::Linear { start, positions, mode, .. }) => {
                assert_eq!(start, Vec2::new(5.0, 5.0));
                // Open-ended positions are dropped for even spacing.
                assert_eq!(positions, None);
                assert_eq!(mode, TileMode::Repeat);
            }
            other => panic!("unexpected shader {other:?}"),
        }
    }
}
