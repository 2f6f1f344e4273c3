//! Backend that records canvas calls instead of rasterizing.
//!
//! Every native handle it hands out holds a live-count token, so tests can
//! assert that paints, shaders, filters, paths and images are released.

use std::cell::Cell;
use std::rc::Rc;

use crate::coords::{Matrix, Rect, Vec2};
use crate::paint::{Color, ColorMatrix, PaintStyle, StrokeCap, StrokeJoin, TileMode};
use crate::path::PathData;

use super::{Backend, CanvasOps, ImageOps, PaintOps};

/// Counter shared between the backend and the handles it created.
#[derive(Debug, Default, Clone)]
struct LiveCounter(Rc<Cell<usize>>);

impl LiveCounter {
    fn token(&self) -> LiveToken {
        self.0.set(self.0.get() + 1);
        LiveToken(self.0.clone())
    }

    fn get(&self) -> usize {
        self.0.get()
    }
}

#[derive(Debug)]
struct LiveToken(Rc<Cell<usize>>);

impl Drop for LiveToken {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

/// Shader parameters as the backend received them.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderSpec {
    Linear {
        start: Vec2,
        end: Vec2,
        colors: Vec<Color>,
        positions: Option<Vec<f32>>,
        mode: TileMode,
    },
    Radial {
        center: Vec2,
        radius: f32,
        colors: Vec<Color>,
        positions: Option<Vec<f32>>,
        mode: TileMode,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    Blur { sigma_x: f32, sigma_y: f32, mode: TileMode },
    ColorMatrix(ColorMatrix),
}

/// Snapshot of a paint at the time it was used.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintState {
    /// `None` until `set_color` is called.
    pub color: Option<Color>,
    pub alpha: Option<f32>,
    pub style: PaintStyle,
    pub stroke_width: f32,
    pub cap: StrokeCap,
    pub join: StrokeJoin,
    pub anti_alias: bool,
    pub shader: Option<ShaderSpec>,
    pub filter: Option<FilterSpec>,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            color: None,
            alpha: None,
            style: PaintStyle::Fill,
            stroke_width: 1.0,
            cap: StrokeCap::Butt,
            join: StrokeJoin::Miter,
            anti_alias: false,
            shader: None,
            filter: None,
        }
    }
}

#[derive(Debug)]
pub struct RecordedPaint {
    pub state: PaintState,
    _live: LiveToken,
}

impl PaintOps<RecordingBackend> for RecordedPaint {
    fn set_color(&mut self, color: Color) {
        self.state.color = Some(color);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha = Some(alpha);
    }

    fn set_style(&mut self, style: PaintStyle) {
        self.state.style = style;
    }

    fn set_stroke_width(&mut self, width: f32) {
        self.state.stroke_width = width;
    }

    fn set_stroke_cap(&mut self, cap: StrokeCap) {
        self.state.cap = cap;
    }

    fn set_stroke_join(&mut self, join: StrokeJoin) {
        self.state.join = join;
    }

    fn set_anti_alias(&mut self, aa: bool) {
        self.state.anti_alias = aa;
    }

    fn set_shader(&mut self, shader: &RecordedShader) {
        self.state.shader = Some(shader.spec.clone());
    }

    fn set_image_filter(&mut self, filter: &RecordedFilter) {
        self.state.filter = Some(filter.spec.clone());
    }
}

#[derive(Debug)]
pub struct RecordedShader {
    pub spec: ShaderSpec,
    _live: LiveToken,
}

#[derive(Debug)]
pub struct RecordedFilter {
    pub spec: FilterSpec,
    _live: LiveToken,
}

#[derive(Debug)]
pub struct RecordedPath {
    pub data: PathData,
    _live: LiveToken,
}

#[derive(Debug)]
pub struct RecordedImage {
    pub id: usize,
    width: u32,
    height: u32,
    _live: LiveToken,
}

impl ImageOps for RecordedImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Clear(Color),
    Save,
    SaveLayer(Option<PaintState>),
    Restore,
    Concat(Matrix),
    DrawRect { rect: Rect, paint: PaintState },
    DrawCircle { center: Vec2, radius: f32, paint: PaintState },
    DrawPath { path: PathData, paint: PaintState },
    DrawImageRect { image: usize, src: Rect, dst: Rect, paint: PaintState },
    Flush,
}

impl Call {
    #[inline]
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Call::DrawRect { .. } | Call::DrawCircle { .. } | Call::DrawPath { .. } | Call::DrawImageRect { .. }
        )
    }

    pub fn paint(&self) -> Option<&PaintState> {
        match self {
            Call::DrawRect { paint, .. }
            | Call::DrawCircle { paint, .. }
            | Call::DrawPath { paint, .. }
            | Call::DrawImageRect { paint, .. } => Some(paint),
            Call::SaveLayer(paint) => paint.as_ref(),
            _ => None,
        }
    }
}

/// Recording canvas. Tracks the save stack like a real canvas.
#[derive(Debug)]
pub struct RecordingCanvas {
    calls: Vec<Call>,
    depth: usize,
    pixel_ratio: Option<f32>,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            depth: 1,
            pixel_ratio: None,
        }
    }

    /// Canvas that reports `ratio` as its device pixel ratio.
    pub fn with_pixel_ratio(ratio: f32) -> Self {
        Self {
            pixel_ratio: Some(ratio),
            ..Self::new()
        }
    }

    #[inline]
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    pub fn draws(&self) -> impl Iterator<Item = &Call> {
        self.calls.iter().filter(|c| c.is_draw())
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl CanvasOps<RecordingBackend> for RecordingCanvas {
    fn clear(&mut self, color: Color) {
        self.calls.push(Call::Clear(color));
    }

    fn save(&mut self) -> usize {
        self.calls.push(Call::Save);
        self.depth += 1;
        self.depth - 1
    }

    fn save_layer(&mut self, paint: Option<&RecordedPaint>) -> usize {
        self.calls.push(Call::SaveLayer(paint.map(|p| p.state.clone())));
        self.depth += 1;
        self.depth - 1
    }

    fn restore(&mut self) {
        if self.depth > 1 {
            self.calls.push(Call::Restore);
            self.depth -= 1;
        }
    }

    fn save_count(&self) -> usize {
        self.depth
    }

    fn pixel_ratio(&self) -> Option<f32> {
        self.pixel_ratio
    }

    fn concat(&mut self, matrix: &Matrix) {
        self.calls.push(Call::Concat(*matrix));
    }

    fn draw_rect(&mut self, rect: Rect, paint: &RecordedPaint) {
        self.calls.push(Call::DrawRect { rect, paint: paint.state.clone() });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, paint: &RecordedPaint) {
        self.calls.push(Call::DrawCircle { center, radius, paint: paint.state.clone() });
    }

    fn draw_path(&mut self, path: &RecordedPath, paint: &RecordedPaint) {
        self.calls.push(Call::DrawPath { path: path.data.clone(), paint: paint.state.clone() });
    }

    fn draw_image_rect(&mut self, image: &RecordedImage, src: Rect, dst: Rect, paint: &RecordedPaint) {
        self.calls.push(Call::DrawImageRect { image: image.id, src, dst, paint: paint.state.clone() });
    }

    fn flush(&mut self) {
        self.calls.push(Call::Flush);
    }
}

/// Allocation failures to simulate.
#[derive(Debug, Default, Copy, Clone)]
pub struct FailureModes {
    pub paints: bool,
    pub shaders: bool,
    pub filters: bool,
    pub paths: bool,
    pub images: bool,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    paints: LiveCounter,
    shaders: LiveCounter,
    filters: LiveCounter,
    paths: LiveCounter,
    images: LiveCounter,
    images_made: Cell<usize>,
    fail: Cell<FailureModes>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canvas(&self) -> RecordingCanvas {
        RecordingCanvas::new()
    }

    pub fn set_failures(&self, fail: FailureModes) {
        self.fail.set(fail);
    }

    pub fn live_paints(&self) -> usize {
        self.paints.get()
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.get()
    }

    pub fn live_filters(&self) -> usize {
        self.filters.get()
    }

    pub fn live_paths(&self) -> usize {
        self.paths.get()
    }

    pub fn live_images(&self) -> usize {
        self.images.get()
    }

    /// Total images ever created.
    pub fn images_made(&self) -> usize {
        self.images_made.get()
    }

    /// Handles other than images currently alive.
    pub fn live_transients(&self) -> usize {
        self.live_paints() + self.live_shaders() + self.live_filters() + self.live_paths()
    }
}

impl Backend for RecordingBackend {
    type Paint = RecordedPaint;
    type Path = RecordedPath;
    type Shader = RecordedShader;
    type ImageFilter = RecordedFilter;
    type Image = RecordedImage;
    type Canvas = RecordingCanvas;

    fn new_paint(&self) -> Option<RecordedPaint> {
        if self.fail.get().paints {
            return None;
        }
        Some(RecordedPaint { state: PaintState::default(), _live: self.paints.token() })
    }

    fn make_linear_gradient(
        &self,
        start: Vec2,
        end: Vec2,
        colors: &[Color],
        positions: Option<&[f32]>,
        mode: TileMode,
    ) -> Option<RecordedShader> {
        if self.fail.get().shaders {
            return None;
        }
        let spec = ShaderSpec::Linear {
            start,
            end,
            colors: colors.to_vec(),
            positions: positions.map(<[f32]>::to_vec),
            mode,
        };
        Some(RecordedShader { spec, _live: self.shaders.token() })
    }

    fn make_radial_gradient(
        &self,
        center: Vec2,
        radius: f32,
        colors: &[Color],
        positions: Option<&[f32]>,
        mode: TileMode,
    ) -> Option<RecordedShader> {
        if self.fail.get().shaders {
            return None;
        }
        let spec = ShaderSpec::Radial {
            center,
            radius,
            colors: colors.to_vec(),
            positions: positions.map(<[f32]>::to_vec),
            mode,
        };
        Some(RecordedShader { spec, _live: self.shaders.token() })
    }

    fn make_blur_filter(&self, sigma_x: f32, sigma_y: f32, mode: TileMode) -> Option<RecordedFilter> {
        if self.fail.get().filters {
            return None;
        }
        Some(RecordedFilter {
            spec: FilterSpec::Blur { sigma_x, sigma_y, mode },
            _live: self.filters.token(),
        })
    }

    fn make_color_matrix_filter(&self, matrix: &ColorMatrix) -> Option<RecordedFilter> {
        if self.fail.get().filters {
            return None;
        }
        Some(RecordedFilter {
            spec: FilterSpec::ColorMatrix(*matrix),
            _live: self.filters.token(),
        })
    }

    fn make_path(&self, data: &PathData) -> Option<RecordedPath> {
        if self.fail.get().paths {
            return None;
        }
        Some(RecordedPath { data: data.clone(), _live: self.paths.token() })
    }

    fn make_image(&self, width: u32, height: u32, rgba: &[u8]) -> Option<RecordedImage> {
        if self.fail.get().images || rgba.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        let id = self.images_made.get();
        self.images_made.set(id + 1);
        Some(RecordedImage { id, width, height, _live: self.images.token() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_counted_until_dropped() {
        let backend = RecordingBackend::new();
        let paint = backend.new_paint().unwrap();
        let image = backend.make_image(1, 1, &[0, 0, 0, 255]).unwrap();
        assert_eq!(backend.live_paints(), 1);
        assert_eq!(backend.live_images(), 1);

        drop(paint);
        drop(image);
        assert_eq!(backend.live_paints(), 0);
        assert_eq!(backend.live_images(), 0);
        assert_eq!(backend.images_made(), 1);
    }

    #[test]
    fn save_stack_matches_canvas_semantics() {
        let backend = RecordingBackend::new();
        let mut canvas = backend.canvas();
        assert_eq!(canvas.save_count(), 1);
        let n = canvas.save();
        assert_eq!(n, 1);
        canvas.save_layer(None);
        assert_eq!(canvas.save_count(), 3);

        canvas.restore_to_count(n);
        assert_eq!(canvas.save_count(), 1);
        assert_eq!(canvas.count(|c| *c == Call::Restore), 2);

        // Extra restores are ignored.
        canvas.restore();
        assert_eq!(canvas.count(|c| *c == Call::Restore), 2);
    }

    #[test]
    fn failure_modes_return_none() {
        let backend = RecordingBackend::new();
        backend.set_failures(FailureModes { shaders: true, ..Default::default() });
        let shader = backend.make_linear_gradient(
            Vec2::zero(),
            Vec2::new(1.0, 0.0),
            &[Color::BLACK, Color::WHITE],
            None,
            TileMode::Clamp,
        );
        assert!(shader.is_none());
        assert!(backend.new_paint().is_some());
    }
}
