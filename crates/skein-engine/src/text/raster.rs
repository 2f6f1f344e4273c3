use thiserror::Error;

use crate::paint::Color;

use super::{FontId, FontSystem};

/// Transparent margin around rasterized text, in logical pixels.
pub const TEXT_PADDING: f32 = 2.0;

/// Largest bitmap edge the rasterizer will allocate, in device pixels.
const MAX_EDGE: u32 = 16_384;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TextRasterError {
    #[error("no font loaded")]
    NoFont,
    #[error("invalid font size {0}")]
    InvalidSize(f32),
    #[error("text bitmap {width}x{height} exceeds the size limit")]
    TooLarge { width: u32, height: u32 },
}

/// Straight-alpha RGBA8 text bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBitmap {
    /// Device pixels.
    pub width: u32,
    pub height: u32,
    /// Size of the box the bitmap covers, in logical pixels.
    pub logical_width: f32,
    pub logical_height: f32,
    pub rgba: Vec<u8>,
}

/// Rasterizes one line of `text` in `color` at `size` logical pixels.
///
/// The logical box is `ceil(advance) + 2 * padding` wide and
/// `ceil(size * 1.2) + 2 * padding` tall; glyphs start at the padding with a
/// top baseline box. The bitmap itself is `pixel_ratio` times larger.
pub fn rasterize_text(
    fonts: &FontSystem,
    font: Option<FontId>,
    text: &str,
    size: f32,
    color: Color,
    pixel_ratio: f32,
) -> Result<TextBitmap, TextRasterError> {
    use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

    let id = font.or_else(|| fonts.default_font()).ok_or(TextRasterError::NoFont)?;
    let face = fonts.get(id).ok_or(TextRasterError::NoFont)?;
    if !size.is_finite() || size <= 0.0 {
        return Err(TextRasterError::InvalidSize(size));
    }

    let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
    let measured = fonts.measure_text_scaled(text, id, size, ratio);
    let logical_width = measured.x.ceil() + TEXT_PADDING * 2.0;
    let logical_height = (size * 1.2).ceil() + TEXT_PADDING * 2.0;
    let width = (logical_width * ratio).ceil() as u32;
    let height = (logical_height * ratio).ceil() as u32;
    if width > MAX_EDGE || height > MAX_EDGE {
        return Err(TextRasterError::TooLarge { width, height });
    }

    let [r, g, b, a] = color.to_rgba8();
    let mut rgba = vec![0u8; width as usize * height as usize * 4];
    for px in rgba.chunks_exact_mut(4) {
        px[..3].copy_from_slice(&[r, g, b]);
    }

    let phys_size = size * ratio;
    let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
    layout.reset(&LayoutSettings {
        x: TEXT_PADDING * ratio,
        y: TEXT_PADDING * ratio,
        ..LayoutSettings::default()
    });
    layout.append(&[face], &TextStyle::new(text, phys_size, 0));

    for glyph in layout.glyphs() {
        if !glyph.char_data.rasterize() || glyph.width == 0 || glyph.height == 0 {
            continue;
        }
        let (metrics, coverage) = face.rasterize_config(glyph.key);
        let gx = glyph.x.round() as i64;
        let gy = glyph.y.round() as i64;
        for row in 0..metrics.height {
            let y = gy + row as i64;
            if y < 0 || y >= height as i64 {
                continue;
            }
            for col in 0..metrics.width {
                let x = gx + col as i64;
                if x < 0 || x >= width as i64 {
                    continue;
                }
                let cov = coverage[row * metrics.width + col] as u32;
                if cov == 0 {
                    continue;
                }
                let src = cov * a as u32 / 255;
                let i = (y as usize * width as usize + x as usize) * 4 + 3;
                let dst = rgba[i] as u32;
                // Source-over on alpha; the color is uniform.
                rgba[i] = (src + dst * (255 - src) / 255).min(255) as u8;
            }
        }
    }

    Ok(TextBitmap {
        width,
        height,
        logical_width,
        logical_height,
        rgba,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_font_is_an_error() {
        let fonts = FontSystem::new();
        let err = rasterize_text(&fonts, None, "hi", 16.0, Color::BLACK, 1.0).unwrap_err();
        assert_eq!(err, TextRasterError::NoFont);
    }

    #[test]
    fn system_font_produces_ink_when_available() {
        let mut fonts = FontSystem::new();
        let paths = [
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        ];
        if fonts.load_first(&paths).is_err() {
            return;
        }
        let bmp = rasterize_text(&fonts, None, "Hi", 20.0, Color::BLACK, 2.0).unwrap();
        assert_eq!(bmp.logical_height, 24.0 + 4.0);
        assert_eq!(bmp.height, 56);
        assert_eq!(bmp.rgba.len(), (bmp.width * bmp.height * 4) as usize);
        assert!(bmp.rgba.chunks_exact(4).any(|p| p[3] > 0));
    }
}
