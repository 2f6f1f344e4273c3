use std::path::PathBuf;
use std::time::Duration;

use crate::paint::Color;

/// Scene renderer configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Color the surface is cleared to at the start of each frame.
    pub clear_color: Color,
    /// Text rasterization ratio for canvases that do not report their own.
    pub pixel_ratio: f32,
    pub image: ImageConfig,
    pub text: TextConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::WHITE,
            pixel_ratio: 1.0,
            image: ImageConfig::default(),
            text: TextConfig::default(),
        }
    }
}

/// Image loading policy.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// A load not finished within this window counts as failed.
    pub timeout: Duration,
    /// Total attempts per source before it stays failed.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles per further attempt.
    pub retry_backoff: Duration,
    /// Base directory for relative file sources.
    pub asset_root: Option<PathBuf>,
    /// Directory searched for `<file name>` when every other candidate fails.
    pub fallback_dir: Option<PathBuf>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3),
            max_attempts: 3,
            retry_backoff: Duration::from_secs(1),
            asset_root: None,
            fallback_dir: None,
        }
    }
}

/// Text rasterization settings.
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Candidate font files; the first one that loads is used.
    pub font_paths: Vec<PathBuf>,
    /// Font data that takes precedence over `font_paths`.
    pub font_bytes: Option<Vec<u8>>,
    /// Fill of the placeholder drawn when text cannot be rasterized.
    pub fallback_color: Color,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_paths: [
                "/usr/share/fonts/TTF/DejaVuSans.ttf",
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/noto/NotoSans-Regular.ttf",
                "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
                "/System/Library/Fonts/Supplemental/Arial.ttf",
                "C:\\Windows\\Fonts\\arial.ttf",
            ]
            .iter()
            .map(PathBuf::from)
            .collect(),
            font_bytes: None,
            fallback_color: Color::rgba(1.0, 0.0, 0.0, 1.0),
        }
    }
}
