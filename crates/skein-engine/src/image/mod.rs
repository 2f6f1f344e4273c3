//! Image sources: fetching, decoding, caching and fit geometry.
//!
//! Loads run on background threads and never block a render pass. The render
//! thread turns finished loads into backend images when it polls the cache.

mod cache;
mod decode;
mod fit;
mod loader;

pub use cache::{ImageCache, ImageStatus, LoadWaker};
pub use decode::{decode_image, DecodedImage};
pub use fit::{compute_fit, FitRects, ImageFit};
pub use loader::{candidates, ImageFetcher, SourceFetcher};

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("unsupported image source {0:?}")]
    UnsupportedSource(String),
    #[error("malformed data URI: {0}")]
    DataUri(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request for {url} failed: {reason}")]
    Network { url: String, reason: String },
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("backend could not allocate a {width}x{height} image")]
    Allocation { width: u32, height: u32 },
    #[error("load did not finish within {0:?}")]
    Timeout(Duration),
    #[error("could not start loader thread: {0}")]
    Spawn(#[source] std::io::Error),
}
