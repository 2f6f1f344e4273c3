use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;

use super::ImageError;

/// Produces the raw bytes of an image source.
///
/// Called on loader threads.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, src: &str) -> Result<Vec<u8>, ImageError>;
}

/// Sources tried in order for `src`: the source itself, the `http://` variant
/// of an `https://` source, then `fallback_dir/<file name>`.
pub fn candidates(src: &str, fallback_dir: Option<&Path>) -> Vec<String> {
    let mut out = vec![src.to_owned()];
    if src.starts_with("data:") {
        return out;
    }
    if let Some(rest) = src.strip_prefix("https://") {
        out.push(format!("http://{rest}"));
    }
    if let (Some(dir), Some(name)) = (fallback_dir, file_name(src)) {
        let fallback = dir.join(name).to_string_lossy().into_owned();
        if !out.contains(&fallback) {
            out.push(fallback);
        }
    }
    out
}

/// Last path segment of `src` without query or fragment.
fn file_name(src: &str) -> Option<&str> {
    let end = src.find(['?', '#']).unwrap_or(src.len());
    let name = src[..end].rsplit(['/', '\\']).next()?;
    (!name.is_empty()).then_some(name)
}

/// Default fetcher: `data:` URIs, local files and (with the `network`
/// feature) `http(s)://` URLs.
#[derive(Debug, Clone, Default)]
pub struct SourceFetcher {
    asset_root: Option<PathBuf>,
    fallback_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl SourceFetcher {
    pub fn new(asset_root: Option<PathBuf>, fallback_dir: Option<PathBuf>) -> Self {
        Self {
            asset_root,
            fallback_dir,
            timeout: None,
        }
    }

    /// Per-request timeout for network sources.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn fetch_one(&self, src: &str) -> Result<Vec<u8>, ImageError> {
        if let Some(rest) = src.strip_prefix("data:") {
            return decode_data_uri(rest);
        }
        if src.starts_with("http://") || src.starts_with("https://") {
            return self.fetch_http(src);
        }
        let path = match src.strip_prefix("file://") {
            Some(p) => PathBuf::from(p),
            None => self.resolve(src),
        };
        std::fs::read(&path).map_err(|source| ImageError::Io { path, source })
    }

    fn resolve(&self, src: &str) -> PathBuf {
        let path = Path::new(src);
        match &self.asset_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    #[cfg(feature = "network")]
    fn fetch_http(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let network = |e: reqwest::Error| ImageError::Network {
            url: url.to_owned(),
            reason: e.to_string(),
        };
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let response = builder.build().map_err(network)?.get(url).send().map_err(network)?;
        if !response.status().is_success() {
            return Err(ImageError::Network {
                url: url.to_owned(),
                reason: format!("HTTP {}", response.status()),
            });
        }
        Ok(response.bytes().map_err(network)?.to_vec())
    }

    #[cfg(not(feature = "network"))]
    fn fetch_http(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        Err(ImageError::Network {
            url: url.to_owned(),
            reason: "built without the `network` feature".to_owned(),
        })
    }
}

impl ImageFetcher for SourceFetcher {
    fn fetch(&self, src: &str) -> Result<Vec<u8>, ImageError> {
        let mut last = None;
        for candidate in candidates(src, self.fallback_dir.as_deref()) {
            match self.fetch_one(&candidate) {
                Ok(bytes) => {
                    if candidate != src {
                        log::debug!("image {src:?} loaded from fallback {candidate:?}");
                    }
                    return Ok(bytes);
                }
                Err(e) => {
                    log::debug!("image candidate {candidate:?} failed: {e}");
                    last = Some(e);
                }
            }
        }
        Err(last.unwrap_or_else(|| ImageError::UnsupportedSource(src.to_owned())))
    }
}

/// Decodes the part of a data URI after `data:`.
fn decode_data_uri(rest: &str) -> Result<Vec<u8>, ImageError> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::DataUri("missing `,`".to_owned()))?;
    if header.ends_with(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| ImageError::DataUri(e.to_string()))
    } else {
        percent_decode(payload)
    }
}

fn percent_decode(s: &str) -> Result<Vec<u8>, ImageError> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = s
                .get(i + 1..i + 3)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| ImageError::DataUri(format!("bad escape at {i}")))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_chain() {
        let c = candidates("https://host/img/cat.png?size=2", Some(Path::new("/assets")));
        assert_eq!(
            c,
            vec![
                "https://host/img/cat.png?size=2".to_owned(),
                "http://host/img/cat.png?size=2".to_owned(),
                Path::new("/assets").join("cat.png").to_string_lossy().into_owned(),
            ]
        );
    }

    #[test]
    fn data_uris_have_no_fallbacks() {
        assert_eq!(candidates("data:,x", Some(Path::new("/assets"))).len(), 1);
    }

    #[test]
    fn decodes_base64_data_uri() {
        let bytes = SourceFetcher::default().fetch("data:text/plain;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn decodes_percent_encoded_data_uri() {
        let bytes = SourceFetcher::default().fetch("data:image/svg+xml,%3Csvg%2F%3E").unwrap();
        assert_eq!(bytes, b"<svg/>");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SourceFetcher::default().fetch("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, ImageError::Io { .. }));
    }

    #[test]
    fn relative_paths_resolve_against_asset_root() {
        let dir = std::env::temp_dir().join(format!("skein-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.bin"), [1u8, 2, 3]).unwrap();

        let fetcher = SourceFetcher::new(Some(dir.clone()), None);
        assert_eq!(fetcher.fetch("a.bin").unwrap(), vec![1, 2, 3]);

        let fallback = SourceFetcher::new(None, Some(dir.clone()));
        assert_eq!(fallback.fetch("/nowhere/a.bin").unwrap(), vec![1, 2, 3]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
