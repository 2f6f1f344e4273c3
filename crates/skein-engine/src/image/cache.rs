use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::backend::Backend;
use crate::render::config::ImageConfig;

use super::{decode_image, DecodedImage, ImageError, ImageFetcher, SourceFetcher};

/// Called from a loader thread after a load finishes, so the host can
/// schedule the redraw that shows it.
pub type LoadWaker = Arc<dyn Fn() + Send + Sync>;

/// Observable state of one source.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ImageStatus {
    Unknown,
    Loading,
    Ready,
    Failed,
}

enum Entry<I> {
    Pending { started: Instant, attempt: u32, generation: u64 },
    Ready(I),
    Failed { at: Instant, attempts: u32 },
}

struct Completion {
    src: String,
    generation: u64,
    result: Result<DecodedImage, ImageError>,
}

/// Source-keyed cache of backend images with background loading.
///
/// At most one load per source is in flight. Finished loads are converted
/// into backend images on the render thread by [`ImageCache::poll`].
pub struct ImageCache<B: Backend> {
    entries: HashMap<String, Entry<B::Image>>,
    fetcher: Arc<dyn ImageFetcher>,
    config: ImageConfig,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    waker: Option<LoadWaker>,
    next_generation: u64,
}

impl<B: Backend> ImageCache<B> {
    pub fn new(config: ImageConfig) -> Self {
        let fetcher = SourceFetcher::new(config.asset_root.clone(), config.fallback_dir.clone())
            .with_timeout(config.timeout);
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    pub fn with_fetcher(config: ImageConfig, fetcher: Arc<dyn ImageFetcher>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            entries: HashMap::new(),
            fetcher,
            config,
            tx,
            rx,
            waker: None,
            next_generation: 0,
        }
    }

    pub fn set_waker(&mut self, waker: Option<LoadWaker>) {
        self.waker = waker;
    }

    pub fn get(&self, src: &str) -> Option<&B::Image> {
        match self.entries.get(src) {
            Some(Entry::Ready(image)) => Some(image),
            _ => None,
        }
    }

    pub fn status(&self, src: &str) -> ImageStatus {
        match self.entries.get(src) {
            None => ImageStatus::Unknown,
            Some(Entry::Pending { .. }) => ImageStatus::Loading,
            Some(Entry::Ready(_)) => ImageStatus::Ready,
            Some(Entry::Failed { .. }) => ImageStatus::Failed,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.entries.values().any(|e| matches!(e, Entry::Pending { .. }))
    }

    /// Number of ready images.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|e| matches!(e, Entry::Ready(_))).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Starts loading `src` unless it is ready, in flight, out of attempts or
    /// still backing off from its last failure.
    pub fn request(&mut self, src: &str) {
        let attempt = match self.entries.get(src) {
            None => 1,
            Some(Entry::Ready(_) | Entry::Pending { .. }) => return,
            Some(Entry::Failed { at, attempts }) => {
                if *attempts >= self.config.max_attempts || at.elapsed() < self.backoff(*attempts) {
                    return;
                }
                attempts + 1
            }
        };
        self.start(src, attempt);
    }

    /// Delay before retrying after `attempts` failures.
    fn backoff(&self, attempts: u32) -> Duration {
        let exp = attempts.saturating_sub(1).min(16);
        self.config.retry_backoff.saturating_mul(1 << exp)
    }

    fn start(&mut self, src: &str, attempt: u32) {
        self.next_generation += 1;
        let generation = self.next_generation;
        log::debug!("loading image {src:?} (attempt {attempt})");

        let fetcher = self.fetcher.clone();
        let tx = self.tx.clone();
        let waker = self.waker.clone();
        let owned = src.to_owned();
        let spawned = std::thread::Builder::new()
            .name("skein-image".into())
            .spawn(move || {
                let result = fetcher.fetch(&owned).and_then(|bytes| decode_image(&bytes));
                // The receiver is gone once the cache is dropped.
                if tx.send(Completion { src: owned, generation, result }).is_ok() {
                    if let Some(wake) = waker {
                        wake();
                    }
                }
            });

        match spawned {
            Ok(_) => {
                self.entries.insert(
                    src.to_owned(),
                    Entry::Pending {
                        started: Instant::now(),
                        attempt,
                        generation,
                    },
                );
            }
            Err(e) => self.fail(src, attempt, &ImageError::Spawn(e)),
        }
    }

    fn fail(&mut self, src: &str, attempts: u32, err: &ImageError) {
        if attempts >= self.config.max_attempts {
            log::error!("image {src:?} failed after {attempts} attempts: {err}");
        } else {
            log::warn!("image {src:?} failed (attempt {attempts}): {err}");
        }
        self.entries.insert(
            src.to_owned(),
            Entry::Failed {
                at: Instant::now(),
                attempts,
            },
        );
    }

    /// Moves finished loads into the cache and expires timed-out ones.
    /// Returns `true` when a new image became ready.
    pub fn poll(&mut self, backend: &B) -> bool {
        let mut ready = false;
        while let Ok(done) = self.rx.try_recv() {
            ready |= self.complete(backend, done);
        }
        self.expire();
        ready
    }

    fn complete(&mut self, backend: &B, done: Completion) -> bool {
        let attempt = match self.entries.get(&done.src) {
            Some(Entry::Pending { generation, attempt, .. }) if *generation == done.generation => *attempt,
            _ => {
                log::debug!("discarding stale load of {:?}", done.src);
                return false;
            }
        };

        let decoded = match done.result {
            Ok(decoded) => decoded,
            Err(e) => {
                self.fail(&done.src, attempt, &e);
                return false;
            }
        };
        match backend.make_image(decoded.width, decoded.height, &decoded.rgba) {
            Some(image) => {
                log::debug!("image {:?} ready ({}x{})", done.src, decoded.width, decoded.height);
                self.entries.insert(done.src, Entry::Ready(image));
                true
            }
            None => {
                let err = ImageError::Allocation {
                    width: decoded.width,
                    height: decoded.height,
                };
                self.fail(&done.src, attempt, &err);
                false
            }
        }
    }

    fn expire(&mut self) {
        let timeout = self.config.timeout;
        let expired: Vec<(String, u32)> = self
            .entries
            .iter()
            .filter_map(|(src, e)| match e {
                Entry::Pending { started, attempt, .. } if started.elapsed() >= timeout => {
                    Some((src.clone(), *attempt))
                }
                _ => None,
            })
            .collect();
        for (src, attempt) in expired {
            self.fail(&src, attempt, &ImageError::Timeout(timeout));
        }
    }

    /// Blocks until no load is pending or `limit` elapses, polling as loads
    /// finish. Returns `true` when any image became ready.
    pub fn wait_for_pending(&mut self, backend: &B, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        let mut ready = self.poll(backend);
        while self.has_pending() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match self.rx.recv_timeout(deadline - now) {
                Ok(done) => ready |= self.complete(backend, done),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.expire();
        }
        ready
    }

    /// Releases every cached image and forgets in-flight loads.
    pub fn cleanup(&mut self) {
        let released = self.len();
        self.entries.clear();
        while self.rx.try_recv().is_ok() {}
        log::debug!("image cache cleared ({released} images released)");
    }
}
