/// Default in-process thumbnail provider
///
/// Stands in for a platform caching image manager: it pre-decodes thumbnails
/// for the assets the prefetcher admits, serves single-asset fetch requests,
/// and drops decoded pixels again on eviction. Asset bytes are resolved from
/// a media root directory as `<root>/<asset id>.jpg`.
///
/// Decode work runs on the tokio blocking pool; completions are published on
/// a channel for the host to drain on its coordination context.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use image::imageops::FilterType;
use image::RgbaImage;
use tokio::sync::mpsc;

use crate::error::GalleryError;
use crate::gallery::asset::{Asset, AssetId};

use super::provider::{CachingProvider, FetchOutcome, FitMode, RequestToken, ThumbSize, ThumbnailFetcher};

/// Completion of one asynchronous fetch, delivered over the channel.
/// The host forwards it to `CellFetchCoordinator::complete`.
#[derive(Debug)]
pub struct FetchCompletion {
    pub token: RequestToken,
    pub outcome: FetchOutcome,
}

type CacheKey = (AssetId, u32, u32, FitMode);

struct CacheInner {
    media_root: PathBuf,
    entries: Mutex<HashMap<CacheKey, RgbaImage>>,
    /// Tokens with work still outstanding; bounds the cancelled set
    inflight: Mutex<HashSet<u64>>,
    cancelled: Mutex<HashSet<u64>>,
    ready: AtomicBool,
    next_token: AtomicU64,
}

/// In-memory thumbnail store keyed by (asset, target size, fit mode).
///
/// Starts life uninitialized: until `activate` is called (after the host
/// obtains photo-library authorization), every caching and fetch operation is
/// a no-op. Duplicate admissions and evictions are safe; the store converges
/// on the same contents either way.
pub struct ThumbnailCache {
    inner: Arc<CacheInner>,
    completions: mpsc::UnboundedSender<FetchCompletion>,
    runtime: tokio::runtime::Handle,
}

impl ThumbnailCache {
    /// Create the cache and the completion channel the host should drain.
    /// Must be called from within the host's tokio runtime.
    pub fn new(media_root: impl Into<PathBuf>) -> (Self, mpsc::UnboundedReceiver<FetchCompletion>) {
        let media_root = media_root.into();
        println!("📁 Thumbnail media root: {}", media_root.display());

        let (tx, rx) = mpsc::unbounded_channel();
        let cache = Self {
            inner: Arc::new(CacheInner {
                media_root,
                entries: Mutex::new(HashMap::new()),
                inflight: Mutex::new(HashSet::new()),
                cancelled: Mutex::new(HashSet::new()),
                ready: AtomicBool::new(false),
                next_token: AtomicU64::new(0),
            }),
            completions: tx,
            runtime: tokio::runtime::Handle::current(),
        };
        (cache, rx)
    }

    /// Transition to the ready state; call once authorization is granted
    pub fn activate(&self) {
        self.inner.ready.store(true, Ordering::SeqCst);
        println!("✅ Thumbnail cache ready");
    }

    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::SeqCst)
    }

    /// Number of decoded thumbnails currently held
    pub fn cached_count(&self) -> usize {
        self.inner.entries.lock().expect("cache lock poisoned").len()
    }

    fn media_path(inner: &CacheInner, id: &AssetId) -> PathBuf {
        inner.media_root.join(format!("{}.jpg", id))
    }

    fn key(asset: &Asset, size: ThumbSize, fit: FitMode) -> CacheKey {
        (asset.id.clone(), size.width, size.height, fit)
    }

    fn publish(&self, token: RequestToken, outcome: FetchOutcome) {
        let _ = self.completions.send(FetchCompletion { token, outcome });
    }

    fn finish_token(inner: &CacheInner, token: u64) -> bool {
        inner
            .inflight
            .lock()
            .expect("cache lock poisoned")
            .remove(&token);
        inner
            .cancelled
            .lock()
            .expect("cache lock poisoned")
            .remove(&token)
    }
}

/// Read the asset's media file and produce pixels at the requested size
fn load_thumbnail(path: &Path, size: ThumbSize, fit: FitMode) -> Result<RgbaImage, GalleryError> {
    if !path.exists() {
        return Err(GalleryError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no media file at {}", path.display()),
        )));
    }

    let img = image::open(path)?;
    let resized = match fit {
        FitMode::AspectFit => img.resize(size.width, size.height, FilterType::Lanczos3),
        FitMode::AspectFill => img.resize_to_fill(size.width, size.height, FilterType::Lanczos3),
    };
    Ok(resized.to_rgba8())
}

impl CachingProvider for ThumbnailCache {
    fn start_caching(&self, assets: &[Asset], size: ThumbSize, fit: FitMode) {
        if !self.is_ready() {
            return;
        }

        for asset in assets {
            let key = Self::key(asset, size, fit);
            if self
                .inner
                .entries
                .lock()
                .expect("cache lock poisoned")
                .contains_key(&key)
            {
                continue;
            }

            let inner = Arc::clone(&self.inner);
            self.runtime.spawn_blocking(move || {
                let path = ThumbnailCache::media_path(&inner, &key.0);
                match load_thumbnail(&path, ThumbSize::new(key.1, key.2), key.3) {
                    Ok(pixels) => {
                        inner
                            .entries
                            .lock()
                            .expect("cache lock poisoned")
                            .insert(key, pixels);
                    }
                    Err(err) => {
                        eprintln!("⚠️  Pre-caching failed for {}: {}", key.0, err);
                    }
                }
            });
        }
    }

    fn stop_caching(&self, assets: &[Asset], size: ThumbSize, fit: FitMode) {
        if !self.is_ready() {
            return;
        }

        let mut entries = self.inner.entries.lock().expect("cache lock poisoned");
        for asset in assets {
            entries.remove(&Self::key(asset, size, fit));
        }
    }

    fn stop_all_caching(&self) {
        self.inner
            .entries
            .lock()
            .expect("cache lock poisoned")
            .clear();
    }
}

impl ThumbnailFetcher for ThumbnailCache {
    fn request_thumbnail(&self, asset: &Asset, size: ThumbSize, fit: FitMode) -> RequestToken {
        let token = RequestToken(self.inner.next_token.fetch_add(1, Ordering::SeqCst) + 1);

        if !self.is_ready() {
            // Uninitialized: the request completes as cancelled, the cell
            // keeps its placeholder.
            self.publish(token, FetchOutcome::Cancelled);
            return token;
        }

        let key = Self::key(asset, size, fit);
        if let Some(pixels) = self
            .inner
            .entries
            .lock()
            .expect("cache lock poisoned")
            .get(&key)
        {
            self.publish(token, FetchOutcome::Image(pixels.clone()));
            return token;
        }

        self.inner
            .inflight
            .lock()
            .expect("cache lock poisoned")
            .insert(token.0);

        let inner = Arc::clone(&self.inner);
        let completions = self.completions.clone();
        self.runtime.spawn_blocking(move || {
            let path = ThumbnailCache::media_path(&inner, &key.0);
            let result = load_thumbnail(&path, ThumbSize::new(key.1, key.2), key.3);
            let was_cancelled = ThumbnailCache::finish_token(&inner, token.0);

            let outcome = if was_cancelled {
                FetchOutcome::Cancelled
            } else {
                match result {
                    Ok(pixels) => FetchOutcome::Image(pixels),
                    Err(err) => FetchOutcome::Failed(err),
                }
            };
            let _ = completions.send(FetchCompletion { token, outcome });
        });

        token
    }

    fn cancel_request(&self, token: RequestToken) {
        let inflight = self.inner.inflight.lock().expect("cache lock poisoned");
        if inflight.contains(&token.0) {
            self.inner
                .cancelled
                .lock()
                .expect("cache lock poisoned")
                .insert(token.0);
        }
    }
}
