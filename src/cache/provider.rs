/// Collaborator seams for caching and fetching
///
/// The engine never touches a cache store or an image pipeline directly; it
/// only issues intents through these traits. The grid widget side contributes
/// the rect-to-positions lookup.

use crate::error::GalleryError;
use crate::gallery::asset::{Asset, MediaKind};
use crate::geometry::ViewportRect;

/// Target pixel size for a thumbnail request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThumbSize {
    pub width: u32,
    pub height: u32,
}

impl ThumbSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }
}

/// How a thumbnail is fitted into its target size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FitMode {
    /// Shrink to fit entirely inside the target, preserving aspect ratio
    AspectFit,
    /// Fill the target completely, cropping the overflow
    AspectFill,
}

/// Handle for one in-flight thumbnail request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(pub u64);

/// Terminal result of a thumbnail request
#[derive(Debug)]
pub enum FetchOutcome {
    /// Decoded thumbnail pixels
    Image(image::RgbaImage),
    /// The request was superseded or released before finishing.
    /// Expected steady-state behavior, not an error.
    Cancelled,
    /// The fetch failed; the cell keeps its placeholder, no retry
    Failed(GalleryError),
}

/// Receives cache admission and eviction intents.
///
/// Calls are asynchronous and fire-and-forget from the engine's point of
/// view; duplicate start or stop calls for the same asset must be safe.
pub trait CachingProvider {
    fn start_caching(&self, assets: &[Asset], size: ThumbSize, fit: FitMode);
    fn stop_caching(&self, assets: &[Asset], size: ThumbSize, fit: FitMode);
    fn stop_all_caching(&self);
}

/// Issues cancellable single-asset thumbnail fetches.
///
/// The completion must eventually be marshalled back onto the coordination
/// context and handed to `CellFetchCoordinator::complete` together with the
/// token the request returned.
pub trait ThumbnailFetcher {
    fn request_thumbnail(&self, asset: &Asset, size: ThumbSize, fit: FitMode) -> RequestToken;

    /// Cancel an in-flight request. Best effort: the provider either stops
    /// the work or lets its completion arrive as `Cancelled`; either way the
    /// coordinator discards the result by token comparison.
    fn cancel_request(&self, token: RequestToken);
}

/// The grid widget's knowledge of which cell positions a rectangle covers
pub trait PositionResolver {
    fn positions_intersecting(&self, rect: &ViewportRect) -> Vec<usize>;
}

/// The backing photo library, read as immutable per-kind snapshots
pub trait SnapshotProvider {
    fn fetch_snapshot(&self, kind: MediaKind) -> Result<Vec<Asset>, GalleryError>;
}
