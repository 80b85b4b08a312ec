/// Live gallery engine for photo/video picker grids
///
/// Maintains one merged, newest-first view over two independently-changing
/// backing result sets (images and videos), projects each change into the
/// smallest reasonable set of grid update instructions, and keeps a thumbnail
/// cache primed for the region the user is about to scroll into. The grid
/// widget, photo library, and permission UX stay on the host's side of the
/// collaborator traits.

pub mod cache;
pub mod config;
pub mod error;
pub mod gallery;
pub mod geometry;

pub use cache::fetch::{CellFetchCoordinator, CellId, SlotState};
pub use cache::prefetch::PrefetchManager;
pub use cache::provider::{
    CachingProvider, FetchOutcome, FitMode, PositionResolver, RequestToken, SnapshotProvider,
    ThumbSize, ThumbnailFetcher,
};
pub use cache::store::{FetchCompletion, ThumbnailCache};
pub use config::GalleryConfig;
pub use error::GalleryError;
pub use gallery::asset::{Asset, AssetId, MediaKind};
pub use gallery::index::{AssetIndex, IndexMutation};
pub use gallery::project::{ChangeProjector, UiInstruction};
pub use gallery::reconcile::{BatchKind, ChangeBatch, CollectionReconciler};
pub use gallery::source::{Authorization, GalleryDataSource, PermissionEvent};
pub use geometry::{diff, RegionDelta, ViewportRect};
