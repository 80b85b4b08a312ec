/// Gallery data source facade
///
/// Single owner of the merged index and all coordination state. The host
/// forwards photo-library change notifications, scroll viewports, cell
/// bindings, and fetch completions into this object on one coordination
/// context, in the order they arrive; every call here is synchronous and
/// non-blocking, with background work living behind the collaborator traits.

use image::RgbaImage;

use crate::cache::fetch::{CellFetchCoordinator, CellId};
use crate::cache::prefetch::PrefetchManager;
use crate::cache::provider::{
    CachingProvider, FetchOutcome, PositionResolver, RequestToken, SnapshotProvider,
    ThumbnailFetcher,
};
use crate::config::GalleryConfig;
use crate::error::GalleryError;
use crate::geometry::ViewportRect;

use super::asset::{Asset, MediaKind};
use super::index::AssetIndex;
use super::project::{ChangeProjector, UiInstruction};
use super::reconcile::CollectionReconciler;

/// Photo-library authorization as reported by the host platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    NotDetermined,
    Authorized,
    Denied,
    Restricted,
}

/// Events surfaced to the host UI outside the instruction stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionEvent {
    /// Access to the photo library was refused; the host should render its
    /// unauthorized state
    Unauthorized,
}

pub struct GalleryDataSource {
    index: AssetIndex,
    reconciler: CollectionReconciler,
    projector: ChangeProjector,
    prefetcher: PrefetchManager,
    cells: CellFetchCoordinator,
    authorization: Authorization,
}

impl GalleryDataSource {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            index: AssetIndex::new(),
            reconciler: CollectionReconciler::new(),
            projector: ChangeProjector::new(config),
            prefetcher: PrefetchManager::new(config),
            cells: CellFetchCoordinator::new(config),
            authorization: Authorization::NotDetermined,
        }
    }

    /// Host reports the platform's authorization status.
    /// Returns an event to render when access was refused. Until the status
    /// is `Authorized`, caching and cell fetches are no-ops.
    pub fn set_authorization(&mut self, status: Authorization) -> Option<PermissionEvent> {
        self.authorization = status;
        match status {
            Authorization::Denied | Authorization::Restricted => Some(PermissionEvent::Unauthorized),
            Authorization::NotDetermined | Authorization::Authorized => None,
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.authorization == Authorization::Authorized
    }

    /// Fetch both backing result sets and seed the merged index.
    /// Returns the grid instructions for the initial population.
    pub fn initial_load(
        &mut self,
        library: &impl SnapshotProvider,
        provider: &impl CachingProvider,
    ) -> Result<Vec<UiInstruction>, GalleryError> {
        let images = library.fetch_snapshot(MediaKind::Image)?;
        let videos = library.fetch_snapshot(MediaKind::Video)?;

        let mut instructions = self.apply_change(MediaKind::Image, images, provider);
        instructions.extend(self.apply_change(MediaKind::Video, videos, provider));
        Ok(instructions)
    }

    /// One backing result set changed; diff it into the index and hand back
    /// the grid updates to apply.
    pub fn library_changed(
        &mut self,
        kind: MediaKind,
        snapshot: Vec<Asset>,
        provider: &impl CachingProvider,
    ) -> Vec<UiInstruction> {
        self.apply_change(kind, snapshot, provider)
    }

    fn apply_change(
        &mut self,
        kind: MediaKind,
        snapshot: Vec<Asset>,
        provider: &impl CachingProvider,
    ) -> Vec<UiInstruction> {
        let batch = self.reconciler.reconcile(kind, snapshot, &mut self.index);
        let instructions = self.projector.project(&batch);

        if !instructions.is_empty() {
            // Positions shifted; the caching baseline is stale.
            self.prefetcher.reset(provider);
        }
        instructions
    }

    /// Number of assets in the merged grid
    pub fn asset_count(&self) -> usize {
        self.index.len()
    }

    /// The asset shown at `position`, newest first
    pub fn asset_at(&self, position: usize) -> Option<&Asset> {
        self.index.get(position)
    }

    /// Scroll/layout callback from the grid widget
    pub fn viewport_changed(
        &mut self,
        viewport: ViewportRect,
        resolver: &impl PositionResolver,
        provider: &impl CachingProvider,
    ) {
        if !self.is_authorized() {
            return;
        }
        self.prefetcher
            .viewport_changed(viewport, resolver, &self.index, provider);
    }

    /// Populate a (possibly recycled) cell with the asset at `position`.
    /// Returns the token of the issued fetch, or `None` when unauthorized or
    /// the position is out of range.
    pub fn bind_cell(
        &mut self,
        cell: CellId,
        position: usize,
        fetcher: &impl ThumbnailFetcher,
    ) -> Option<RequestToken> {
        if !self.is_authorized() {
            return None;
        }
        let asset = self.index.get(position)?.clone();
        Some(self.cells.request(cell, &asset, fetcher))
    }

    /// The cell left the visible set or was discarded
    pub fn cell_released(&mut self, cell: CellId, fetcher: &impl ThumbnailFetcher) {
        self.cells.release(cell, fetcher);
    }

    /// A fetch completion arrived on the coordination context.
    /// Returns the image to apply to the cell, or `None` for stale,
    /// cancelled, or failed results.
    pub fn fetch_completed(
        &mut self,
        cell: CellId,
        token: RequestToken,
        outcome: FetchOutcome,
    ) -> Option<RgbaImage> {
        self.cells.complete(cell, token, outcome)
    }

    /// Route a completion token to its cell
    pub fn cell_for_token(&self, token: RequestToken) -> Option<CellId> {
        self.cells.cell_for_token(token)
    }
}
