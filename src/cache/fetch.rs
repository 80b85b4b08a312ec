/// Per-cell single-slot thumbnail fetch coordination
///
/// Grid cells are recycled: a cell can be reassigned to a different asset
/// while its previous fetch is still in flight. Each cell therefore owns at
/// most one outstanding request, and a completion is only applied when its
/// token still matches the slot. A late thumbnail for a superseded request is
/// discarded silently instead of landing on a reused cell.

use std::collections::HashMap;

use image::RgbaImage;

use crate::config::GalleryConfig;
use crate::gallery::asset::Asset;

use super::provider::{FetchOutcome, FitMode, RequestToken, ThumbSize, ThumbnailFetcher};

/// Host-assigned identity of one reusable grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(pub u64);

/// Lifecycle of one cell's fetch slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No request outstanding and nothing applied
    Idle,
    /// One request in flight, identified by its token
    Pending(RequestToken),
    /// The latest request completed and its image was applied
    Fulfilled,
}

/// Tracks every visible cell's fetch slot.
///
/// Mutated only on the coordination context; completions arriving from
/// background work must be marshalled there before being handed in.
#[derive(Debug)]
pub struct CellFetchCoordinator {
    slots: HashMap<CellId, SlotState>,
    cell_size: ThumbSize,
}

impl CellFetchCoordinator {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            slots: HashMap::new(),
            cell_size: ThumbSize::new(config.cell_width, config.cell_height),
        }
    }

    pub fn state(&self, cell: CellId) -> SlotState {
        self.slots.get(&cell).copied().unwrap_or(SlotState::Idle)
    }

    /// Bind `cell` to `asset` and start fetching its thumbnail.
    ///
    /// Any request already in flight for the cell is cancelled first, keeping
    /// the at-most-one-outstanding invariant.
    pub fn request(
        &mut self,
        cell: CellId,
        asset: &Asset,
        fetcher: &impl ThumbnailFetcher,
    ) -> RequestToken {
        if let Some(SlotState::Pending(stale)) = self.slots.get(&cell) {
            fetcher.cancel_request(*stale);
        }

        let token = fetcher.request_thumbnail(asset, self.cell_size, FitMode::AspectFit);
        self.slots.insert(cell, SlotState::Pending(token));
        token
    }

    /// Hand in a completion that arrived on the coordination context.
    ///
    /// Returns the image the host should apply to the cell, or `None` when
    /// the result is stale (the token no longer matches), was cancelled, or
    /// failed. Stale results leave the slot untouched: the newer request owns
    /// it now.
    pub fn complete(
        &mut self,
        cell: CellId,
        token: RequestToken,
        outcome: FetchOutcome,
    ) -> Option<RgbaImage> {
        match self.slots.get(&cell) {
            Some(SlotState::Pending(current)) if *current == token => {}
            _ => return None,
        }

        match outcome {
            FetchOutcome::Image(image) => {
                self.slots.insert(cell, SlotState::Fulfilled);
                Some(image)
            }
            FetchOutcome::Cancelled => {
                self.slots.remove(&cell);
                None
            }
            FetchOutcome::Failed(err) => {
                eprintln!("⚠️  Thumbnail fetch failed: {}", err);
                self.slots.remove(&cell);
                None
            }
        }
    }

    /// The cell scrolled out of the visible set or was discarded
    pub fn release(&mut self, cell: CellId, fetcher: &impl ThumbnailFetcher) {
        if let Some(SlotState::Pending(token)) = self.slots.remove(&cell) {
            fetcher.cancel_request(token);
        }
    }

    /// Which cell a completion token belongs to, for hosts routing
    /// completions off a channel
    pub fn cell_for_token(&self, token: RequestToken) -> Option<CellId> {
        self.slots.iter().find_map(|(cell, state)| match state {
            SlotState::Pending(current) if *current == token => Some(*cell),
            _ => None,
        })
    }
}
