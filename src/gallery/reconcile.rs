/// Snapshot reconciliation
///
/// The backing photo library hands over whole replacement snapshots of its
/// image and video result sets. Reconciliation diffs each new snapshot
/// against the previously stored one for that kind and applies the minimal
/// insert/remove mutations to the shared merged index. Presence or absence of
/// an asset id is the only signal; nothing is ever updated in place.

use std::collections::HashSet;
use std::mem;

use super::asset::{Asset, AssetId, MediaKind};
use super::index::{AssetIndex, IndexMutation};

/// One reconciliation cycle's worth of mutations, positions included.
/// Produced once per cycle and consumed immediately by the projector.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChangeBatch {
    /// Insertions in application order, with the position each landed at
    pub added: Vec<(usize, Asset)>,
    /// Removals in application order, with the position each vacated
    pub removed: Vec<(usize, Asset)>,
}

/// Shape of a change batch, used by the projector's classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Add,
    Remove,
    Move,
    Reset,
}

impl ChangeBatch {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Classify the batch by its shape. A batch whose added and removed sets
    /// name the same assets is a reposition; disjoint mixed changes are a
    /// reset. Empty batches classify as Add and project to no instructions.
    pub fn kind(&self) -> BatchKind {
        if !self.added.is_empty() && !self.removed.is_empty() {
            let added_ids: HashSet<&AssetId> = self.added.iter().map(|(_, a)| &a.id).collect();
            let removed_ids: HashSet<&AssetId> = self.removed.iter().map(|(_, a)| &a.id).collect();
            if added_ids == removed_ids {
                BatchKind::Move
            } else {
                BatchKind::Reset
            }
        } else if !self.removed.is_empty() {
            BatchKind::Remove
        } else {
            BatchKind::Add
        }
    }
}

/// Diffs successive backing result set snapshots into the merged index.
///
/// The two kinds are reconciled independently and never read each other's
/// stored snapshot, but both write into the same index.
#[derive(Debug, Default)]
pub struct CollectionReconciler {
    images: Vec<Asset>,
    videos: Vec<Asset>,
}

impl CollectionReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    fn stored_snapshot_mut(&mut self, kind: MediaKind) -> &mut Vec<Asset> {
        match kind {
            MediaKind::Image => &mut self.images,
            MediaKind::Video => &mut self.videos,
        }
    }

    /// Replace the stored snapshot for `kind` with `new_snapshot` and apply
    /// the difference to `index`.
    ///
    /// Removals are applied before insertions. Insertions iterate the new
    /// snapshot oldest first, so newer assets land nearer the front of the
    /// index; for freshly captured media the computed insertion point is the
    /// front. Calling again with an unchanged snapshot yields an empty batch.
    pub fn reconcile(
        &mut self,
        kind: MediaKind,
        new_snapshot: Vec<Asset>,
        index: &mut AssetIndex,
    ) -> ChangeBatch {
        let old_snapshot = mem::take(self.stored_snapshot_mut(kind));
        let mut batch = ChangeBatch::default();

        // Anything the library no longer reports for this kind leaves the index.
        for asset in &old_snapshot {
            if !new_snapshot.iter().any(|a| a.id == asset.id) {
                if let Some(IndexMutation::Removed { position, asset }) = index.remove(&asset.id) {
                    batch.removed.push((position, asset));
                }
            }
        }

        // New arrivals enter oldest first so the newest ends up frontmost.
        let mut incoming: Vec<&Asset> = new_snapshot.iter().collect();
        incoming.sort_by(|&a, &b| b.cmp_newest_first(a));
        for asset in incoming {
            if !index.contains(&asset.id) {
                let position = index.insertion_point(asset);
                index.insert(asset.clone(), position);
                batch.added.push((position, asset.clone()));
            }
        }

        *self.stored_snapshot_mut(kind) = new_snapshot;
        batch
    }
}
