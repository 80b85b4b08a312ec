/// Change projection
///
/// Translates a reconciliation batch into the smallest reasonable sequence of
/// grid update instructions. Grid widgets apply positional insert/remove
/// operations efficiently, but past a certain batch size a full reload is
/// cheaper and safer than enumerating dozens of discrete operations.

use std::ops::Range;

use crate::config::GalleryConfig;

use super::reconcile::{BatchKind, ChangeBatch};

/// One update operation for the grid widget to apply
#[derive(Debug, Clone, PartialEq)]
pub enum UiInstruction {
    /// Rebuild the whole grid from the current index
    ReloadAll,
    /// A block of cells changed position; both ranges need refreshing
    Move {
        from: Range<usize>,
        to: Range<usize>,
    },
    /// Delete the cells at these positions
    Remove { positions: Vec<usize> },
    /// Insert cells at these positions
    Insert { positions: Vec<usize> },
}

/// Classifies change batches into grid instructions.
///
/// Classification order, first match wins: oversized batches reload,
/// repositions move, pure removals remove, pure additions insert, and any
/// mixed remainder falls back to a reload. After the host applies a non-empty
/// instruction list, cell positions have shifted and the caching baseline
/// must be reset.
#[derive(Debug)]
pub struct ChangeProjector {
    reload_threshold: usize,
}

impl ChangeProjector {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            reload_threshold: config.reload_threshold,
        }
    }

    pub fn project(&self, batch: &ChangeBatch) -> Vec<UiInstruction> {
        if batch.is_empty() {
            return Vec::new();
        }

        if batch.added.len() > self.reload_threshold || batch.removed.len() > self.reload_threshold
        {
            println!(
                "🔄 Reloading grid: {} added, {} removed",
                batch.added.len(),
                batch.removed.len()
            );
            return vec![UiInstruction::ReloadAll];
        }

        match batch.kind() {
            BatchKind::Move => vec![UiInstruction::Move {
                from: contiguous_range(batch.removed.iter().map(|(p, _)| *p)),
                to: contiguous_range(batch.added.iter().map(|(p, _)| *p)),
            }],
            BatchKind::Remove => vec![UiInstruction::Remove {
                positions: batch.removed.iter().map(|(p, _)| *p).collect(),
            }],
            BatchKind::Add => vec![UiInstruction::Insert {
                positions: batch.added.iter().map(|(p, _)| *p).collect(),
            }],
            BatchKind::Reset => vec![UiInstruction::ReloadAll],
        }
    }
}

/// Contiguous position range starting at the smallest recorded position
fn contiguous_range(positions: impl Iterator<Item = usize>) -> Range<usize> {
    let positions: Vec<usize> = positions.collect();
    let start = positions.iter().copied().min().unwrap_or(0);
    start..start + positions.len()
}
