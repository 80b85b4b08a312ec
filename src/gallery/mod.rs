/// Gallery state and change propagation
///
/// This module owns the merged asset sequence and everything that updates it:
/// - Shared data structures (asset.rs)
/// - The merged newest-first index (index.rs)
/// - Snapshot reconciliation against the backing library (reconcile.rs)
/// - Projection of change batches into grid instructions (project.rs)
/// - The coordination facade hosts talk to (source.rs)

pub mod asset;
pub mod index;
pub mod project;
pub mod reconcile;
pub mod source;
