/// The merged, ordered, deduplicated sequence of assets behind the grid
///
/// Image and video result sets both feed into this one index. It is owned
/// exclusively by the engine: collaborators read snapshots or receive change
/// descriptors, they never mutate it.

use std::collections::HashSet;

use super::asset::{Asset, AssetId};

/// Structured description of one structural mutation of the index.
///
/// Returned from each mutating call rather than fired through registered
/// listeners, so callers batch and publish changes themselves without any
/// observer lifecycle to manage.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexMutation {
    Inserted { position: usize, asset: Asset },
    Removed { position: usize, asset: Asset },
}

/// Ordered newest-first, unique by asset id.
///
/// Both invariants hold after every mutation; violating inserts are caller
/// bugs and panic rather than silently reordering, since a silently corrected
/// index would no longer agree with the positions the UI has applied.
#[derive(Debug, Default)]
pub struct AssetIndex {
    assets: Vec<Asset>,
    ids: HashSet<AssetId>,
}

impl AssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.ids.contains(id)
    }

    pub fn get(&self, position: usize) -> Option<&Asset> {
        self.assets.get(position)
    }

    pub fn first(&self) -> Option<&Asset> {
        self.assets.first()
    }

    /// Read-only view of the current ordering
    pub fn snapshot(&self) -> &[Asset] {
        &self.assets
    }

    /// Position at which `asset` belongs under the newest-first ordering.
    /// Binary search; for a fresh capture newer than everything held, this is
    /// the front of the index.
    pub fn insertion_point(&self, asset: &Asset) -> usize {
        match self
            .assets
            .binary_search_by(|probe| probe.cmp_newest_first(asset))
        {
            Ok(position) | Err(position) => position,
        }
    }

    /// Insert `asset` at `position`.
    ///
    /// Panics on a duplicate id or a position that would break the
    /// newest-first ordering. Callers compute positions with
    /// [`insertion_point`](Self::insertion_point).
    pub fn insert(&mut self, asset: Asset, position: usize) -> IndexMutation {
        if self.ids.contains(&asset.id) {
            panic!("duplicate insert of asset {}", asset.id);
        }
        if position > self.assets.len() {
            panic!(
                "insert position {} out of bounds (len {})",
                position,
                self.assets.len()
            );
        }
        if position > 0 && self.assets[position - 1].cmp_newest_first(&asset).is_gt() {
            panic!("insert at {} breaks newest-first ordering", position);
        }
        if position < self.assets.len() && asset.cmp_newest_first(&self.assets[position]).is_gt() {
            panic!("insert at {} breaks newest-first ordering", position);
        }

        self.ids.insert(asset.id.clone());
        self.assets.insert(position, asset.clone());
        IndexMutation::Inserted { position, asset }
    }

    /// Remove the asset with `id`, if present
    pub fn remove(&mut self, id: &AssetId) -> Option<IndexMutation> {
        let position = self.assets.iter().position(|a| &a.id == id)?;
        let asset = self.assets.remove(position);
        self.ids.remove(id);
        Some(IndexMutation::Removed { position, asset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::asset::MediaKind;
    use chrono::DateTime;

    fn asset(id: &str, timestamp: i64) -> Asset {
        Asset {
            id: AssetId::from(id),
            kind: MediaKind::Image,
            created_at: DateTime::from_timestamp(timestamp, 0).unwrap(),
            pixel_width: 100,
            pixel_height: 100,
            duration: None,
        }
    }

    fn is_newest_first(index: &AssetIndex) -> bool {
        index
            .snapshot()
            .windows(2)
            .all(|pair| pair[0].cmp_newest_first(&pair[1]).is_lt())
    }

    #[test]
    fn test_insert_and_remove_maintain_ordering() {
        let mut index = AssetIndex::new();

        for (id, ts) in [("a", 50), ("b", 90), ("c", 10), ("d", 70)] {
            let a = asset(id, ts);
            let position = index.insertion_point(&a);
            index.insert(a, position);
            assert!(is_newest_first(&index));
        }

        assert_eq!(index.len(), 4);
        assert_eq!(index.first().unwrap().id, AssetId::from("b"));

        index.remove(&AssetId::from("b"));
        assert!(is_newest_first(&index));
        assert_eq!(index.first().unwrap().id, AssetId::from("d"));
    }

    #[test]
    fn test_contains_tracks_membership() {
        let mut index = AssetIndex::new();
        let a = asset("a", 1);

        assert!(!index.contains(&a.id));
        index.insert(a.clone(), 0);
        assert!(index.contains(&a.id));

        let mutation = index.remove(&a.id).unwrap();
        assert!(!index.contains(&a.id));
        assert_eq!(
            mutation,
            IndexMutation::Removed {
                position: 0,
                asset: a
            }
        );
    }

    #[test]
    fn test_remove_absent_is_none() {
        let mut index = AssetIndex::new();
        assert!(index.remove(&AssetId::from("ghost")).is_none());
    }

    #[test]
    fn test_mutations_report_positions() {
        let mut index = AssetIndex::new();
        index.insert(asset("a", 10), 0);

        let mutation = index.insert(asset("b", 20), 0);
        assert_eq!(
            mutation,
            IndexMutation::Inserted {
                position: 0,
                asset: asset("b", 20)
            }
        );
    }

    #[test]
    #[should_panic(expected = "duplicate insert")]
    fn test_duplicate_insert_panics() {
        let mut index = AssetIndex::new();
        index.insert(asset("a", 10), 0);
        index.insert(asset("a", 10), 0);
    }

    #[test]
    #[should_panic(expected = "breaks newest-first ordering")]
    fn test_order_violation_panics() {
        let mut index = AssetIndex::new();
        index.insert(asset("a", 10), 0);
        // An older asset cannot sit in front of a newer one.
        index.insert(asset("b", 5), 0);
    }
}
