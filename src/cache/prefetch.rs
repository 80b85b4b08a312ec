/// Viewport-driven cache admission and eviction
///
/// Keeps the caching provider primed with the thumbnails the user is about to
/// scroll into. The cache set is recomputed only when the viewport has moved
/// far enough to matter, and then only over the bands that actually changed,
/// via rectangle difference against the previous pre-heat rectangle.

use crate::config::GalleryConfig;
use crate::gallery::asset::Asset;
use crate::gallery::index::AssetIndex;
use crate::geometry::{self, ViewportRect};

use super::provider::{CachingProvider, FitMode, PositionResolver, ThumbSize};

#[derive(Debug)]
pub struct PrefetchManager {
    /// The inflated rectangle the current cache set was computed for.
    /// Empty until the first recompute and after every reset.
    previous: ViewportRect,
    cell_size: ThumbSize,
    preheat_inflation: f32,
    hysteresis_divisor: f32,
}

impl PrefetchManager {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            previous: ViewportRect::EMPTY,
            cell_size: ThumbSize::new(config.cell_width, config.cell_height),
            preheat_inflation: config.preheat_inflation,
            hysteresis_divisor: config.hysteresis_divisor,
        }
    }

    /// Forget the caching baseline and evict everything.
    ///
    /// Called after any structural index change: cell positions have shifted,
    /// so earlier caching decisions no longer describe what is on screen. The
    /// next viewport report recomputes the cache set from scratch.
    pub fn reset(&mut self, provider: &impl CachingProvider) {
        provider.stop_all_caching();
        self.previous = ViewportRect::EMPTY;
    }

    /// Scroll/layout entry point.
    ///
    /// Inflates `viewport` by the pre-heat margin, then bails unless the
    /// midpoint has moved more than a third (by default) of the viewport
    /// height since the last recompute. When it proceeds, exactly one
    /// start-caching and one stop-caching intent go out, either possibly
    /// covering no assets.
    pub fn viewport_changed(
        &mut self,
        viewport: ViewportRect,
        resolver: &impl PositionResolver,
        index: &AssetIndex,
        provider: &impl CachingProvider,
    ) {
        let preheat = viewport.inflated_vertically(self.preheat_inflation * viewport.height);

        let delta = (preheat.mid_y() - self.previous.mid_y()).abs();
        if delta <= viewport.height / self.hysteresis_divisor {
            return;
        }

        let regions = geometry::diff(self.previous, preheat);
        let to_start = assets_in_regions(&regions.exposed, resolver, index);
        let to_stop = assets_in_regions(&regions.hidden, resolver, index);

        provider.start_caching(&to_start, self.cell_size, FitMode::AspectFill);
        provider.stop_caching(&to_stop, self.cell_size, FitMode::AspectFill);

        self.previous = preheat;
    }
}

/// Resolve region rectangles to the assets whose cells they cover
fn assets_in_regions(
    regions: &[ViewportRect],
    resolver: &impl PositionResolver,
    index: &AssetIndex,
) -> Vec<Asset> {
    let mut assets = Vec::new();
    for rect in regions {
        for position in resolver.positions_intersecting(rect) {
            if let Some(asset) = index.get(position) {
                assets.push(asset.clone());
            }
        }
    }
    assets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::asset::{Asset, AssetId, MediaKind};
    use chrono::DateTime;
    use std::cell::RefCell;

    /// Maps positions to 100pt-tall rows in a single column
    struct RowResolver {
        row_height: f32,
        rows: usize,
    }

    impl PositionResolver for RowResolver {
        fn positions_intersecting(&self, rect: &ViewportRect) -> Vec<usize> {
            if rect.is_empty() {
                return Vec::new();
            }
            let first = (rect.min_y().max(0.0) / self.row_height).floor() as usize;
            let last = ((rect.max_y() / self.row_height).ceil() as usize).min(self.rows);
            (first..last).collect()
        }
    }

    #[derive(Default)]
    struct RecordingProvider {
        starts: RefCell<Vec<Vec<AssetId>>>,
        stops: RefCell<Vec<Vec<AssetId>>>,
        stop_alls: RefCell<usize>,
    }

    impl CachingProvider for RecordingProvider {
        fn start_caching(&self, assets: &[Asset], _size: ThumbSize, _fit: FitMode) {
            self.starts
                .borrow_mut()
                .push(assets.iter().map(|a| a.id.clone()).collect());
        }

        fn stop_caching(&self, assets: &[Asset], _size: ThumbSize, _fit: FitMode) {
            self.stops
                .borrow_mut()
                .push(assets.iter().map(|a| a.id.clone()).collect());
        }

        fn stop_all_caching(&self) {
            *self.stop_alls.borrow_mut() += 1;
        }
    }

    fn populated_index(count: usize) -> AssetIndex {
        let mut index = AssetIndex::new();
        for i in 0..count {
            let asset = Asset {
                id: AssetId(format!("asset-{}", i)),
                kind: MediaKind::Image,
                created_at: DateTime::from_timestamp(1_000_000 - i as i64, 0).unwrap(),
                pixel_width: 100,
                pixel_height: 100,
                duration: None,
            };
            index.insert(asset, i);
        }
        index
    }

    fn resolver() -> RowResolver {
        RowResolver {
            row_height: 100.0,
            rows: 50,
        }
    }

    #[test]
    fn test_first_viewport_report_primes_the_cache() {
        let mut prefetch = PrefetchManager::new(&GalleryConfig::default());
        let index = populated_index(50);
        let provider = RecordingProvider::default();

        prefetch.viewport_changed(
            ViewportRect::new(0.0, 0.0, 100.0, 600.0),
            &resolver(),
            &index,
            &provider,
        );

        // Pre-heat covers rows -300..900 clamped to 0..900, so rows 0..9.
        assert_eq!(provider.starts.borrow().len(), 1);
        assert_eq!(provider.stops.borrow().len(), 1);
        assert_eq!(provider.starts.borrow()[0].len(), 9);
        assert!(provider.stops.borrow()[0].is_empty());
    }

    #[test]
    fn test_small_scroll_is_ignored() {
        let mut prefetch = PrefetchManager::new(&GalleryConfig::default());
        let index = populated_index(50);
        let provider = RecordingProvider::default();

        prefetch.viewport_changed(
            ViewportRect::new(0.0, 0.0, 100.0, 600.0),
            &resolver(),
            &index,
            &provider,
        );

        // Midpoint moves by exactly height/3: at the threshold, not past it.
        prefetch.viewport_changed(
            ViewportRect::new(0.0, 200.0, 100.0, 600.0),
            &resolver(),
            &index,
            &provider,
        );

        assert_eq!(provider.starts.borrow().len(), 1);
        assert_eq!(provider.stops.borrow().len(), 1);
    }

    #[test]
    fn test_large_scroll_starts_and_stops_once() {
        let mut prefetch = PrefetchManager::new(&GalleryConfig::default());
        let index = populated_index(50);
        let provider = RecordingProvider::default();

        // Pre-heat covers 300..1500, so rows 3..15.
        prefetch.viewport_changed(
            ViewportRect::new(0.0, 600.0, 100.0, 600.0),
            &resolver(),
            &index,
            &provider,
        );
        // Pre-heat now covers 900..2100: rows 15..21 enter, rows 3..9 leave.
        prefetch.viewport_changed(
            ViewportRect::new(0.0, 1200.0, 100.0, 600.0),
            &resolver(),
            &index,
            &provider,
        );

        assert_eq!(provider.starts.borrow().len(), 2);
        assert_eq!(provider.stops.borrow().len(), 2);

        let ids = |range: std::ops::Range<usize>| -> Vec<AssetId> {
            range.map(|i| AssetId(format!("asset-{}", i))).collect()
        };
        assert_eq!(provider.starts.borrow()[1], ids(15..21));
        assert_eq!(provider.stops.borrow()[1], ids(3..9));
    }

    #[test]
    fn test_reset_evicts_and_forces_full_recompute() {
        let mut prefetch = PrefetchManager::new(&GalleryConfig::default());
        let index = populated_index(50);
        let provider = RecordingProvider::default();

        prefetch.viewport_changed(
            ViewportRect::new(0.0, 300.0, 100.0, 600.0),
            &resolver(),
            &index,
            &provider,
        );
        prefetch.reset(&provider);
        assert_eq!(*provider.stop_alls.borrow(), 1);

        // Same viewport again: without a baseline this recomputes in full.
        prefetch.viewport_changed(
            ViewportRect::new(0.0, 300.0, 100.0, 600.0),
            &resolver(),
            &index,
            &provider,
        );
        assert_eq!(provider.starts.borrow().len(), 2);
    }
}
