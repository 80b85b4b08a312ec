/// Tunable policy parameters for the gallery engine
///
/// These values steer the update-batching and cache heuristics. They are
/// serialized to JSON so hosts can persist or ship alternative tunings.

use serde::{Deserialize, Serialize};

/// All policy parameters in one place
///
/// The defaults reproduce the stock behavior; none of them is a hard law,
/// only a tradeoff between UI churn and cache freshness.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GalleryConfig {
    /// Change batches with more additions or more removals than this reload
    /// the whole grid instead of emitting discrete per-position operations
    pub reload_threshold: usize,

    /// Fraction of the viewport height added above and below as pre-heat
    /// margin before computing the cache set (0.5 = half a screen each way)
    pub preheat_inflation: f32,

    /// The cache set is recomputed only when the viewport midpoint has moved
    /// by more than viewport height divided by this value
    pub hysteresis_divisor: f32,

    /// Target thumbnail width for grid cells, in pixels
    pub cell_width: u32,

    /// Target thumbnail height for grid cells, in pixels
    pub cell_height: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            reload_threshold: 10,
            preheat_inflation: 0.5,
            hysteresis_divisor: 3.0,
            cell_width: 100,
            cell_height: 100,
        }
    }
}

impl GalleryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert to JSON string for persistence
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
