/// Shared data structures for the gallery engine
///
/// These structs represent the media items that flow between
/// the backing photo library and the grid UI layer.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;

/// Stable identity of a media asset, issued by the backing photo library.
/// Two snapshots refer to the same asset exactly when their ids are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub String);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        AssetId(value.to_string())
    }
}

/// Which backing result set an asset belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

/// A single media item from the photo library
///
/// Assets are immutable once observed. When the library changes, the backing
/// result set delivers a replacement asset under the same id; nothing is ever
/// mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// Stable identifier from the backing library
    pub id: AssetId,
    /// Image or video
    pub kind: MediaKind,
    /// Capture time; the grid orders assets newest first by this field
    pub created_at: DateTime<Utc>,
    /// Pixel width of the full-size media
    pub pixel_width: u32,
    /// Pixel height of the full-size media
    pub pixel_height: u32,
    /// Playback length in seconds (videos only)
    pub duration: Option<f64>,
}

impl Asset {
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    /// Ordering used by the merged index: descending capture time, ties broken
    /// by id so assets captured in the same instant still have one definite
    /// position.
    pub fn cmp_newest_first(&self, other: &Asset) -> Ordering {
        other
            .created_at
            .cmp(&self.created_at)
            .then_with(|| self.id.cmp(&other.id))
    }
}
