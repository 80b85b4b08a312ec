/// Error taxonomy for the gallery engine
///
/// Only expected, recoverable failures live here. Fetch cancellation is not
/// an error at all (see `FetchOutcome::Cancelled`), and invariant violations
/// such as duplicate inserts or malformed rectangles are caller bugs that
/// panic instead of returning a value.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    /// The host's photo-library permission was denied or restricted
    #[error("photo library access is not authorized")]
    PermissionDenied,

    /// Reading asset bytes from the media store failed
    #[error("failed to read asset data: {0}")]
    Io(#[from] std::io::Error),

    /// Decoding or resizing the asset's pixels failed
    #[error("failed to decode thumbnail: {0}")]
    Decode(#[from] image::ImageError),
}
