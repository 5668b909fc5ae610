//! Error types for the tile load pipeline

use mukki_core::types::MediaRef;
use mukki_core::MukkiError;
use thiserror::Error;

/// Failures while resolving a tile's media and starting playback.
///
/// These never reach callers of the public operations; they are logged
/// where the request ends.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Catalog has no such item
    #[error("Catalog returned nothing for {0}")]
    MediaNotFound(MediaRef),

    /// Catalog item resolved but carries no tracks
    #[error("No tracks to play for {0}")]
    EmptyTrackList(MediaRef),

    /// A newer request took over the shared engine
    #[error("Request superseded by a newer one")]
    Superseded,

    /// Collaborator failure (catalog, engine)
    #[error(transparent)]
    Core(#[from] MukkiError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
