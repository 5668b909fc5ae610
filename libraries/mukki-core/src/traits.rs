/// Boundary traits for external collaborators
use crate::error::{MukkiError, Result};
use crate::types::{
    ArtworkRef, CatalogItem, CatalogTrack, MediaRef, QueueEntry, SearchResults, TransportStatus,
};
use async_trait::async_trait;

/// Catalog gateway trait
///
/// Implementers resolve catalog identities against the external music service.
/// All network-backed methods are fallible; callers decide how to degrade.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Search albums, at most `SEARCH_LIMIT` results
    async fn search_albums(&self, query: &str) -> Result<Vec<CatalogItem>>;

    /// Search playlists, at most `SEARCH_LIMIT` results
    async fn search_playlists(&self, query: &str) -> Result<Vec<CatalogItem>>;

    /// Search both kinds, at most `COMBINED_SEARCH_LIMIT` results per kind
    async fn search_all(&self, query: &str) -> Result<SearchResults>;

    /// Fetch the detailed item including its ordered track list.
    ///
    /// Returns `Ok(None)` when the catalog has no such item.
    async fn fetch_by_id(&self, media: &MediaRef) -> Result<Option<CatalogItem>>;

    /// Address of the artwork image at `size` x `size` pixels
    fn resolve_artwork_address(&self, artwork: &ArtworkRef, size: u32) -> Option<String> {
        Some(artwork.url(size, size))
    }
}

/// Player engine trait
///
/// The single shared playback engine. Implementers own the queue and the
/// transport; state changes are reported separately as `EngineEvent`s
/// delivered to the coordinator.
#[async_trait]
pub trait PlayerEngine: Send + Sync {
    /// Replace the queue with `tracks`, order preserved, positioned at the first entry
    async fn set_queue(&self, tracks: Vec<CatalogTrack>) -> Result<()>;

    /// Start or resume playback
    async fn play(&self) -> Result<()>;

    /// Pause playback
    async fn pause(&self) -> Result<()>;

    /// Stop playback
    async fn stop(&self) -> Result<()>;

    /// Advance to the next queue entry
    async fn skip_to_next(&self) -> Result<()>;

    /// Go back to the previous queue entry
    async fn skip_to_previous(&self) -> Result<()>;

    /// Current transport status
    fn status(&self) -> TransportStatus;

    /// Current queue entry, if any
    fn current_entry(&self) -> Option<QueueEntry>;

    /// Snapshot of the queue listing
    fn entries(&self) -> Vec<QueueEntry>;

    /// Whether `seek_to_index` is available
    fn supports_seek_to_index(&self) -> bool {
        false
    }

    /// Jump directly to a queue entry
    async fn seek_to_index(&self, index: usize) -> Result<()> {
        let _ = index;
        Err(MukkiError::unsupported("seek to queue index"))
    }
}
