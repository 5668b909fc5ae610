mod ids;
mod media;
mod playback_state;
mod tile;

pub use ids::{MediaId, TileId, TrackId};
pub use media::{
    ArtworkRef, CatalogItem, CatalogTrack, MediaKind, MediaRef, SearchResults,
    COMBINED_SEARCH_LIMIT, DEFAULT_ARTWORK_SIZE, SEARCH_LIMIT,
};
pub use playback_state::{EngineEvent, QueueEntry, TransportStatus};
pub use tile::{TilePosition, TileRecord, TILE_COUNT};
