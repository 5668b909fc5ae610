//! Mukki Player Core
//!
//! Platform-agnostic core types, boundary traits, and error handling for the
//! nine-tile music launcher.
//!
//! This crate provides the foundational building blocks shared by the storage,
//! catalog, and playback crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TileRecord`, `TilePosition`, `MediaRef`, `CatalogItem`, etc.
//! - **Boundary Traits**: `TileStore`, `CatalogGateway`, `PlayerEngine`
//! - **Error Handling**: Unified `MukkiError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use mukki_core::types::{MediaId, MediaKind, MediaRef, TilePosition, TileRecord};
//!
//! let position = TilePosition::new(2).unwrap();
//! let mut tile = TileRecord::new(position);
//! assert!(!tile.is_configured());
//!
//! tile.bind(
//!     MediaRef::new(MediaKind::Album, MediaId::new("1440857781")),
//!     "Abbey Road",
//!     None,
//! );
//! assert!(tile.is_configured());
//! assert_eq!(tile.last_played_track_index, 0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{MukkiError, Result};
pub use storage::TileStore;
pub use traits::{CatalogGateway, PlayerEngine};

pub use types::{
    ArtworkRef, CatalogItem, CatalogTrack, EngineEvent, MediaId, MediaKind, MediaRef, QueueEntry,
    SearchResults, TileId, TilePosition, TileRecord, TrackId, TransportStatus,
    COMBINED_SEARCH_LIMIT, DEFAULT_ARTWORK_SIZE, SEARCH_LIMIT, TILE_COUNT,
};
