//! Mukki Player - Tile Playback
//!
//! Binds the nine launcher tiles to catalog media and drives the single
//! shared player engine on their behalf.
//!
//! This crate provides:
//! - Tile binding (bind, clear, reload, play) with artwork caching
//! - Playback coordination with per-tile resume positions
//! - A single-consumer change notification channel for the UI
//!
//! # Architecture
//!
//! `mukki-playback` depends only on the boundary traits from `mukki-core`:
//! - The record store is any `TileStore`
//! - The catalog is any `CatalogGateway`
//! - The engine is any `PlayerEngine`, reporting state changes as
//!   `EngineEvent`s on a channel
//!
//! No public operation returns an error. Collaborator failures are logged
//! and the in-memory state stays authoritative for the session.
//!
//! # Example
//!
//! ```rust,no_run
//! use mukki_playback::{LauncherContext, LauncherEvent, PlaybackConfig};
//! use mukki_catalog::ArtworkCache;
//! use mukki_core::{types::TilePosition, CatalogGateway, PlayerEngine, TileStore};
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//!
//! # async fn example(
//! #     store: Arc<dyn TileStore>,
//! #     catalog: Arc<dyn CatalogGateway>,
//! #     engine: Arc<dyn PlayerEngine>,
//! #     engine_events: mpsc::UnboundedReceiver<mukki_core::types::EngineEvent>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let artwork = Arc::new(ArtworkCache::http(std::time::Duration::from_secs(30))?);
//! let (launcher, mut events) = LauncherContext::start(
//!     store, catalog, engine, artwork, engine_events, PlaybackConfig::default(),
//! ).await;
//!
//! launcher.tile(TilePosition::new(2)?).request_play().await;
//!
//! while let Some(event) = events.recv().await {
//!     if let LauncherEvent::PlaybackChanged(snapshot) = event {
//!         println!("now playing: {}", snapshot.current_track_title);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod context;
mod coordinator;
mod error;
mod events;
mod mirror;
mod tile;
pub mod types;

pub use context::LauncherContext;
pub use coordinator::{resume_index, PlaybackCoordinator};
pub use error::{PlaybackError, Result};
pub use events::{LauncherEvent, PlaybackSnapshot, TileView};
pub use tile::TileBinding;
pub use types::{CoordinatorPhase, PlaybackConfig, StaleRequestPolicy};
