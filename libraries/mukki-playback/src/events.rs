//! Launcher Events
//!
//! Change notifications for the UI layer. State-owning components publish on
//! a single-consumer channel; the UI reads the current values back through
//! `TileBinding::view` and `PlaybackCoordinator::snapshot`.

use crate::types::CoordinatorPhase;
use mukki_core::types::TilePosition;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted by tiles and the coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LauncherEvent {
    /// A tile's binding, name or artwork changed
    TileChanged {
        /// Position of the changed tile
        position: TilePosition,
    },

    /// Coordinator-level state changed
    PlaybackChanged(PlaybackSnapshot),
}

/// Coordinator-level observable state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub phase: CoordinatorPhase,

    /// Tile currently driving the shared engine
    pub active_tile: Option<TilePosition>,

    /// Mirrors the engine's transport status
    pub is_playing: bool,

    /// Empty when nothing is loaded
    pub current_track_title: String,

    /// Empty when nothing is loaded
    pub current_track_artist: String,
}

/// Per-tile observable state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub position: TilePosition,
    pub display_name: Option<String>,
    pub artwork: Option<Vec<u8>>,
    pub is_configured: bool,

    /// This tile is active and the engine is playing
    pub is_playing: bool,
}

/// Sending half shared by all publishers.
///
/// A dropped receiver is fine: events are advisory.
#[derive(Debug, Clone)]
pub(crate) struct EventPublisher {
    tx: mpsc::UnboundedSender<LauncherEvent>,
}

impl EventPublisher {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<LauncherEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub(crate) fn publish(&self, event: LauncherEvent) {
        let _ = self.tx.send(event);
    }
}
