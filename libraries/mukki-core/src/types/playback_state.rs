/// Player engine state types
use super::ids::TrackId;
use super::media::CatalogTrack;
use serde::{Deserialize, Serialize};

/// Transport status as reported by the external player engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl TransportStatus {
    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }
}

/// One entry of the engine's playback queue.
///
/// `entry_id` is assigned by the engine and is unique within a queue, so the
/// same track appearing twice still yields two distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub entry_id: String,
    pub track: CatalogTrack,
}

impl QueueEntry {
    pub fn track_id(&self) -> &TrackId {
        &self.track.id
    }
}

/// Change notifications pushed by the player engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Transport status changed (play/pause/stop)
    TransportChanged(TransportStatus),

    /// The current queue entry changed; `None` when the queue ran out
    CurrentEntryChanged(Option<QueueEntry>),
}
