//! Coordinator configuration and state types

use mukki_core::types::DEFAULT_ARTWORK_SIZE;
use serde::{Deserialize, Serialize};

/// Coordinator state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordinatorPhase {
    /// Nothing loading or playing
    #[default]
    Idle,
    /// Resolving media and building the queue
    Loading,
    /// Engine confirmed playback
    Playing,
    /// Engine reported pause
    Paused,
}

/// What happens when an older play request finishes after a newer one started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaleRequestPolicy {
    /// Every request runs to completion; the last one to load its queue owns
    /// the active tile pointer.
    #[default]
    LastCompletedWins,
    /// Each request carries a generation number and abandons itself once a
    /// newer request (or `stop`) has been issued.
    DiscardSuperseded,
}

/// Playback configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Square artwork edge requested from the catalog, in pixels
    pub artwork_size: u32,

    /// Handling of overlapping play requests
    pub stale_requests: StaleRequestPolicy,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            artwork_size: DEFAULT_ARTWORK_SIZE,
            stale_requests: StaleRequestPolicy::default(),
        }
    }
}
