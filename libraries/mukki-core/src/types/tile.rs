//! Tile slot types
//!
//! A tile is one of nine fixed slots. Each slot keeps its identity for the
//! whole lifetime of the installation; only its binding fields churn.

use super::ids::{TileId, TrackId};
use super::media::MediaRef;
use crate::error::{MukkiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of tile slots
pub const TILE_COUNT: usize = 9;

/// Slot position of a tile, always in `0..TILE_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TilePosition(u8);

impl TilePosition {
    /// Create a position, rejecting anything outside `0..TILE_COUNT`
    pub fn new(position: u8) -> Result<Self> {
        if usize::from(position) < TILE_COUNT {
            Ok(Self(position))
        } else {
            Err(MukkiError::invalid_input(format!(
                "tile position {} out of range 0..{}",
                position, TILE_COUNT
            )))
        }
    }

    /// All nine positions in ascending order
    pub fn all() -> impl Iterator<Item = TilePosition> {
        (0..TILE_COUNT as u8).map(TilePosition)
    }

    /// Raw position value
    pub fn get(self) -> u8 {
        self.0
    }

    /// Position as an array index
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl TryFrom<u8> for TilePosition {
    type Error = MukkiError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TilePosition> for u8 {
    fn from(position: TilePosition) -> Self {
        position.0
    }
}

impl fmt::Display for TilePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Durable record of one tile slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    /// Stable identifier
    pub id: TileId,

    /// Fixed slot position
    pub position: TilePosition,

    /// Bound catalog item, `None` while unconfigured
    pub media: Option<MediaRef>,

    /// Title of the bound item
    pub display_name: Option<String>,

    /// Cached artwork bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<Vec<u8>>,

    /// Track position to resume from; 0 whenever unbound
    pub last_played_track_index: u32,

    /// Track identity at the resume position
    pub last_played_track_id: Option<TrackId>,
}

impl TileRecord {
    /// Fresh, unbound record with a new identifier
    pub fn new(position: TilePosition) -> Self {
        Self {
            id: TileId::generate(),
            position,
            media: None,
            display_name: None,
            artwork: None,
            last_played_track_index: 0,
            last_played_track_id: None,
        }
    }

    /// Whether a catalog item is bound
    pub fn is_configured(&self) -> bool {
        self.media.is_some()
    }

    /// Overwrite the binding and reset the resume point
    pub fn bind(
        &mut self,
        media: MediaRef,
        display_name: impl Into<String>,
        artwork: Option<Vec<u8>>,
    ) {
        self.media = Some(media);
        self.display_name = Some(display_name.into());
        self.artwork = artwork;
        self.last_played_track_index = 0;
        self.last_played_track_id = None;
    }

    /// Drop the binding and everything cached for it
    pub fn clear(&mut self) {
        self.media = None;
        self.display_name = None;
        self.artwork = None;
        self.last_played_track_index = 0;
        self.last_played_track_id = None;
    }

    /// Record a new resume point.
    ///
    /// Returns `false` and leaves the record untouched when the tile is
    /// unbound, since an unbound tile must keep index 0.
    pub fn set_resume_point(&mut self, index: u32, track_id: Option<TrackId>) -> bool {
        if self.media.is_none() {
            return false;
        }
        self.last_played_track_index = index;
        if track_id.is_some() {
            self.last_played_track_id = track_id;
        }
        true
    }
}
