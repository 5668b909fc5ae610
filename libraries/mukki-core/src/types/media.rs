//! Catalog media types
//!
//! Shapes returned by the catalog gateway and bound to tiles.

use super::ids::{MediaId, TrackId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Result count for single-kind searches
pub const SEARCH_LIMIT: usize = 25;

/// Result count per kind for combined searches
pub const COMBINED_SEARCH_LIMIT: usize = 15;

/// Default square artwork edge in pixels
pub const DEFAULT_ARTWORK_SIZE: u32 = 300;

/// Kind of catalog item a tile can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Album,
    Playlist,
}

impl MediaKind {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Album => "album",
            Self::Playlist => "playlist",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "album" => Some(Self::Album),
            "playlist" => Some(Self::Playlist),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of a bindable catalog item: kind and id always travel together
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaRef {
    pub kind: MediaKind,
    pub id: MediaId,
}

impl MediaRef {
    pub fn new(kind: MediaKind, id: MediaId) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Artwork reference as handed out by the catalog.
///
/// `url_template` carries `{w}` and `{h}` placeholders for the pixel size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkRef {
    pub url_template: String,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl ArtworkRef {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            max_width: None,
            max_height: None,
        }
    }

    /// Concrete address for a `width` x `height` image.
    ///
    /// Sizes are clamped to the source dimensions when those are known.
    pub fn url(&self, width: u32, height: u32) -> String {
        let width = self.max_width.map_or(width, |max| width.min(max));
        let height = self.max_height.map_or(height, |max| height.min(max));
        self.url_template
            .replace("{w}", &width.to_string())
            .replace("{h}", &height.to_string())
    }
}

/// One track of an album or playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub duration: Option<Duration>,
}

impl CatalogTrack {
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: TrackId::new(id),
            title: title.into(),
            artist: artist.into(),
            duration: None,
        }
    }
}

/// Album or playlist as returned by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub media: MediaRef,

    /// Album title or playlist name
    pub title: String,

    /// Album artist or playlist curator
    pub subtitle: Option<String>,

    pub artwork: Option<ArtworkRef>,

    /// Ordered track list; `None` until the detailed item is fetched
    pub tracks: Option<Vec<CatalogTrack>>,
}

/// Combined search response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub albums: Vec<CatalogItem>,
    pub playlists: Vec<CatalogItem>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.albums.is_empty() && self.playlists.is_empty()
    }
}
