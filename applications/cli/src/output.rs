//! Terminal rendering of tiles and catalog results

use mukki_core::types::{CatalogItem, TileRecord};
use serde::Serialize;

/// Tile as shown by `mukki tiles`; artwork is reduced to its size
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileSummary {
    pub position: u8,
    pub id: String,
    pub kind: Option<String>,
    pub media_id: Option<String>,
    pub display_name: Option<String>,
    pub artwork_bytes: Option<usize>,
    pub resume_index: u32,
    pub resume_track_id: Option<String>,
}

impl From<&TileRecord> for TileSummary {
    fn from(record: &TileRecord) -> Self {
        Self {
            position: record.position.get(),
            id: record.id.to_string(),
            kind: record.media.as_ref().map(|m| m.kind.to_string()),
            media_id: record.media.as_ref().map(|m| m.id.to_string()),
            display_name: record.display_name.clone(),
            artwork_bytes: record.artwork.as_ref().map(Vec::len),
            resume_index: record.last_played_track_index,
            resume_track_id: record.last_played_track_id.as_ref().map(ToString::to_string),
        }
    }
}

/// One line per tile
pub fn tile_line(record: &TileRecord) -> String {
    match &record.media {
        Some(media) => format!(
            "[{}] {} ({}) - resume at track {}{}",
            record.position,
            record.display_name.as_deref().unwrap_or("untitled"),
            media,
            record.last_played_track_index + 1,
            if record.artwork.is_some() { ", artwork cached" } else { "" }
        ),
        None => format!("[{}] (empty)", record.position),
    }
}

/// One line per catalog result
pub fn item_line(item: &CatalogItem) -> String {
    match &item.subtitle {
        Some(subtitle) => format!("{}  {} - {}", item.media, item.title, subtitle),
        None => format!("{}  {}", item.media, item.title),
    }
}
