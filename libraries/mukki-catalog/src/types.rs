//! Types for catalog API configuration, requests and responses.

use mukki_core::types::{ArtworkRef, CatalogItem, CatalogTrack, MediaId, MediaKind, MediaRef};
use serde::Deserialize;
use std::time::Duration;

/// Default catalog endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.music.apple.com";

/// Configuration for connecting to the music catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog API (e.g., "https://api.music.apple.com")
    pub base_url: String,
    /// Storefront (country) code, e.g. "us"
    pub storefront: String,
    /// Developer token sent as bearer authorization
    pub developer_token: String,
    /// Optional per-user token
    pub user_token: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl CatalogConfig {
    /// Create a config with the default timeout.
    pub fn new(
        base_url: impl Into<String>,
        storefront: impl Into<String>,
        developer_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            storefront: storefront.into(),
            developer_token: developer_token.into(),
            user_token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Attach a user token.
    pub fn with_user_token(mut self, token: impl Into<String>) -> Self {
        self.user_token = Some(token.into());
        self
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Response of the search endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: SearchResultSet,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResultSet {
    pub albums: Option<ResourcePage>,
    pub playlists: Option<ResourcePage>,
}

/// A page of resources, optionally followed by a `next` path.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResourcePage {
    #[serde(default)]
    pub data: Vec<Resource>,
    pub next: Option<String>,
}

/// Response of the album/playlist lookup endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ResourceResponse {
    #[serde(default)]
    pub data: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Resource {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub attributes: Option<Attributes>,
    pub relationships: Option<Relationships>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Attributes {
    pub name: Option<String>,
    pub artist_name: Option<String>,
    pub curator_name: Option<String>,
    pub artwork: Option<ArtworkAttributes>,
    pub duration_in_millis: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtworkAttributes {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Relationships {
    pub tracks: Option<ResourcePage>,
}

impl Resource {
    /// Convert an album or playlist resource.
    ///
    /// Tracks are attached only when the relationship was included.
    pub fn into_item(self, kind: MediaKind) -> CatalogItem {
        let attributes = self.attributes;
        let title = attributes
            .as_ref()
            .and_then(|a| a.name.clone())
            .unwrap_or_default();
        let subtitle = attributes.as_ref().and_then(|a| match kind {
            MediaKind::Album => a.artist_name.clone(),
            MediaKind::Playlist => a.curator_name.clone(),
        });
        let artwork = attributes
            .and_then(|a| a.artwork)
            .map(|art| ArtworkRef {
                url_template: art.url,
                max_width: art.width,
                max_height: art.height,
            });
        let tracks = self
            .relationships
            .and_then(|r| r.tracks)
            .map(|page| page.data.into_iter().map(Resource::into_track).collect());

        CatalogItem {
            media: MediaRef::new(kind, MediaId::new(self.id)),
            title,
            subtitle,
            artwork,
            tracks,
        }
    }

    /// Convert a song (or music video) resource.
    pub fn into_track(self) -> CatalogTrack {
        let attributes = self.attributes;
        CatalogTrack {
            id: self.id.as_str().into(),
            title: attributes
                .as_ref()
                .and_then(|a| a.name.clone())
                .unwrap_or_default(),
            artist: attributes
                .as_ref()
                .and_then(|a| a.artist_name.clone())
                .unwrap_or_default(),
            duration: attributes
                .and_then(|a| a.duration_in_millis)
                .map(Duration::from_millis),
        }
    }
}

/// Path segment for a media kind.
pub(crate) fn resource_path(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Album => "albums",
        MediaKind::Playlist => "playlists",
    }
}
