//! HTTP catalog client.

use crate::error::{CatalogError, Result};
use crate::types::{
    resource_path, CatalogConfig, Resource, ResourcePage, ResourceResponse, SearchResponse,
    SearchResultSet,
};
use async_trait::async_trait;
use mukki_core::types::{
    CatalogItem, MediaKind, MediaRef, SearchResults, COMBINED_SEARCH_LIMIT, SEARCH_LIMIT,
};
use mukki_core::CatalogGateway;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Upper bound on followed track pages, so a looping `next` link cannot spin forever.
const MAX_TRACK_PAGES: usize = 50;

/// Client for an Apple-Music-style catalog REST API.
///
/// # Example
///
/// ```ignore
/// use mukki_catalog::{CatalogClient, CatalogConfig};
/// use mukki_core::CatalogGateway;
///
/// let config = CatalogConfig::new("https://api.music.apple.com", "us", developer_token);
/// let catalog = CatalogClient::new(config)?;
///
/// let albums = catalog.search_albums("sesame street").await?;
/// println!("Found {} albums", albums.len());
/// ```
pub struct CatalogClient {
    http: Client,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CatalogError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("MukkiPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config: CatalogConfig {
                base_url,
                ..config
            },
        })
    }

    /// Get the catalog base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn catalog_url(&self, path: &str) -> String {
        format!(
            "{}/v1/catalog/{}/{}",
            self.config.base_url, self.config.storefront, path
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.bearer_auth(&self.config.developer_token);
        match &self.config.user_token {
            Some(token) => request.header("Music-User-Token", token),
            None => request,
        }
    }

    /// GET a JSON document. A 404 maps to `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        debug!(url = %url, "Catalog request");

        let response = self
            .authorized(self.http.get(url).query(query))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    CatalogError::Unreachable(e.to_string())
                } else {
                    CatalogError::Request(e)
                }
            })?;

        let status = response.status();

        if status.is_success() {
            let body = response
                .json()
                .await
                .map_err(|e| CatalogError::ParseError(e.to_string()))?;
            Ok(Some(body))
        } else if status == StatusCode::NOT_FOUND {
            Ok(None)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(CatalogError::Unauthorized {
                status: status.as_u16(),
            })
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(CatalogError::ServerError {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn search(&self, term: &str, types: &str, limit: usize) -> Result<SearchResultSet> {
        let query = [
            ("term", term.to_string()),
            ("types", types.to_string()),
            ("limit", limit.to_string()),
        ];
        let response: Option<SearchResponse> =
            self.get_json(&self.catalog_url("search"), &query).await?;

        Ok(response.map(|r| r.results).unwrap_or_default())
    }

    /// Follow `next` links of a track relationship until exhausted.
    async fn collect_remaining_tracks(
        &self,
        mut next: Option<String>,
        resources: &mut Vec<Resource>,
    ) -> Result<()> {
        let mut pages = 0;
        while let Some(path) = next.take() {
            pages += 1;
            if pages > MAX_TRACK_PAGES {
                warn!(pages, "Track list pagination limit reached, truncating");
                break;
            }

            let url = format!("{}{}", self.config.base_url, path);
            let page: Option<ResourcePage> = self.get_json(&url, &[]).await?;
            let Some(page) = page else { break };

            resources.extend(page.data);
            next = page.next;
        }
        Ok(())
    }
}

fn into_items(page: Option<ResourcePage>, kind: MediaKind, limit: usize) -> Vec<CatalogItem> {
    page.map(|p| {
        p.data
            .into_iter()
            .take(limit)
            .map(|r| r.into_item(kind))
            .collect()
    })
    .unwrap_or_default()
}

#[async_trait]
impl CatalogGateway for CatalogClient {
    async fn search_albums(&self, query: &str) -> mukki_core::Result<Vec<CatalogItem>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let results = self.search(query, "albums", SEARCH_LIMIT).await?;
        Ok(into_items(results.albums, MediaKind::Album, SEARCH_LIMIT))
    }

    async fn search_playlists(&self, query: &str) -> mukki_core::Result<Vec<CatalogItem>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let results = self.search(query, "playlists", SEARCH_LIMIT).await?;
        Ok(into_items(results.playlists, MediaKind::Playlist, SEARCH_LIMIT))
    }

    async fn search_all(&self, query: &str) -> mukki_core::Result<SearchResults> {
        if query.trim().is_empty() {
            return Ok(SearchResults::default());
        }
        let results = self
            .search(query, "albums,playlists", COMBINED_SEARCH_LIMIT)
            .await?;
        Ok(SearchResults {
            albums: into_items(results.albums, MediaKind::Album, COMBINED_SEARCH_LIMIT),
            playlists: into_items(results.playlists, MediaKind::Playlist, COMBINED_SEARCH_LIMIT),
        })
    }

    async fn fetch_by_id(&self, media: &MediaRef) -> mukki_core::Result<Option<CatalogItem>> {
        let url = self.catalog_url(&format!(
            "{}/{}",
            resource_path(media.kind),
            media.id.as_str()
        ));
        let query = [("include", "tracks".to_string())];

        let response: Option<ResourceResponse> = self.get_json(&url, &query).await?;
        let Some(mut resource) = response.and_then(|r| r.data.into_iter().next()) else {
            debug!(media = %media, "Catalog item not found");
            return Ok(None);
        };

        if let Some(tracks) = resource
            .relationships
            .as_mut()
            .and_then(|r| r.tracks.as_mut())
        {
            let next = tracks.next.take();
            self.collect_remaining_tracks(next, &mut tracks.data).await?;
        }

        let item = resource.into_item(media.kind);
        debug!(
            media = %media,
            tracks = item.tracks.as_ref().map_or(0, Vec::len),
            "Fetched catalog item"
        );
        Ok(Some(item))
    }
}
