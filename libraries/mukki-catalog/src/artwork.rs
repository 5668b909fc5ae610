//! Artwork retrieval with an in-memory address cache.

use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Fetches raw image bytes for an address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtworkFetcher: Send + Sync {
    async fn fetch(&self, address: &str) -> Result<Vec<u8>>;
}

/// Plain HTTP GET fetcher.
pub struct HttpArtworkFetcher {
    http: Client,
}

impl HttpArtworkFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(format!("MukkiPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ArtworkFetcher for HttpArtworkFetcher {
    async fn fetch(&self, address: &str) -> Result<Vec<u8>> {
        let response = self.http.get(address).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                CatalogError::Unreachable(e.to_string())
            } else {
                CatalogError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::ServerError {
                status: status.as_u16(),
                message: format!("artwork fetch failed for {address}"),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Maps artwork addresses to downloaded bytes.
///
/// Successful downloads are kept for the life of the cache. Failures are not
/// cached, so a later call retries the network. Concurrent fetches of the
/// same address share one download.
pub struct ArtworkCache {
    fetcher: Arc<dyn ArtworkFetcher>,
    entries: Mutex<HashMap<String, Arc<OnceCell<Vec<u8>>>>>,
}

impl ArtworkCache {
    pub fn new(fetcher: Arc<dyn ArtworkFetcher>) -> Self {
        Self {
            fetcher,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cache backed by [`HttpArtworkFetcher`].
    pub fn http(timeout: Duration) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpArtworkFetcher::new(timeout)?)))
    }

    /// Return the bytes for `address`, hitting the network at most once per
    /// successfully cached address. Failures yield `None`.
    pub async fn fetch(&self, address: &str) -> Option<Vec<u8>> {
        let cell = Arc::clone(self.entries().entry(address.to_string()).or_default());

        if let Some(bytes) = cell.get() {
            debug!(address, "Artwork cache hit");
            return Some(bytes.clone());
        }

        let downloaded = cell
            .get_or_try_init(|| async {
                let bytes = self.fetcher.fetch(address).await?;
                debug!(address, size = bytes.len(), "Artwork downloaded");
                Ok::<_, CatalogError>(bytes)
            })
            .await;

        match downloaded {
            Ok(bytes) => Some(bytes.clone()),
            Err(e) => {
                warn!(address, error = %e, "Failed to fetch artwork");
                None
            }
        }
    }

    pub fn contains(&self, address: &str) -> bool {
        self.entries()
            .get(address)
            .is_some_and(|cell| cell.initialized())
    }

    /// Number of cached downloads
    pub fn len(&self) -> usize {
        self.entries()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Arc<OnceCell<Vec<u8>>>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
