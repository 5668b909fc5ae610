//! Launcher configuration
use crate::error::{CliError, Result};
use mukki_catalog::{CatalogConfig, DEFAULT_BASE_URL};
use mukki_core::types::DEFAULT_ARTWORK_SIZE;
use mukki_playback::{PlaybackConfig, StaleRequestPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "mukki.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LauncherConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub artwork: ArtworkSettings,

    #[serde(default)]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_storefront")]
    pub storefront: String,

    #[serde(default)]
    pub developer_token: String,

    #[serde(default)]
    pub user_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtworkSettings {
    /// Square edge in pixels
    #[serde(default = "default_artwork_size")]
    pub size: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default)]
    pub stale_requests: StaleRequestPolicy,
}

impl LauncherConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist; otherwise `mukki.toml` is read if present.
    /// Environment variables prefixed `MUKKI_` override both, with `__`
    /// between section and key (e.g. `MUKKI_CATALOG__DEVELOPER_TOKEN`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path.to_path_buf())),
            None => settings
                .add_source(config::File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false)),
        };

        settings = settings.add_source(
            config::Environment::with_prefix("MUKKI")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    ///
    /// The developer token is only required when the catalog is contacted.
    pub fn validate(&self, needs_catalog: bool) -> Result<()> {
        if self.artwork.size == 0 {
            return Err(CliError::Config(
                "artwork.size must be greater than zero".to_string(),
            ));
        }

        if self.catalog.timeout_secs == 0 {
            return Err(CliError::Config(
                "catalog.timeout_secs must be greater than zero".to_string(),
            ));
        }

        if needs_catalog && self.catalog.developer_token.trim().is_empty() {
            return Err(CliError::Config(
                "Catalog developer token is required (set MUKKI_CATALOG__DEVELOPER_TOKEN)"
                    .to_string(),
            ));
        }

        Ok(())
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        let mut config = CatalogConfig::new(
            self.catalog.base_url.clone(),
            self.catalog.storefront.clone(),
            self.catalog.developer_token.clone(),
        );
        config.user_token = self.catalog.user_token.clone();
        config.timeout = self.catalog_timeout();
        config
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.timeout_secs)
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            artwork_size: self.artwork.size,
            stale_requests: self.playback.stale_requests,
        }
    }
}

// Default values
fn default_database_url() -> String {
    "sqlite://./mukki.db".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_storefront() -> String {
    "us".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_artwork_size() -> u32 {
    DEFAULT_ARTWORK_SIZE
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            storefront: default_storefront(),
            developer_token: String::new(),
            user_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ArtworkSettings {
    fn default() -> Self {
        Self {
            size: default_artwork_size(),
        }
    }
}
