//! Mukki Catalog
//!
//! HTTP access to an Apple-Music-style music catalog.
//!
//! # Features
//!
//! - **Search**: albums, playlists, or both at once
//! - **Lookup**: fetch an album or playlist with its full track list
//! - **Artwork**: download cover images with an in-memory address cache
//!
//! # Example
//!
//! ```ignore
//! use mukki_catalog::{ArtworkCache, CatalogClient, CatalogConfig};
//! use mukki_core::CatalogGateway;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CatalogConfig::new("https://api.music.apple.com", "us", "dev-token");
//!     let catalog = CatalogClient::new(config)?;
//!
//!     let results = catalog.search_all("lullabies").await?;
//!     println!("{} albums, {} playlists", results.albums.len(), results.playlists.len());
//!
//!     let artwork = ArtworkCache::http(std::time::Duration::from_secs(30))?;
//!     if let Some(art) = results.albums.first().and_then(|a| a.artwork.as_ref()) {
//!         let bytes = artwork.fetch(&art.url(300, 300)).await;
//!         println!("cover: {:?} bytes", bytes.map(|b| b.len()));
//!     }
//!
//!     Ok(())
//! }
//! ```

mod artwork;
mod client;
mod error;
mod types;

pub use artwork::{ArtworkCache, ArtworkFetcher, HttpArtworkFetcher};
pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use types::{CatalogConfig, DEFAULT_BASE_URL};
