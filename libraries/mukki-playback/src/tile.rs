//! Tile binding manager
//!
//! One `TileBinding` per slot. It owns the slot's view of the shared mirror
//! table and is the only place bindings are rewritten.

use crate::{
    coordinator::PlaybackCoordinator,
    events::{EventPublisher, LauncherEvent, TileView},
    mirror::TileMirrors,
};
use mukki_catalog::ArtworkCache;
use mukki_core::{
    types::{ArtworkRef, CatalogItem, MediaId, MediaKind, MediaRef, TilePosition, TileRecord},
    CatalogGateway, TileStore,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct TileBinding {
    position: TilePosition,
    mirrors: TileMirrors,
    store: Arc<dyn TileStore>,
    catalog: Arc<dyn CatalogGateway>,
    artwork: Arc<ArtworkCache>,
    coordinator: Arc<PlaybackCoordinator>,
    events: EventPublisher,
    artwork_size: u32,
}

impl TileBinding {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        position: TilePosition,
        mirrors: TileMirrors,
        store: Arc<dyn TileStore>,
        catalog: Arc<dyn CatalogGateway>,
        artwork: Arc<ArtworkCache>,
        coordinator: Arc<PlaybackCoordinator>,
        events: EventPublisher,
        artwork_size: u32,
    ) -> Self {
        Self {
            position,
            mirrors,
            store,
            catalog,
            artwork,
            coordinator,
            events,
            artwork_size,
        }
    }

    pub fn position(&self) -> TilePosition {
        self.position
    }

    /// Copy of the in-memory record, `None` if the slot has no backing record
    pub fn record(&self) -> Option<TileRecord> {
        self.mirrors.get(self.position)
    }

    pub fn is_configured(&self) -> bool {
        self.record().is_some_and(|r| r.is_configured())
    }

    /// Observable fields for display
    pub fn view(&self) -> TileView {
        let record = self.record();
        TileView {
            position: self.position,
            display_name: record.as_ref().and_then(|r| r.display_name.clone()),
            artwork: record.as_ref().and_then(|r| r.artwork.clone()),
            is_configured: record.as_ref().is_some_and(TileRecord::is_configured),
            is_playing: self.coordinator.is_tile_playing(self.position),
        }
    }

    /// Bind this tile to a catalog item.
    ///
    /// Artwork is fetched first; the binding then replaces every binding field
    /// at once and the resume point goes back to the first track. A failed
    /// artwork download leaves the tile without artwork.
    pub async fn bind(
        &self,
        kind: MediaKind,
        id: MediaId,
        display_name: impl Into<String>,
        artwork: Option<&ArtworkRef>,
    ) {
        let media = MediaRef::new(kind, id);
        let display_name = display_name.into();

        let artwork_bytes = match artwork
            .and_then(|art| self.catalog.resolve_artwork_address(art, self.artwork_size))
        {
            Some(address) => self.artwork.fetch(&address).await,
            None => None,
        };

        let updated = self.mirrors.update(self.position, |record| {
            record.bind(media.clone(), display_name.clone(), artwork_bytes);
            true
        });
        if updated.is_none() {
            debug!(position = %self.position, "No backing record, bind ignored");
            return;
        }

        info!(position = %self.position, media = %media, name = %display_name, "Tile bound");
        self.persist().await;
        self.events.publish(LauncherEvent::TileChanged {
            position: self.position,
        });
    }

    /// Bind to a search or lookup result
    pub async fn bind_item(&self, item: &CatalogItem) {
        self.bind(
            item.media.kind,
            item.media.id.clone(),
            item.title.clone(),
            item.artwork.as_ref(),
        )
        .await;
    }

    /// Drop the binding and reset the resume point
    pub async fn clear(&self) {
        let updated = self.mirrors.update(self.position, |record| {
            record.clear();
            true
        });
        if updated.is_none() {
            debug!(position = %self.position, "No backing record, clear ignored");
            return;
        }

        info!(position = %self.position, "Tile cleared");
        self.persist().await;
        self.events.publish(LauncherEvent::TileChanged {
            position: self.position,
        });
    }

    /// Hand this tile to the coordinator. No-op while unbound.
    pub async fn request_play(&self) {
        match self.record() {
            Some(record) if record.is_configured() => {
                self.coordinator.request_play(&record).await;
            }
            _ => debug!(position = %self.position, "Tile not configured, nothing to play"),
        }
    }

    /// Re-read the record from the store into the mirror.
    ///
    /// A failed read keeps the current mirror.
    pub async fn reload(&self) {
        match self.store.get(self.position).await {
            Ok(record) => {
                if record.is_none() {
                    warn!(position = %self.position, "No stored record for tile");
                }
                self.mirrors.set(self.position, record);
                self.events.publish(LauncherEvent::TileChanged {
                    position: self.position,
                });
            }
            Err(e) => warn!(position = %self.position, error = %e, "Failed to reload tile"),
        }
    }

    async fn persist(&self) {
        if let Err(e) = self.mirrors.persist(self.position, self.store.as_ref()).await {
            warn!(position = %self.position, error = %e, "Failed to persist tile, keeping in-memory state");
        }
    }
}
