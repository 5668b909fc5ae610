use crate::{
    coordinator::PlaybackCoordinator,
    events::{EventPublisher, LauncherEvent},
    mirror::TileMirrors,
    tile::TileBinding,
    types::PlaybackConfig,
};
use mukki_catalog::ArtworkCache;
use mukki_core::{
    types::{EngineEvent, TilePosition},
    CatalogGateway, PlayerEngine, TileStore,
};
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, error, info};

/// The launcher's single owning context.
///
/// Holds the shared engine, store and catalog, the nine tile bindings and
/// the coordinator. Engine notifications are pumped into the coordinator on
/// a background task for as long as the context lives.
pub struct LauncherContext {
    store: Arc<dyn TileStore>,
    catalog: Arc<dyn CatalogGateway>,
    coordinator: Arc<PlaybackCoordinator>,
    tiles: Vec<TileBinding>,
    pump: JoinHandle<()>,
}

impl LauncherContext {
    /// Build the context and load all tile records.
    ///
    /// Missing tile slots are created first. If the store cannot be read the
    /// tiles start without backing records and every tile operation becomes
    /// a no-op.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start(
        store: Arc<dyn TileStore>,
        catalog: Arc<dyn CatalogGateway>,
        engine: Arc<dyn PlayerEngine>,
        artwork: Arc<ArtworkCache>,
        engine_events: mpsc::UnboundedReceiver<EngineEvent>,
        config: PlaybackConfig,
    ) -> (Self, mpsc::UnboundedReceiver<LauncherEvent>) {
        let (events, receiver) = EventPublisher::channel();
        let mirrors = TileMirrors::new();

        match store.create_if_absent().await {
            Ok(records) => {
                info!(count = records.len(), "Tiles loaded");
                for record in records {
                    mirrors.set(record.position, Some(record));
                }
            }
            Err(e) => error!(error = %e, "Failed to initialise tile records"),
        }

        let coordinator = Arc::new(PlaybackCoordinator::new(
            engine,
            Arc::clone(&catalog),
            Arc::clone(&store),
            mirrors.clone(),
            events.clone(),
            &config,
        ));

        let tiles = TilePosition::all()
            .map(|position| {
                TileBinding::new(
                    position,
                    mirrors.clone(),
                    Arc::clone(&store),
                    Arc::clone(&catalog),
                    Arc::clone(&artwork),
                    Arc::clone(&coordinator),
                    events.clone(),
                    config.artwork_size,
                )
            })
            .collect();

        let pump = tokio::spawn(pump_engine_events(
            Arc::clone(&coordinator),
            engine_events,
        ));

        let context = Self {
            store,
            catalog,
            coordinator,
            tiles,
            pump,
        };
        (context, receiver)
    }

    pub fn tile(&self, position: TilePosition) -> &TileBinding {
        &self.tiles[position.index()]
    }

    pub fn tiles(&self) -> &[TileBinding] {
        &self.tiles
    }

    pub fn coordinator(&self) -> &Arc<PlaybackCoordinator> {
        &self.coordinator
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogGateway> {
        &self.catalog
    }

    pub fn store(&self) -> &Arc<dyn TileStore> {
        &self.store
    }
}

impl Drop for LauncherContext {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

async fn pump_engine_events(
    coordinator: Arc<PlaybackCoordinator>,
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
) {
    while let Some(event) = events.recv().await {
        coordinator.handle_engine_event(event).await;
    }
    debug!("Engine event stream closed");
}
