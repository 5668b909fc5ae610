//! Playback coordinator - the single owner of the shared player engine
//!
//! Tracks which tile is active, turns a tile's binding into an engine queue
//! positioned at its resume index, and writes the current queue position
//! back into the active tile as playback advances.

use crate::{
    error::{PlaybackError, Result},
    events::{EventPublisher, LauncherEvent, PlaybackSnapshot},
    mirror::TileMirrors,
    types::{CoordinatorPhase, PlaybackConfig, StaleRequestPolicy},
};
use mukki_core::{
    types::{EngineEvent, MediaRef, QueueEntry, TilePosition, TileRecord, TransportStatus},
    CatalogGateway, PlayerEngine, TileStore,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

/// Index to resume from for a freshly resolved track list.
///
/// The stored index is used only when it still points into the list.
pub fn resume_index(stored: u32, track_count: usize) -> usize {
    let index = stored as usize;
    if index < track_count {
        index
    } else {
        0
    }
}

#[derive(Debug, Default)]
struct CoordinatorState {
    phase: CoordinatorPhase,
    active_tile: Option<TilePosition>,
    is_playing: bool,
    current_track_title: String,
    current_track_artist: String,

    /// Media whose tracks make up the engine queue
    loaded_media: Option<MediaRef>,

    /// Bumped by every play request and by `stop`
    generation: u64,
}

impl CoordinatorState {
    fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            phase: self.phase,
            active_tile: self.active_tile,
            is_playing: self.is_playing,
            current_track_title: self.current_track_title.clone(),
            current_track_artist: self.current_track_artist.clone(),
        }
    }
}

/// Coordinates the shared engine between the nine tiles
pub struct PlaybackCoordinator {
    engine: Arc<dyn PlayerEngine>,
    catalog: Arc<dyn CatalogGateway>,
    store: Arc<dyn TileStore>,
    mirrors: TileMirrors,
    events: EventPublisher,
    policy: StaleRequestPolicy,
    state: Mutex<CoordinatorState>,
}

impl PlaybackCoordinator {
    pub(crate) fn new(
        engine: Arc<dyn PlayerEngine>,
        catalog: Arc<dyn CatalogGateway>,
        store: Arc<dyn TileStore>,
        mirrors: TileMirrors,
        events: EventPublisher,
        config: &PlaybackConfig,
    ) -> Self {
        Self {
            engine,
            catalog,
            store,
            mirrors,
            events,
            policy: config.stale_requests,
            state: Mutex::new(CoordinatorState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self) {
        let snapshot = self.state().snapshot();
        self.events.publish(LauncherEvent::PlaybackChanged(snapshot));
    }

    // ===== Observable state =====

    /// Current coordinator-level state
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.state().snapshot()
    }

    pub fn phase(&self) -> CoordinatorPhase {
        self.state().phase
    }

    pub fn active_tile(&self) -> Option<TilePosition> {
        self.state().active_tile
    }

    pub fn is_playing(&self) -> bool {
        self.state().is_playing
    }

    /// Whether `position` is the active tile and the engine is playing
    pub fn is_tile_playing(&self, position: TilePosition) -> bool {
        let state = self.state();
        state.is_playing && state.active_tile == Some(position)
    }

    /// Queue position of the engine's current entry, 0 when there is none
    pub fn current_track_index(&self) -> usize {
        self.engine
            .current_entry()
            .map_or(0, |entry| self.queue_index_of(&entry))
    }

    fn queue_index_of(&self, entry: &QueueEntry) -> usize {
        self.engine
            .entries()
            .iter()
            .position(|e| e.entry_id == entry.entry_id)
            .unwrap_or(0)
    }

    // ===== Play requests =====

    /// Load `tile`'s bound media into the engine and start at its resume index.
    ///
    /// The tile becomes active immediately. Failures are logged and leave the
    /// tile active with playback stopped.
    pub async fn request_play(&self, tile: &TileRecord) {
        let Some(media) = tile.media.clone() else {
            debug!(position = %tile.position, "Play requested for unconfigured tile, ignoring");
            return;
        };

        let generation = {
            let mut state = self.state();
            state.generation += 1;
            state.active_tile = Some(tile.position);
            state.phase = CoordinatorPhase::Loading;
            state.generation
        };
        self.publish();

        info!(
            position = %tile.position,
            media = %media,
            index = tile.last_played_track_index,
            "Loading tile"
        );

        match self
            .load_and_start(tile.position, &media, tile.last_played_track_index, generation)
            .await
        {
            Ok(()) => {}
            Err(PlaybackError::Superseded) => {
                debug!(position = %tile.position, "Play request superseded, abandoning");
            }
            Err(e) => {
                error!(position = %tile.position, media = %media, error = %e, "Failed to start tile");
                let mut state = self.state();
                if state.generation == generation {
                    state.phase = CoordinatorPhase::Idle;
                }
                drop(state);
                self.publish();
            }
        }
    }

    async fn load_and_start(
        &self,
        position: TilePosition,
        media: &MediaRef,
        stored_index: u32,
        generation: u64,
    ) -> Result<()> {
        let item = self
            .catalog
            .fetch_by_id(media)
            .await?
            .ok_or_else(|| PlaybackError::MediaNotFound(media.clone()))?;

        let tracks = item
            .tracks
            .filter(|tracks| !tracks.is_empty())
            .ok_or_else(|| PlaybackError::EmptyTrackList(media.clone()))?;

        let start_at = resume_index(stored_index, tracks.len());
        if start_at as u32 != stored_index {
            warn!(
                position = %position,
                stored = stored_index,
                tracks = tracks.len(),
                "Stored resume index out of range, starting from the top"
            );
        }

        self.ensure_current(generation)?;
        self.engine.set_queue(tracks).await?;

        {
            // The engine now holds this tile's queue, so this tile is active
            // no matter which request started last.
            let mut state = self.state();
            if self.policy == StaleRequestPolicy::DiscardSuperseded
                && state.generation != generation
            {
                return Err(PlaybackError::Superseded);
            }
            state.active_tile = Some(position);
            state.loaded_media = Some(media.clone());
        }
        self.publish();

        self.engine.play().await?;
        self.advance_to(start_at, generation).await;

        debug!(position = %position, index = start_at, "Tile playback started");
        Ok(())
    }

    fn ensure_current(&self, generation: u64) -> Result<()> {
        if self.policy == StaleRequestPolicy::DiscardSuperseded
            && self.state().generation != generation
        {
            return Err(PlaybackError::Superseded);
        }
        Ok(())
    }

    /// Move the transport forward to `index`.
    ///
    /// Uses a direct seek when the engine offers one, otherwise replays
    /// `index` single skips and stops at the first failure.
    async fn advance_to(&self, index: usize, generation: u64) {
        if index == 0 {
            return;
        }

        if self.engine.supports_seek_to_index() {
            if let Err(e) = self.engine.seek_to_index(index).await {
                warn!(index, error = %e, "Seek to resume index failed");
            }
            return;
        }

        for reached in 0..index {
            if self.ensure_current(generation).is_err() {
                debug!(reached, "Resume replay superseded");
                return;
            }
            if let Err(e) = self.engine.skip_to_next().await {
                warn!(reached, target = index, error = %e, "Skip failed during resume, staying put");
                return;
            }
        }
    }

    // ===== Transport commands =====

    pub async fn pause(&self) {
        if let Err(e) = self.engine.pause().await {
            warn!(error = %e, "Pause failed");
        }
    }

    pub async fn resume(&self) {
        if let Err(e) = self.engine.play().await {
            warn!(error = %e, "Resume failed");
        }
    }

    pub async fn skip_to_next(&self) {
        if let Err(e) = self.engine.skip_to_next().await {
            warn!(error = %e, "Skip to next failed");
        }
    }

    pub async fn skip_to_previous(&self) {
        if let Err(e) = self.engine.skip_to_previous().await {
            warn!(error = %e, "Skip to previous failed");
        }
    }

    /// Stop the engine and deactivate the current tile.
    ///
    /// Persisted tile bindings are left untouched.
    pub async fn stop(&self) {
        {
            let mut state = self.state();
            state.generation += 1;
            state.active_tile = None;
            state.loaded_media = None;
            state.phase = CoordinatorPhase::Idle;
        }
        self.publish();

        if let Err(e) = self.engine.stop().await {
            warn!(error = %e, "Stop failed");
        }
    }

    /// Pause if playing, otherwise resume
    pub async fn toggle_play_pause(&self) {
        if self.is_playing() {
            self.pause().await;
        } else {
            self.resume().await;
        }
    }

    // ===== Engine notifications =====

    /// React to a state change reported by the engine
    pub async fn handle_engine_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::TransportChanged(status) => self.on_transport_changed(status),
            EngineEvent::CurrentEntryChanged(entry) => self.on_entry_changed(entry).await,
        }
    }

    fn on_transport_changed(&self, status: TransportStatus) {
        {
            let mut state = self.state();
            state.is_playing = status.is_playing();
            // A queue swap may report Stopped before the new queue starts
            let loading = state.phase == CoordinatorPhase::Loading;
            state.phase = match status {
                TransportStatus::Playing => CoordinatorPhase::Playing,
                TransportStatus::Paused => CoordinatorPhase::Paused,
                TransportStatus::Stopped if loading => CoordinatorPhase::Loading,
                TransportStatus::Stopped => CoordinatorPhase::Idle,
            };
        }
        debug!(?status, "Transport changed");
        self.publish();
    }

    async fn on_entry_changed(&self, entry: Option<QueueEntry>) {
        let Some(entry) = entry else {
            {
                let mut state = self.state();
                state.current_track_title.clear();
                state.current_track_artist.clear();
            }
            self.publish();
            return;
        };

        let index = self.queue_index_of(&entry);

        let (active, loaded) = {
            let mut state = self.state();
            state.current_track_title = entry.track.title.clone();
            state.current_track_artist = entry.track.artist.clone();
            (state.active_tile, state.loaded_media.clone())
        };
        self.publish();

        let (Some(position), Some(loaded)) = (active, loaded) else {
            return;
        };

        let track_id = entry.track_id().clone();
        let updated = self.mirrors.update(position, |record| {
            // Skip tiles that were cleared or re-bound since this queue loaded
            record.media.as_ref() == Some(&loaded)
                && record.set_resume_point(index as u32, Some(track_id))
        });

        if updated.is_none() {
            debug!(position = %position, index, "Resume point unchanged or tile re-bound, not recording");
            return;
        }

        debug!(position = %position, index, track = %entry.track_id(), "Recording resume point");
        if let Err(e) = self.mirrors.persist(position, self.store.as_ref()).await {
            warn!(position = %position, error = %e, "Failed to persist resume point");
        }
        self.events.publish(LauncherEvent::TileChanged { position });
    }
}
