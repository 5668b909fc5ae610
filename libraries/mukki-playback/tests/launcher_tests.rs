//! Integration tests for tile binding and playback coordination


use mukki_core::types::{ArtworkRef, CatalogTrack, MediaId, MediaKind, QueueEntry, TrackId};
use mukki_core::TileStore;
use mukki_playback::{
    CoordinatorPhase, LauncherEvent, PlaybackConfig, StaleRequestPolicy,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use test_helpers::*;

// =============================================================================
// Startup
// =============================================================================

#[tokio::test]
async fn test_start_creates_nine_unbound_tiles() {
    let harness = Harness::new().await;

    assert_eq!(harness.launcher.tiles().len(), 9);
    for (i, tile) in harness.launcher.tiles().iter().enumerate() {
        assert_eq!(tile.position(), pos(i as u8));
        let record = tile.record().expect("every slot has a record");
        assert!(!record.is_configured());
        assert_eq!(record.last_played_track_index, 0);
    }
}

#[tokio::test]
async fn test_restart_reuses_existing_tiles() {
    let harness = Harness::new().await;
    let first: Vec<_> = harness
        .launcher
        .tiles()
        .iter()
        .map(|t| t.record().unwrap())
        .collect();
    harness.bind_new(4, album_ref("a4"), 3).await;

    // Second process over the same database
    let (engine, engine_events) = FakeEngine::new();
    let store = harness.store.clone();
    let Harness { db, .. } = harness;
    let restarted = Harness::start(db, store, PlaybackConfig::default(), engine, engine_events).await;

    let second: Vec<_> = restarted
        .launcher
        .tiles()
        .iter()
        .map(|t| t.record().unwrap())
        .collect();

    assert_eq!(restarted.store.get_all().await.unwrap().len(), 9);
    for (before, after) in first.iter().zip(&second) {
        assert_eq!(before.id, after.id, "tile ids are stable across restarts");
    }
    assert_eq!(second[4].media, Some(album_ref("a4")));
}

#[tokio::test]
async fn test_unreadable_store_makes_tiles_inert() {
    let db = TestDb::new().await;
    let store = Arc::new(FlakyStore::new(Arc::new(db.store())));
    store.fail_init.store(true, Ordering::SeqCst);
    let (engine, engine_events) = FakeEngine::new();

    let harness = Harness::start(db, store, PlaybackConfig::default(), engine, engine_events).await;
    let tile = harness.launcher.tile(pos(0));

    tile.bind(MediaKind::Album, MediaId::new("a1"), "Ignored", None).await;
    tile.clear().await;
    tile.request_play().await;

    assert!(tile.record().is_none());
    assert!(harness.engine.calls().is_empty());
    assert_eq!(harness.store.saves.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Binding
// =============================================================================

#[tokio::test]
async fn test_bind_persists_binding_and_artwork() {
    let mut harness = Harness::new().await;

    let item = harness.bind_new(2, album_ref("abbey"), 10).await;

    let stored = harness.stored(2).await;
    assert_eq!(stored.media, Some(album_ref("abbey")));
    assert_eq!(stored.display_name.as_deref(), Some(item.title.as_str()));
    let expected_address = item.artwork.as_ref().unwrap().url(300, 300);
    assert_eq!(stored.artwork, Some(expected_address.into_bytes()));

    let view = harness.launcher.tile(pos(2)).view();
    assert!(view.is_configured);
    assert!(!view.is_playing);
    assert_eq!(view.display_name, stored.display_name);

    assert!(harness
        .drain_events()
        .contains(&LauncherEvent::TileChanged { position: pos(2) }));
}

#[tokio::test]
async fn test_bind_resets_resume_point() {
    let harness = Harness::new().await;
    harness.bind_new(1, album_ref("old"), 6).await;

    let tile = harness.launcher.tile(pos(1));
    tile.request_play().await;
    harness.engine.advance();
    harness.engine.advance();
    let h = &harness;
    eventually_async("resume point persisted", move || async move {
        let stored = h.stored(1).await;
        stored.last_played_track_index == 2 && stored.last_played_track_id.is_some()
    })
    .await;

    harness.bind_new(1, playlist_ref("new"), 4).await;

    let stored = harness.stored(1).await;
    assert_eq!(stored.media, Some(playlist_ref("new")));
    assert_eq!(stored.last_played_track_index, 0);
    assert!(stored.last_played_track_id.is_none());
}

#[tokio::test]
async fn test_bind_then_clear_returns_to_unbound() {
    let harness = Harness::new().await;
    harness.bind_new(7, playlist_ref("pl.7"), 5).await;

    harness.launcher.tile(pos(7)).clear().await;

    let stored = harness.stored(7).await;
    assert!(stored.media.is_none());
    assert!(stored.display_name.is_none());
    assert!(stored.artwork.is_none());
    assert_eq!(stored.last_played_track_index, 0);
    assert!(stored.last_played_track_id.is_none());
    assert!(!harness.launcher.tile(pos(7)).is_configured());
}

#[tokio::test]
async fn test_same_artwork_downloaded_once() {
    let harness = Harness::new().await;
    let artwork = ArtworkRef::new("https://art.test/shared/{w}x{h}.jpg");

    for position in [0, 1] {
        harness
            .launcher
            .tile(pos(position))
            .bind(MediaKind::Album, MediaId::new("same"), "Same", Some(&artwork))
            .await;
    }

    assert_eq!(harness.artwork.requests.lock().unwrap().len(), 1);
    assert_eq!(
        harness.stored(0).await.artwork,
        harness.stored(1).await.artwork
    );
}

#[tokio::test]
async fn test_failed_artwork_still_binds() {
    let harness = Harness::new().await;
    let tile = harness.launcher.tile(pos(3));

    tile.bind(
        MediaKind::Playlist,
        MediaId::new("pl.3"),
        "Car Songs",
        Some(&ArtworkRef::new("https://broken.test/{w}x{h}.jpg")),
    )
    .await;

    let stored = harness.stored(3).await;
    assert_eq!(stored.display_name.as_deref(), Some("Car Songs"));
    assert!(stored.artwork.is_none());
}

#[tokio::test]
async fn test_save_failure_keeps_in_memory_binding() {
    let harness = Harness::new().await;
    harness.store.fail_saves.store(true, Ordering::SeqCst);

    harness.bind_new(5, album_ref("a5"), 2).await;

    assert!(harness.launcher.tile(pos(5)).is_configured());
    assert!(harness.stored(5).await.media.is_none(), "write was rejected");
}

#[tokio::test]
async fn test_reload_reads_store() {
    let harness = Harness::new().await;

    let mut record = harness.stored(6).await;
    record.bind(album_ref("outside"), "Written Elsewhere", None);
    harness.db.store().save(&record).await.unwrap();

    let tile = harness.launcher.tile(pos(6));
    assert!(!tile.is_configured());

    tile.reload().await;
    assert_eq!(tile.record(), Some(record));
}

// =============================================================================
// Play requests
// =============================================================================

#[tokio::test]
async fn test_play_unconfigured_tile_is_noop() {
    let harness = Harness::new().await;

    harness.launcher.tile(pos(8)).request_play().await;

    assert!(harness.engine.calls().is_empty());
    assert_eq!(harness.catalog.fetches.load(Ordering::SeqCst), 0);
    assert!(harness.launcher.coordinator().active_tile().is_none());
}

#[tokio::test]
async fn test_play_loads_full_queue_in_order() {
    let harness = Harness::new().await;
    let item = harness.bind_new(0, playlist_ref("pl.0"), 4).await;

    harness.launcher.tile(pos(0)).request_play().await;

    let expected: Vec<String> = item
        .tracks
        .unwrap()
        .iter()
        .map(|t| t.id.to_string())
        .collect();
    assert_eq!(harness.engine.queue_loads(), vec![expected]);
    assert_eq!(harness.engine.count(&EngineCall::Play), 1);
    assert_eq!(harness.engine.count(&EngineCall::SkipToNext), 0);
}

#[tokio::test]
async fn test_is_playing_follows_engine_notifications() {
    let harness = Harness::new().await;
    harness.bind_new(2, album_ref("a2"), 3).await;
    let coordinator = harness.launcher.coordinator();

    harness.launcher.tile(pos(2)).request_play().await;

    // The engine's Playing notification has not been processed yet
    assert_eq!(coordinator.active_tile(), Some(pos(2)));
    assert_eq!(coordinator.phase(), CoordinatorPhase::Loading);
    assert!(!coordinator.is_playing());

    eventually("engine reports playing", || coordinator.is_playing()).await;
    assert_eq!(coordinator.phase(), CoordinatorPhase::Playing);
    assert!(harness.launcher.tile(pos(2)).view().is_playing);
    assert!(!harness.launcher.tile(pos(3)).view().is_playing);

    coordinator.toggle_play_pause().await;
    eventually("engine reports paused", || !coordinator.is_playing()).await;
    assert_eq!(coordinator.phase(), CoordinatorPhase::Paused);
    assert_eq!(coordinator.active_tile(), Some(pos(2)));

    coordinator.toggle_play_pause().await;
    eventually("engine reports playing again", || coordinator.is_playing()).await;
}

#[tokio::test]
async fn test_stale_resume_index_starts_from_top() {
    let harness = Harness::new().await;
    harness.bind_new(2, album_ref("ten"), 10).await;

    let mut record = harness.launcher.tile(pos(2)).record().unwrap();
    record.set_resume_point(12, Some(TrackId::new("gone")));
    harness.db.store().save(&record).await.unwrap();
    harness.launcher.tile(pos(2)).reload().await;

    harness.launcher.tile(pos(2)).request_play().await;

    assert_eq!(harness.engine.count(&EngineCall::SkipToNext), 0);
    assert_eq!(harness.engine.current_index(), Some(0));
    assert_eq!(harness.launcher.coordinator().current_track_index(), 0);
}

#[tokio::test]
async fn test_resume_replays_single_skips() {
    let harness = Harness::new().await;
    harness.bind_new(4, album_ref("five"), 5).await;

    let mut record = harness.launcher.tile(pos(4)).record().unwrap();
    record.set_resume_point(3, None);
    harness.db.store().save(&record).await.unwrap();
    harness.launcher.tile(pos(4)).reload().await;

    harness.launcher.tile(pos(4)).request_play().await;

    assert_eq!(harness.engine.count(&EngineCall::SkipToNext), 3);
    assert_eq!(harness.engine.current_index(), Some(3));
    assert_eq!(harness.launcher.coordinator().current_track_index(), 3);
}

#[tokio::test]
async fn test_resume_uses_direct_seek_when_available() {
    let harness = Harness::with_seek().await;
    harness.bind_new(4, album_ref("five"), 5).await;

    let mut record = harness.launcher.tile(pos(4)).record().unwrap();
    record.set_resume_point(3, None);
    harness.db.store().save(&record).await.unwrap();
    harness.launcher.tile(pos(4)).reload().await;

    harness.launcher.tile(pos(4)).request_play().await;

    assert_eq!(harness.engine.count(&EngineCall::SkipToNext), 0);
    assert_eq!(harness.engine.count(&EngineCall::SeekToIndex(3)), 1);
    assert_eq!(harness.engine.current_index(), Some(3));
}

#[tokio::test]
async fn test_failed_skip_stops_resume_where_reached() {
    let harness = Harness::new().await;
    harness.bind_new(1, album_ref("six"), 6).await;

    let mut record = harness.launcher.tile(pos(1)).record().unwrap();
    record.set_resume_point(4, None);
    harness.db.store().save(&record).await.unwrap();
    harness.launcher.tile(pos(1)).reload().await;
    harness.engine.fail_skips_after(1);

    harness.launcher.tile(pos(1)).request_play().await;

    assert_eq!(harness.engine.count(&EngineCall::SkipToNext), 2);
    assert_eq!(harness.engine.current_index(), Some(1));
    harness.wait_for_entry(1, 1).await;
    assert_eq!(
        harness.launcher.coordinator().active_tile(),
        Some(pos(1)),
        "a partial resume still counts as started"
    );
}

#[tokio::test]
async fn test_catalog_failure_leaves_tile_active_but_idle() {
    let mut harness = Harness::new().await;
    harness.bind_new(3, album_ref("a3"), 4).await;
    harness.catalog.offline.store(true, Ordering::SeqCst);
    harness.drain_events();

    harness.launcher.tile(pos(3)).request_play().await;

    let coordinator = harness.launcher.coordinator();
    assert_eq!(coordinator.active_tile(), Some(pos(3)));
    assert_eq!(coordinator.phase(), CoordinatorPhase::Idle);
    assert!(!coordinator.is_playing());
    assert!(harness.engine.calls().is_empty());

    let snapshots: Vec<_> = harness
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            LauncherEvent::PlaybackChanged(s) => Some(s.phase),
            LauncherEvent::TileChanged { .. } => None,
        })
        .collect();
    assert_eq!(snapshots, vec![CoordinatorPhase::Loading, CoordinatorPhase::Idle]);
}

#[tokio::test]
async fn test_missing_or_empty_media_is_a_failed_load() {
    let harness = Harness::new().await;

    // Bound, but the catalog does not know it
    harness
        .launcher
        .tile(pos(0))
        .bind(MediaKind::Album, MediaId::new("vanished"), "Vanished", None)
        .await;
    harness.launcher.tile(pos(0)).request_play().await;
    assert_eq!(harness.launcher.coordinator().phase(), CoordinatorPhase::Idle);

    // Known, but without tracks
    harness.bind_new(1, playlist_ref("empty"), 0).await;
    harness.launcher.tile(pos(1)).request_play().await;
    assert_eq!(harness.launcher.coordinator().phase(), CoordinatorPhase::Idle);
    assert_eq!(harness.launcher.coordinator().active_tile(), Some(pos(1)));

    assert!(harness.engine.queue_loads().is_empty());
}

// =============================================================================
// Resume write-back
// =============================================================================

#[tokio::test]
async fn test_engine_advance_updates_active_tile() {
    let harness = Harness::new().await;
    let item = harness.bind_new(0, playlist_ref("pl.5"), 5).await;

    let mut record = harness.launcher.tile(pos(0)).record().unwrap();
    record.set_resume_point(3, None);
    harness.db.store().save(&record).await.unwrap();
    harness.launcher.tile(pos(0)).reload().await;

    harness.launcher.tile(pos(0)).request_play().await;
    assert_eq!(harness.engine.current_index(), Some(3));

    // Track 3 finishes and the engine moves on by itself
    harness.engine.advance();
    harness.wait_for_entry(0, 4).await;

    let expected_track = item.tracks.as_ref().unwrap()[4].id.clone();
    let (h, expected) = (&harness, &expected_track);
    eventually_async("resume point persisted", move || async move {
        let stored = h.stored(0).await;
        stored.last_played_track_index == 4 && stored.last_played_track_id.as_ref() == Some(expected)
    })
    .await;
}

#[tokio::test]
async fn test_unknown_entry_records_index_zero() {
    let harness = Harness::new().await;
    harness.bind_new(2, album_ref("a2"), 4).await;
    harness.launcher.tile(pos(2)).request_play().await;
    harness.engine.advance();
    harness.wait_for_entry(2, 1).await;

    harness.engine.announce(Some(QueueEntry {
        entry_id: "not-in-queue".into(),
        track: CatalogTrack::new("stray", "Stray", "Nobody"),
    }));

    harness.wait_for_entry(2, 0).await;
    let record = harness.launcher.tile(pos(2)).record().unwrap();
    assert_eq!(record.last_played_track_id, Some(TrackId::new("stray")));
}

#[tokio::test]
async fn test_current_track_display_follows_entry() {
    let harness = Harness::new().await;
    let item = harness.bind_new(5, album_ref("a5"), 3).await;
    let coordinator = harness.launcher.coordinator();

    harness.launcher.tile(pos(5)).request_play().await;

    let first = &item.tracks.as_ref().unwrap()[0];
    eventually("title shown", || {
        coordinator.snapshot().current_track_title == first.title
    })
    .await;
    assert_eq!(coordinator.snapshot().current_track_artist, first.artist);

    harness.engine.announce(None);
    eventually("title cleared", || {
        coordinator.snapshot().current_track_title.is_empty()
    })
    .await;
    assert!(coordinator.snapshot().current_track_artist.is_empty());
}

#[tokio::test]
async fn test_cleared_tile_keeps_index_zero_while_queue_plays_on() {
    let harness = Harness::new().await;
    harness.bind_new(6, album_ref("a6"), 5).await;
    harness.launcher.tile(pos(6)).request_play().await;
    eventually("playing", || harness.launcher.coordinator().is_playing()).await;

    harness.launcher.tile(pos(6)).clear().await;
    harness.engine.advance();
    harness.engine.advance();
    eventually("engine advanced", || {
        harness.launcher.coordinator().snapshot().current_track_title.ends_with("track 2")
    })
    .await;

    let record = harness.launcher.tile(pos(6)).record().unwrap();
    assert!(record.media.is_none());
    assert_eq!(record.last_played_track_index, 0);
    assert_eq!(harness.stored(6).await.last_played_track_index, 0);
}

#[tokio::test]
async fn test_slow_resume_save_cannot_overwrite_later_bind() {
    let harness = Harness::new().await;
    harness.bind_new(0, album_ref("x"), 5).await;
    harness.store.hold_saves_at(1);

    let tile = harness.launcher.tile(pos(0));
    tile.request_play().await;
    harness.engine.advance();

    let store = &harness.store;
    eventually("resume save stalled", || store.held_saves() == 1).await;

    let rebound = item_with_tracks(album_ref("y"), "Second", 3);
    harness.catalog.insert(rebound.clone());
    tokio::join!(tile.bind_item(&rebound), async {
        eventually("rebind reached memory", || {
            tile.record()
                .is_some_and(|r| r.media == Some(album_ref("y")))
        })
        .await;
        store.release_saves();
    });

    let mirror = tile.record().unwrap();
    let stored = harness.stored(0).await;
    assert_eq!(stored.media, Some(album_ref("y")));
    assert_eq!(stored.last_played_track_index, 0);
    assert!(stored.last_played_track_id.is_none());
    assert_eq!(stored, mirror);
}

#[tokio::test]
async fn test_resume_index_survives_save_failure_in_session() {
    let harness = Harness::new().await;
    harness.bind_new(3, album_ref("a3"), 4).await;
    harness.launcher.tile(pos(3)).request_play().await;
    harness.store.fail_saves.store(true, Ordering::SeqCst);

    harness.engine.advance();
    harness.wait_for_entry(3, 1).await;

    assert_eq!(harness.stored(3).await.last_played_track_index, 0);
}

// =============================================================================
// Active tile
// =============================================================================

#[tokio::test]
async fn test_new_tile_supersedes_active_tile() {
    let harness = Harness::new().await;
    harness.bind_new(0, album_ref("a0"), 3).await;
    harness.bind_new(1, album_ref("a1"), 3).await;
    let coordinator = harness.launcher.coordinator();

    harness.launcher.tile(pos(0)).request_play().await;
    assert_eq!(coordinator.active_tile(), Some(pos(0)));

    harness.launcher.tile(pos(1)).request_play().await;
    assert_eq!(coordinator.active_tile(), Some(pos(1)));

    eventually("playing", || coordinator.is_playing()).await;
    let playing: Vec<_> = harness
        .launcher
        .tiles()
        .iter()
        .filter(|t| t.view().is_playing)
        .map(|t| t.position())
        .collect();
    assert_eq!(playing, vec![pos(1)]);
}

#[tokio::test]
async fn test_overlapping_requests_last_completed_wins() {
    let harness = Harness::new().await;
    let a = harness.bind_new(0, album_ref("slow"), 3).await;
    harness.bind_new(1, album_ref("fast"), 3).await;
    harness.catalog.gate(&a.media);

    let tile_a = harness.launcher.tile(pos(0));
    let tile_b = harness.launcher.tile(pos(1));

    tokio::join!(tile_a.request_play(), async {
        eventually("A waiting on catalog", || harness.catalog.waiting() == 1).await;
        tile_b.request_play().await;
        assert_eq!(harness.launcher.coordinator().active_tile(), Some(pos(1)));
        harness.catalog.release(&a.media);
    });

    // A resolved last, so its queue and its tile own the engine
    assert_eq!(harness.launcher.coordinator().active_tile(), Some(pos(0)));
    let loads = harness.engine.queue_loads();
    assert_eq!(loads.len(), 2);
    assert!(loads[1][0].starts_with("slow-"));
}

#[tokio::test]
async fn test_overlapping_requests_discard_superseded() {
    let harness = Harness::with_config(PlaybackConfig {
        stale_requests: StaleRequestPolicy::DiscardSuperseded,
        ..PlaybackConfig::default()
    })
    .await;
    let a = harness.bind_new(0, album_ref("slow"), 3).await;
    harness.bind_new(1, album_ref("fast"), 3).await;
    harness.catalog.gate(&a.media);

    let tile_a = harness.launcher.tile(pos(0));
    let tile_b = harness.launcher.tile(pos(1));

    tokio::join!(tile_a.request_play(), async {
        eventually("A waiting on catalog", || harness.catalog.waiting() == 1).await;
        tile_b.request_play().await;
        harness.catalog.release(&a.media);
    });

    assert_eq!(harness.launcher.coordinator().active_tile(), Some(pos(1)));
    let loads = harness.engine.queue_loads();
    assert_eq!(loads.len(), 1);
    assert!(loads[0][0].starts_with("fast-"));
}

#[tokio::test]
async fn test_stop_clears_active_tile_and_keeps_bindings() {
    let harness = Harness::new().await;
    harness.bind_new(2, album_ref("a2"), 4).await;
    harness.launcher.tile(pos(2)).request_play().await;
    harness.engine.advance();
    let h = &harness;
    eventually_async("resume point persisted", move || async move {
        h.stored(2).await.last_played_track_index == 1
    })
    .await;
    let before: Vec<_> = harness.store.get_all().await.unwrap();

    let coordinator = harness.launcher.coordinator();
    coordinator.stop().await;

    assert!(coordinator.active_tile().is_none());
    assert_eq!(coordinator.phase(), CoordinatorPhase::Idle);
    assert_eq!(harness.engine.count(&EngineCall::Stop), 1);
    eventually("engine reports stopped", || !coordinator.is_playing()).await;
    assert_eq!(harness.store.get_all().await.unwrap(), before);
}

#[tokio::test]
async fn test_transport_commands_swallow_engine_errors() {
    let harness = Harness::new().await;
    let coordinator = harness.launcher.coordinator();

    // Empty queue: the fake rejects moving backwards
    coordinator.skip_to_previous().await;
    coordinator.skip_to_next().await;
    coordinator.pause().await;
    coordinator.resume().await;

    assert_eq!(harness.engine.count(&EngineCall::SkipToPrevious), 1);
    assert_eq!(harness.engine.count(&EngineCall::SkipToNext), 1);
    assert!(coordinator.active_tile().is_none());
}
