//! Property-based tests for resume positioning
//!
//! Uses proptest to verify invariants across many random inputs.


use mukki_core::types::TrackId;
use mukki_core::TileStore;
use mukki_playback::resume_index;
use proptest::prelude::*;
use test_helpers::*;

proptest! {
    /// Property: the resume index always points into the track list
    #[test]
    fn resume_index_is_always_in_bounds(stored in any::<u32>(), count in 1usize..500) {
        let index = resume_index(stored, count);
        prop_assert!(index < count);
    }

    /// Property: valid stored indices are kept, everything else restarts at 0
    #[test]
    fn resume_index_keeps_only_valid_positions(stored in 0u32..1000, count in 0usize..1000) {
        let index = resume_index(stored, count);
        if (stored as usize) < count {
            prop_assert_eq!(index, stored as usize);
        } else {
            prop_assert_eq!(index, 0);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property: playing a tile never fails, whatever its stored index, and
    /// lands on the resume index or the first track
    #[test]
    fn play_lands_on_resume_index_or_first_track(stored in 0u32..40, track_count in 1usize..20) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let harness = Harness::new().await;
            harness.bind_new(2, album_ref("prop"), track_count).await;

            let tile = harness.launcher.tile(pos(2));
            let mut record = tile.record().unwrap();
            record.set_resume_point(stored, Some(TrackId::new("prop-stored")));
            harness.db.store().save(&record).await.unwrap();
            tile.reload().await;

            tile.request_play().await;

            let expected = if (stored as usize) < track_count { stored as usize } else { 0 };
            assert_eq!(harness.engine.current_index(), Some(expected));
            assert_eq!(harness.launcher.coordinator().active_tile(), Some(pos(2)));
        });
    }
}
