//! Headless player engine
//!
//! Keeps a queue and a cursor without producing audio, so tiles can be
//! resolved and resumed from the command line.

use async_trait::async_trait;
use mukki_core::{
    types::{CatalogTrack, EngineEvent, QueueEntry, TransportStatus},
    MukkiError, PlayerEngine, Result,
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Default)]
struct Cursor {
    entries: Vec<QueueEntry>,
    current: Option<usize>,
    status: TransportStatus,
}

pub struct HeadlessEngine {
    cursor: Mutex<Cursor>,
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl HeadlessEngine {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let engine = Self {
            cursor: Mutex::new(Cursor::default()),
            events,
        };
        (engine, rx)
    }

    fn cursor(&self) -> MutexGuard<'_, Cursor> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.events.send(event);
    }

    fn set_status(&self, status: TransportStatus) {
        self.cursor().status = status;
        self.emit(EngineEvent::TransportChanged(status));
    }

    fn move_to(&self, index: usize) -> Result<()> {
        let entry = {
            let mut cursor = self.cursor();
            let entry = cursor
                .entries
                .get(index)
                .cloned()
                .ok_or_else(|| MukkiError::engine(format!("queue has no entry {}", index)))?;
            cursor.current = Some(index);
            entry
        };
        debug!(index, track = %entry.track_id(), "Queue position changed");
        self.emit(EngineEvent::CurrentEntryChanged(Some(entry)));
        Ok(())
    }
}

#[async_trait]
impl PlayerEngine for HeadlessEngine {
    async fn set_queue(&self, tracks: Vec<CatalogTrack>) -> Result<()> {
        {
            let mut cursor = self.cursor();
            cursor.entries = tracks
                .into_iter()
                .enumerate()
                .map(|(i, track)| QueueEntry {
                    entry_id: format!("q{}", i),
                    track,
                })
                .collect();
            cursor.current = None;
        }
        self.move_to(0)
    }

    async fn play(&self) -> Result<()> {
        self.set_status(TransportStatus::Playing);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.set_status(TransportStatus::Paused);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.set_status(TransportStatus::Stopped);
        Ok(())
    }

    async fn skip_to_next(&self) -> Result<()> {
        let next = self.cursor().current.map_or(0, |i| i + 1);
        self.move_to(next)
    }

    async fn skip_to_previous(&self) -> Result<()> {
        let previous = self
            .cursor()
            .current
            .and_then(|i| i.checked_sub(1))
            .ok_or_else(|| MukkiError::engine("already at the first entry"))?;
        self.move_to(previous)
    }

    fn status(&self) -> TransportStatus {
        self.cursor().status
    }

    fn current_entry(&self) -> Option<QueueEntry> {
        let cursor = self.cursor();
        cursor.current.and_then(|i| cursor.entries.get(i).cloned())
    }

    fn entries(&self) -> Vec<QueueEntry> {
        self.cursor().entries.clone()
    }

    fn supports_seek_to_index(&self) -> bool {
        true
    }

    async fn seek_to_index(&self, index: usize) -> Result<()> {
        self.move_to(index)
    }
}
