//! In-memory tile record mirrors
//!
//! One slot per position, shared between the tile bindings and the
//! coordinator. The mirror is authoritative for the running session even
//! when the store rejects a write.

use mukki_core::{
    types::{TilePosition, TileRecord, TILE_COUNT},
    Result, TileStore,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
pub(crate) struct TileMirrors {
    slots: Arc<Vec<Mutex<Option<TileRecord>>>>,

    /// Serialises store writes per slot
    saves: Arc<Vec<tokio::sync::Mutex<()>>>,
}

impl TileMirrors {
    pub(crate) fn new() -> Self {
        Self {
            slots: Arc::new((0..TILE_COUNT).map(|_| Mutex::new(None)).collect()),
            saves: Arc::new((0..TILE_COUNT).map(|_| tokio::sync::Mutex::new(())).collect()),
        }
    }

    /// Write the slot's current record to `store`.
    ///
    /// Writes for one slot run one at a time and each takes the record as it
    /// is when its turn comes, so the last write always carries the newest
    /// state. An empty slot writes nothing.
    pub(crate) async fn persist(
        &self,
        position: TilePosition,
        store: &dyn TileStore,
    ) -> Result<()> {
        let _turn = self.saves[position.index()].lock().await;
        match self.get(position) {
            Some(record) => store.save(&record).await,
            None => Ok(()),
        }
    }

    fn slot(&self, position: TilePosition) -> MutexGuard<'_, Option<TileRecord>> {
        self.slots[position.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the record at `position`, `None` if the slot has no backing record
    pub(crate) fn get(&self, position: TilePosition) -> Option<TileRecord> {
        self.slot(position).clone()
    }

    /// Replace the whole slot
    pub(crate) fn set(&self, position: TilePosition, record: Option<TileRecord>) {
        *self.slot(position) = record;
    }

    /// Mutate the record in place.
    ///
    /// Returns the updated copy when a record exists and `f` reports a change.
    pub(crate) fn update<F>(&self, position: TilePosition, f: F) -> Option<TileRecord>
    where
        F: FnOnce(&mut TileRecord) -> bool,
    {
        let mut slot = self.slot(position);
        let record = slot.as_mut()?;
        if f(record) {
            Some(record.clone())
        } else {
            None
        }
    }
}
