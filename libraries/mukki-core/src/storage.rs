//! Storage trait for tile records

use crate::error::Result;
use crate::types::{TileId, TilePosition, TileRecord};
use async_trait::async_trait;

/// Durable store of the nine tile records
///
/// This trait abstracts the record store so the binding and playback logic
/// can run against `SQLite` or any other typed record backend.
#[async_trait]
pub trait TileStore: Send + Sync {
    /// Ensure exactly one record exists per position, creating any missing
    /// ones with fresh identifiers. Existing records are never touched.
    ///
    /// Returns all nine records ordered by position.
    async fn create_if_absent(&self) -> Result<Vec<TileRecord>>;

    /// Get the record at a position
    async fn get(&self, position: TilePosition) -> Result<Option<TileRecord>>;

    /// Get a record by its identifier
    async fn get_by_id(&self, id: &TileId) -> Result<Option<TileRecord>>;

    /// Get all records ordered by position
    async fn get_all(&self) -> Result<Vec<TileRecord>>;

    /// Persist the binding and resume fields of an existing record
    async fn save(&self, record: &TileRecord) -> Result<()>;
}
