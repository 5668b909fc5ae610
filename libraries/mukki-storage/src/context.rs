use crate::tiles;
use async_trait::async_trait;
use mukki_core::{
    error::Result,
    storage::TileStore,
    types::{TileId, TilePosition, TileRecord},
};
use sqlx::SqlitePool;

/// Local tile store using `SQLite`
#[derive(Clone)]
pub struct LocalTileStore {
    pool: SqlitePool,
}

impl LocalTileStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TileStore for LocalTileStore {
    async fn create_if_absent(&self) -> Result<Vec<TileRecord>> {
        tiles::create_if_absent(&self.pool).await.map_err(Into::into)
    }

    async fn get(&self, position: TilePosition) -> Result<Option<TileRecord>> {
        tiles::get_by_position(&self.pool, position)
            .await
            .map_err(Into::into)
    }

    async fn get_by_id(&self, id: &TileId) -> Result<Option<TileRecord>> {
        tiles::get_by_id(&self.pool, id).await.map_err(Into::into)
    }

    async fn get_all(&self) -> Result<Vec<TileRecord>> {
        tiles::get_all(&self.pool).await.map_err(Into::into)
    }

    async fn save(&self, record: &TileRecord) -> Result<()> {
        tiles::save(&self.pool, record).await.map_err(Into::into)
    }
}
