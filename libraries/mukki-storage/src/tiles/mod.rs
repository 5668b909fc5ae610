//! Tile record persistence
//!
//! One row per tile slot. Rows are inserted once per position and then only
//! updated; nothing in this module deletes a row.
//!
//! # Example
//!
//! ```rust,no_run
//! use mukki_core::types::TilePosition;
//! use mukki_storage::tiles;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! tiles::create_if_absent(pool).await?;
//!
//! let mut tile = tiles::get_by_position(pool, TilePosition::new(0)?).await?.unwrap();
//! tile.clear();
//! tiles::save(pool, &tile).await?;
//! # Ok(())
//! # }
//! ```

use mukki_core::types::{MediaId, MediaKind, MediaRef, TileId, TilePosition, TileRecord, TrackId};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::StorageError;

type Result<T> = std::result::Result<T, StorageError>;

const SELECT_COLUMNS: &str = "SELECT id, position, media_id, media_kind, display_name, artwork,
        last_played_track_index, last_played_track_id
 FROM tiles";

#[derive(sqlx::FromRow)]
struct TileRow {
    id: TileId,
    position: i64,
    media_id: Option<MediaId>,
    media_kind: Option<String>,
    display_name: Option<String>,
    artwork: Option<Vec<u8>>,
    last_played_track_index: i64,
    last_played_track_id: Option<TrackId>,
}

impl TryFrom<TileRow> for TileRecord {
    type Error = StorageError;

    fn try_from(row: TileRow) -> Result<Self> {
        let position = u8::try_from(row.position)
            .ok()
            .and_then(|p| TilePosition::new(p).ok())
            .ok_or_else(|| {
                StorageError::CorruptRow(format!("tile {} has position {}", row.id, row.position))
            })?;

        let media = match (row.media_kind, row.media_id) {
            (Some(kind), Some(id)) => {
                let kind = MediaKind::from_str(&kind).ok_or_else(|| {
                    StorageError::CorruptRow(format!("tile {} has media kind {}", row.id, kind))
                })?;
                Some(MediaRef::new(kind, id))
            }
            (None, None) => None,
            _ => {
                return Err(StorageError::CorruptRow(format!(
                    "tile {} has a partial media binding",
                    row.id
                )))
            }
        };

        let last_played_track_index = u32::try_from(row.last_played_track_index).map_err(|_| {
            StorageError::CorruptRow(format!(
                "tile {} has resume index {}",
                row.id, row.last_played_track_index
            ))
        })?;

        Ok(TileRecord {
            id: row.id,
            position,
            media,
            display_name: row.display_name,
            artwork: row.artwork,
            last_played_track_index,
            last_played_track_id: row.last_played_track_id,
        })
    }
}

/// Insert a fresh record for every position that has none.
///
/// Existing rows are left untouched, so running this any number of times
/// yields exactly one row per position. Returns all records.
pub async fn create_if_absent(pool: &SqlitePool) -> Result<Vec<TileRecord>> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;
    let mut created = 0u64;

    for position in TilePosition::all() {
        let result = sqlx::query(
            "INSERT INTO tiles (id, position, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(position) DO NOTHING",
        )
        .bind(TileId::generate())
        .bind(i64::from(position.get()))
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        created += result.rows_affected();
    }

    tx.commit().await?;

    if created > 0 {
        info!(created, "Initialized tile slots");
    }

    get_all(pool).await
}

/// Get all tile records ordered by position
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<TileRecord>> {
    let rows = sqlx::query_as::<_, TileRow>(&format!("{SELECT_COLUMNS} ORDER BY position"))
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(TileRecord::try_from).collect()
}

/// Get the tile record at a position
pub async fn get_by_position(
    pool: &SqlitePool,
    position: TilePosition,
) -> Result<Option<TileRecord>> {
    let row = sqlx::query_as::<_, TileRow>(&format!("{SELECT_COLUMNS} WHERE position = ?"))
        .bind(i64::from(position.get()))
        .fetch_optional(pool)
        .await?;

    row.map(TileRecord::try_from).transpose()
}

/// Get a tile record by ID
pub async fn get_by_id(pool: &SqlitePool, id: &TileId) -> Result<Option<TileRecord>> {
    let row = sqlx::query_as::<_, TileRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(TileRecord::try_from).transpose()
}

/// Persist binding and resume fields of an existing record.
///
/// The row is matched on both id and position; a record that was never
/// created by `create_if_absent` yields `NotFound`.
pub async fn save(pool: &SqlitePool, record: &TileRecord) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    let media_id = record.media.as_ref().map(|m| m.id.as_str());
    let media_kind = record.media.as_ref().map(|m| m.kind.as_str());

    let result = sqlx::query(
        "UPDATE tiles SET
            media_id = ?,
            media_kind = ?,
            display_name = ?,
            artwork = ?,
            last_played_track_index = ?,
            last_played_track_id = ?,
            updated_at = ?
         WHERE id = ? AND position = ?",
    )
    .bind(media_id)
    .bind(media_kind)
    .bind(record.display_name.as_deref())
    .bind(record.artwork.as_deref())
    .bind(i64::from(record.last_played_track_index))
    .bind(record.last_played_track_id.as_ref())
    .bind(now)
    .bind(&record.id)
    .bind(i64::from(record.position.get()))
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Tile", record.id.as_str()));
    }

    debug!(
        position = record.position.get(),
        configured = record.is_configured(),
        resume_index = record.last_played_track_index,
        "Saved tile"
    );

    Ok(())
}
