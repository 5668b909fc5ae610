//! Mukki Player Storage
//!
//! `SQLite` persistence for the nine tile records.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: the `tiles` slice owns its queries and row mapping
//! - **Fixed Slots**: rows are created once per position and never deleted
//! - **Trait Boundary**: `LocalTileStore` implements `mukki_core::TileStore`
//!
//! # Example
//!
//! ```rust,no_run
//! use mukki_storage::{LocalTileStore, create_pool, run_migrations};
//! use mukki_core::TileStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://mukki.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = LocalTileStore::new(pool);
//! let tiles = store.create_if_absent().await?;
//! assert_eq!(tiles.len(), 9);
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod tiles;

pub use context::LocalTileStore;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://mukki.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    debug!("SQLite pool ready");

    Ok(pool)
}
