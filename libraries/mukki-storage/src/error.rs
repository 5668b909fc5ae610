/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A stored row violates the tile invariants
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Migration error
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<StorageError> for mukki_core::MukkiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => mukki_core::MukkiError::not_found(entity, id),
            other => mukki_core::MukkiError::storage(other.to_string()),
        }
    }
}
