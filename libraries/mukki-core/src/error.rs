/// Core error types for Mukki Player
use thiserror::Error;

/// Result type alias using `MukkiError`
pub type Result<T> = std::result::Result<T, MukkiError>;

/// Core error type for Mukki Player
#[derive(Error, Debug)]
pub enum MukkiError {
    /// Tile record store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Catalog gateway errors (bad response, unknown item shape)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// External player engine errors
    #[error("Engine error: {0}")]
    Engine(String),

    /// Operation not supported by this implementation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),
}

impl MukkiError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an engine error
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Create an unsupported-operation error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for MukkiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
