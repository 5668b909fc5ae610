//! Error types for the catalog client.

use thiserror::Error;

/// Errors that can occur when talking to the music catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Catalog returned an error response
    #[error("Catalog error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Developer or user token rejected
    #[error("Catalog authorization failed ({status})")]
    Unauthorized { status: u16 },

    /// Invalid catalog URL
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse catalog response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Catalog is offline or unreachable
    #[error("Catalog unreachable: {0}")]
    Unreachable(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl From<CatalogError> for mukki_core::MukkiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Request(_) | CatalogError::Unreachable(_) => {
                mukki_core::MukkiError::network(err.to_string())
            }
            other => mukki_core::MukkiError::catalog(other.to_string()),
        }
    }
}
