/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Core(#[from] mukki_core::MukkiError),

    #[error("Storage error: {0}")]
    Storage(#[from] mukki_storage::StorageError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] mukki_catalog::CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
