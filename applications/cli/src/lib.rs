//! Mukki Player command line
//!
//! Headless access to the tile store, the catalog and the launcher context.

pub mod config;
pub mod engine;
pub mod error;
pub mod output;

pub use config::LauncherConfig;
pub use engine::HeadlessEngine;
pub use error::{CliError, Result};
