//! CLI error types.

use vdocs_config::ConfigError;
use vdocs_site::{NavigationError, RegistryError, ResolveError, ScanError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Configuration error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Configuration error: {0}")]
    Navigation(#[from] NavigationError),

    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("{0}")]
    Scan(#[from] ScanError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),
}
