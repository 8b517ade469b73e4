//! CLI error types.

use sc_config::ConfigError;
use sc_engine::ProcessError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Discovery(String),

    #[error("{0}")]
    Process(#[from] ProcessError),
}
