//! CLI error types.

use rw_config::ConfigError;
use rw_tree::TreeError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid document: {0}")]
    Tree(#[from] TreeError),
}
