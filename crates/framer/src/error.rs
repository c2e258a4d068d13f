//! CLI error types.

use framer_config::ConfigError;
use framer_expand::ExpandError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Expand(#[from] ExpandError),

    #[error("--assemble and --expand cannot be used together")]
    MutuallyExclusive,

    #[error("{0}")]
    Validation(String),
}
