//! CLI error type.

use thiserror::Error;
use xrtmap::MapError;

/// Errors that terminate the `xrtmap` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// The map session failed.
    #[error(transparent)]
    Map(#[from] MapError),

    /// A command-line option or process setting was rejected.
    #[error("configuration: {0}")]
    Config(String),

    /// The window could not be created or presented.
    #[error("display: {0}")]
    Display(String),

    /// The log subscriber could not be installed.
    #[error("logging: {0}")]
    Logging(String),

    /// The session thread could not be started or panicked.
    #[error("session thread: {0}")]
    Thread(String),
}
