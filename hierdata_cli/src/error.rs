//! Error types for the `hierdata` command.

use thiserror::Error;

/// Failures surfaced by a `hierdata` run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Building the engine or resolving a key failed.
    #[error(transparent)]
    Hiera(#[from] hierdata::HieraError),

    /// A value could not be rendered as JSON.
    #[error("failed to render value: {0}")]
    Render(#[from] serde_json::Error),

    /// Writing output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// The logging subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
