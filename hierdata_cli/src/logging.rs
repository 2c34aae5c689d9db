//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::CliError;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "HIERDATA_LOG";

/// Filter directive used when [`LOG_ENV`] is unset.
#[must_use]
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Install a compact stderr subscriber filtered by [`LOG_ENV`].
///
/// # Errors
///
/// Returns [`CliError::Logging`] when the directive is invalid or a global
/// subscriber is already installed.
pub fn init(verbose: bool) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))
        .map_err(|err| CliError::Logging(err.to_string()))?;
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|err| CliError::Logging(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::default_directive;
    use rstest::rstest;

    #[rstest]
    #[case(false, "warn")]
    #[case(true, "debug")]
    fn verbosity_picks_the_default_level(#[case] verbose: bool, #[case] expected: &str) {
        assert_eq!(default_directive(verbose), expected);
    }
}
