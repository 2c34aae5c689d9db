//! Library side of the `hierdata` command.
//!
//! Argument parsing, logging setup and output rendering live here so the
//! binary stays a thin wrapper and the behaviour can be tested in-process.

pub mod cli;
pub mod error;
pub mod logging;
pub mod output;

use std::io::Write;

use hierdata::{Backend, BaseConfig, Hiera};
use serde_json::Value;

use crate::cli::Args;
use crate::error::CliError;

/// Resolve every key named in `args`, writing one rendered value per line.
///
/// A missing key prints `null` (or an empty line in raw format) unless
/// `--strict` is given, in which case it fails the run.
///
/// # Errors
///
/// Returns [`CliError::Hiera`] for configuration, load, interpolation and
/// (with `--strict`) not-found failures, and [`CliError::Io`] when writing
/// fails.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<(), CliError> {
    let config = BaseConfig::from_file(&args.config)?;
    let hiera = Hiera::builder(config).preload(!args.no_preload).build()?;
    tracing::debug!(
        backends = ?hiera.backends().iter().map(Backend::name).collect::<Vec<_>>(),
        levels = hiera.hierarchy().len(),
        "engine ready"
    );
    let options = args.lookup_options();
    for key in &args.keys {
        let value = hiera.get(key, &options)?.unwrap_or_else(|| {
            tracing::info!(key = key.as_str(), "key not found");
            Value::Null
        });
        writeln!(out, "{}", output::render(&value, args.format)?)?;
    }
    Ok(())
}
