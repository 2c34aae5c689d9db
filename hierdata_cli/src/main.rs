//! CLI entrypoint for `hierdata`.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use hierdata_cli::cli::Args;
use hierdata_cli::error::CliError;

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "lookup failed");
            writeln!(std::io::stderr(), "hierdata: {err}").ok();
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    hierdata_cli::logging::init(args.verbose)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    hierdata_cli::run(args, &mut out)
}
