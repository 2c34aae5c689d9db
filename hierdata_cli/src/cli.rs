//! Command-line interface definitions for `hierdata`.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use hierdata::{LookupOptions, MergeStrategy};
use serde_json::Value;

/// Output formats for resolved values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// Strings without quotes; other values as compact JSON.
    Raw,
}

/// Parsed CLI arguments for `hierdata`.
#[derive(Debug, Parser)]
#[command(name = "hierdata")]
#[command(about = "Look up keys in a hierarchical configuration tree")]
#[command(version)]
pub struct Args {
    /// Base configuration file.
    #[arg(long, value_name = "path", default_value = "hiera.yaml")]
    pub config: Utf8PathBuf,
    /// Context variable for this lookup (repeatable).
    #[arg(short = 'c', long = "context", value_name = "name=value", value_parser = parse_assignment)]
    pub context: Vec<(String, String)>,
    /// Combine values from every matching level: array, set, hash or string.
    #[arg(long, value_name = "strategy", value_parser = parse_merge)]
    pub merge: Option<MergeStrategy>,
    /// Merge nested mappings recursively.
    #[arg(long, requires = "merge")]
    pub deep: bool,
    /// Value printed for missing keys; parsed as JSON, or taken as a string.
    #[arg(long, value_name = "json", value_parser = parse_default)]
    pub default: Option<Value>,
    /// Fail when a key is missing.
    #[arg(long)]
    pub strict: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Skip loading every default-context document at startup.
    #[arg(long)]
    pub no_preload: bool,
    /// Log lookups at debug level.
    #[arg(short, long)]
    pub verbose: bool,
    /// Dotted keys to resolve.
    #[arg(required = true, value_name = "KEY")]
    pub keys: Vec<String>,
}

impl Args {
    /// Lookup options described by the flags.
    #[must_use]
    pub fn lookup_options(&self) -> LookupOptions {
        let mut options = LookupOptions::new()
            .with_deep(self.deep)
            .with_throw(self.strict);
        if let Some(strategy) = self.merge {
            options = options.with_merge(strategy);
        }
        if let Some(default) = &self.default {
            options = options.with_default(default.clone());
        }
        self.context
            .iter()
            .fold(options, |acc, (name, value)| acc.with_var(name.as_str(), value.as_str()))
    }
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))
}

fn parse_merge(raw: &str) -> Result<MergeStrategy, String> {
    MergeStrategy::from_name(raw).ok_or_else(|| {
        let known: Vec<_> = MergeStrategy::ALL.iter().map(|strategy| strategy.name()).collect();
        format!("unknown merge strategy `{raw}`, expected one of {}", known.join(", "))
    })
}

fn parse_default(raw: &str) -> Result<Value, String> {
    Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned())))
}
