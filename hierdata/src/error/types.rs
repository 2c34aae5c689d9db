//! Primary error enum for hierarchy lookups.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while building an engine or resolving a key.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HieraError {
    /// The base configuration is malformed.
    #[error("invalid base configuration: {message}")]
    Configuration {
        /// Human-readable explanation of the problem.
        message: String,
    },

    /// The base configuration could not be read or parsed.
    #[error("failed to load base configuration '{path}': {source}")]
    BaseConfig {
        /// Location of the base configuration.
        path: Utf8PathBuf,
        /// Underlying figment or I/O failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A `backends` entry names a backend that is not registered.
    #[error("invalid backend: `{name}`")]
    UnknownBackend {
        /// Name given in the base configuration.
        name: String,
    },

    /// The base configuration activates no backends.
    #[error("no backends could be loaded")]
    NoBackends,

    /// The base configuration has no `hierarchy` key.
    #[error("invalid base configuration: missing hierarchy key")]
    MissingHierarchy,

    /// A candidate data file failed to read or parse.
    #[error("failed to load file {path} with backend `{backend}`: {source}")]
    Load {
        /// Candidate file that failed.
        path: Utf8PathBuf,
        /// Backend used to read and parse the file.
        backend: String,
        /// Underlying read or parse failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Interpolation markup could not be evaluated.
    #[error("cannot interpolate `{value}`: {message}")]
    Interpolation {
        /// Raw string that contained the markup.
        value: String,
        /// Human-readable explanation of the failure.
        message: String,
    },

    /// A `hiera`, `lookup` or `alias` call referenced a key that does not exist.
    #[error("{function} lookup failed: key '{key}' does not exist")]
    ReferenceNotFound {
        /// Function that performed the lookup.
        function: String,
        /// Key that was not found.
        key: String,
    },

    /// A key's value refers back to itself through interpolation.
    #[error("resolution cycle detected: {cycle}")]
    ResolutionCycle {
        /// Chain of keys participating in the cycle.
        cycle: String,
    },

    /// A hit cannot be combined with the requested merge strategy.
    #[error("cannot {strategy}-merge key '{key}': found {found}")]
    MergeType {
        /// Key being merged.
        key: String,
        /// Requested strategy name.
        strategy: &'static str,
        /// Description of the offending value.
        found: &'static str,
    },

    /// The key is absent from every candidate document.
    #[error("key '{key}' not found")]
    NotFound {
        /// Key that was looked up.
        key: String,
    },

    /// A resolved value could not be deserialised into the requested type.
    #[error("failed to extract '{key}': {source}")]
    Extract {
        /// Key whose value was extracted.
        key: String,
        /// Underlying deserialisation failure.
        #[source]
        source: serde_json::Error,
    },
}
