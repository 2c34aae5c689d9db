//! Data backends and the registry that activates them.
//!
//! A backend couples a storage convention (file extension and datadir
//! template) with a way to read a file and parse its contents into a
//! [`Document`]. The set of variants is fixed; the base configuration picks
//! which of them are active, and in which order they are searched.

mod json;
pub(crate) mod read;
#[cfg(feature = "sops")]
mod sops;
mod yaml;

use std::error::Error;
use std::fmt;

use camino::Utf8Path;

use crate::document::Document;
use crate::error::{HieraError, HieraResult};
use crate::template::Template;

/// Boxed read or parse failure, wrapped into [`HieraError::Load`] by callers.
pub(crate) type BackendError = Box<dyn Error + Send + Sync>;

/// The supported backend variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum BackendKind {
    /// Plain YAML files (`.yaml`).
    Yaml,
    /// SOPS-encrypted YAML files (`.yaml.enc`), decrypted by the `sops` binary.
    #[cfg(feature = "sops")]
    SopsYaml,
    /// Plain JSON files (`.json`).
    Json,
}

impl BackendKind {
    /// Every variant compiled into this build, in default search order.
    pub const ALL: &'static [Self] = &[
        Self::Yaml,
        #[cfg(feature = "sops")]
        Self::SopsYaml,
        Self::Json,
    ];

    /// Name used in the base configuration's `backends` list.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            #[cfg(feature = "sops")]
            Self::SopsYaml => "yaml.enc",
            Self::Json => "json",
        }
    }

    /// File extension (without the leading dot). Identical to the name.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        self.name()
    }

    /// Resolve a configured backend name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Read the raw contents of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::Load`] when the file cannot be read (or, for the
    /// encrypted variant, decrypted).
    pub fn read(self, path: &Utf8Path) -> HieraResult<String> {
        let raw = match self {
            Self::Yaml | Self::Json => read::read_file(path),
            #[cfg(feature = "sops")]
            Self::SopsYaml => sops::decrypt(path),
        };
        raw.map_err(|err| HieraError::load(path, self.name(), err))
    }

    /// Parse raw contents read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::Load`] when the contents are malformed.
    pub fn parse(self, path: &Utf8Path, raw: &str) -> HieraResult<Document> {
        let parsed = match self {
            Self::Json => json::parse(raw),
            #[cfg(feature = "sops")]
            Self::SopsYaml => yaml::parse(raw),
            Self::Yaml => yaml::parse(raw),
        };
        parsed
            .map(Document::from)
            .map_err(|err| HieraError::load(path, self.name(), err))
    }

    /// Read then parse `path`.
    ///
    /// # Errors
    ///
    /// Propagates the failure of either step as [`HieraError::Load`].
    pub fn load(self, path: &Utf8Path) -> HieraResult<Document> {
        let raw = self.read(path)?;
        self.parse(path, &raw)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An active backend: a variant plus the datadir template configured for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    kind: BackendKind,
    datadir: Template,
}

impl Backend {
    /// Pair a variant with its datadir template.
    #[must_use]
    pub const fn new(kind: BackendKind, datadir: Template) -> Self {
        Self { kind, datadir }
    }

    /// The backend variant.
    #[must_use]
    pub const fn kind(&self) -> BackendKind {
        self.kind
    }

    /// Name of the backend.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// File extension of the backend's data files.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        self.kind.extension()
    }

    /// Template for the backend's data directory.
    #[must_use]
    pub const fn datadir(&self) -> &Template {
        &self.datadir
    }

    /// Whether `file_name` carries this backend's extension.
    #[must_use]
    pub fn matches_file(&self, file_name: &str) -> bool {
        file_name
            .strip_suffix(self.extension())
            .is_some_and(|stem| stem.len() > 1 && stem.ends_with('.'))
    }

    /// Read then parse `path` with this backend's variant.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::Load`] when reading or parsing fails.
    pub fn load(&self, path: &Utf8Path) -> HieraResult<Document> {
        self.kind.load(path)
    }
}

/// Active backends in the order the base configuration declares them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendRegistry {
    backends: Vec<Backend>,
}

impl BackendRegistry {
    /// Build a registry from backends already in search order.
    #[must_use]
    pub const fn new(backends: Vec<Backend>) -> Self {
        Self { backends }
    }

    /// Iterate in search order.
    pub fn iter(&self) -> std::slice::Iter<'_, Backend> {
        self.backends.iter()
    }

    /// Number of active backends.
    #[must_use]
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Whether no backend is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Find an active backend by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Backend> {
        self.backends.iter().find(|backend| backend.name() == name)
    }

    /// Infer the backend for a data file from its name.
    ///
    /// The longest matching extension wins, so `secrets.yaml.enc` belongs to
    /// `yaml.enc` even when `yaml` is also active.
    #[must_use]
    pub fn infer(&self, file_name: &str) -> Option<&Backend> {
        self.backends
            .iter()
            .filter(|backend| backend.matches_file(file_name))
            .max_by_key(|backend| backend.extension().len())
    }
}

impl<'a> IntoIterator for &'a BackendRegistry {
    type Item = &'a Backend;
    type IntoIter = std::slice::Iter<'a, Backend>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
