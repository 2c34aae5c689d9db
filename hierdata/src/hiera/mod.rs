//! The resolution engine.
//!
//! A [`Hiera`] is built once from a [`BaseConfig`] and then answers lookups.
//! Each lookup layers its context, resolves candidate paths, loads them
//! through the engine's [`DocumentCache`], finds the key and resolves any
//! interpolation markup in the result. The engine is `Send + Sync`; the cache
//! is the only state shared between calls.

mod options;
mod resolution;
mod scoped;

pub use options::LookupOptions;
pub use scoped::ScopedHiera;

use camino::{Utf8Path, Utf8PathBuf};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::backend::{BackendKind, BackendRegistry};
use crate::cache::DocumentCache;
use crate::config::BaseConfig;
use crate::context::Context;
use crate::error::{HieraError, HieraResult};
use crate::paths::{resolve_candidates, walk_data_files};
use crate::template::Template;

use self::resolution::{Loaded, Resolution};

/// Configured lookup engine.
///
/// # Examples
///
/// ```
/// use hierdata::{Hiera, LookupOptions};
/// use serde_json::json;
///
/// let dir = tempfile::tempdir()?;
/// std::fs::write(dir.path().join("common.yaml"), "greeting: hello\n")?;
/// let hiera = Hiera::from_value(json!({
///     "backends": ["yaml"],
///     "hierarchy": ["common"],
///     "yaml": {"datadir": dir.path().to_str()},
/// }))?;
/// let options = LookupOptions::new().with_default("hi");
/// assert_eq!(hiera.get("greeting", &options)?, Some(json!("hello")));
/// assert_eq!(hiera.get("farewell", &options)?, Some(json!("hi")));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Hiera {
    base_path: Utf8PathBuf,
    registry: BackendRegistry,
    hierarchy: Vec<Template>,
    context: Context,
    cache: DocumentCache,
}

impl Hiera {
    /// Start configuring an engine.
    #[must_use]
    pub fn builder(config: BaseConfig) -> HieraBuilder {
        HieraBuilder::new(config)
    }

    /// Build an engine from a YAML base configuration file with default
    /// settings.
    ///
    /// # Errors
    ///
    /// Any error of [`BaseConfig::from_file`] or [`HieraBuilder::build`].
    pub fn from_file(path: impl AsRef<Utf8Path>) -> HieraResult<Self> {
        Self::builder(BaseConfig::from_file(path)?).build()
    }

    /// Build an engine from an in-memory base configuration with default
    /// settings.
    ///
    /// # Errors
    ///
    /// Any error of [`BaseConfig::from_value`] or [`HieraBuilder::build`].
    pub fn from_value(config: Value) -> HieraResult<Self> {
        Self::builder(BaseConfig::from_value(config)?).build()
    }

    /// Directory that relative datadirs resolve against.
    #[must_use]
    pub fn base_path(&self) -> &Utf8Path {
        &self.base_path
    }

    /// Active backends in search order.
    #[must_use]
    pub const fn backends(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Hierarchy levels in search order.
    #[must_use]
    pub fn hierarchy(&self) -> &[Template] {
        &self.hierarchy
    }

    /// Default context applied to every lookup.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Documents loaded so far.
    #[must_use]
    pub const fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// Look up `key`, treating absence as an error.
    ///
    /// Ignores the default and throw settings of `options`.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::NotFound`] when no candidate contains `key`, and
    /// load, interpolation and merge errors as they occur.
    pub fn lookup(&self, key: &str, options: &LookupOptions) -> HieraResult<Value> {
        let context = options.lookup_context(&self.context);
        let loaded = self.load_candidates(&context)?;
        Resolution::new(&loaded, &context, options.merge()).get_key(key)
    }

    /// Look up `key`, returning the default of `options` when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::NotFound`] only when `options` throws. Load,
    /// interpolation and merge errors always propagate.
    pub fn get(&self, key: &str, options: &LookupOptions) -> HieraResult<Option<Value>> {
        match self.lookup(key, options) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() && !options.throws() => {
                Ok(options.default_value().cloned())
            }
            Err(err) => Err(err),
        }
    }

    /// Whether `key` is present in any candidate.
    ///
    /// # Errors
    ///
    /// Every error of [`Self::lookup`] except not-found.
    pub fn has(&self, key: &str, options: &LookupOptions) -> HieraResult<bool> {
        match self.lookup(key, options) {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Look up `key` and deserialise it into `T`.
    ///
    /// The default of `options` is used when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::NotFound`] when the key is absent and there is no
    /// default, [`HieraError::Extract`] when the value does not fit `T`, and
    /// every error of [`Self::get`].
    pub fn extract<T: DeserializeOwned>(&self, key: &str, options: &LookupOptions) -> HieraResult<T> {
        let value = self
            .get(key, options)?
            .ok_or_else(|| HieraError::not_found(key))?;
        serde_json::from_value(value).map_err(|source| HieraError::Extract {
            key: key.to_owned(),
            source,
        })
    }

    /// A view whose lookups layer `context` under each call's own context.
    #[must_use]
    pub const fn scoped(&self, context: Context) -> ScopedHiera<'_> {
        ScopedHiera::new(self, context)
    }

    /// Load every data file under `dir` into the cache.
    ///
    /// A relative `dir` resolves against [`Self::base_path`]. With `backend`
    /// only that backend's files are loaded; otherwise each file's backend is
    /// inferred from its extension. Returns the loaded paths in walk order.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::UnknownBackend`] when `backend` is not active, and
    /// [`HieraError::Load`] when walking or loading fails.
    pub fn load_directory(
        &self,
        dir: impl AsRef<Utf8Path>,
        backend: Option<&str>,
    ) -> HieraResult<Vec<Utf8PathBuf>> {
        let owner = backend
            .map(|name| {
                self.registry.get(name).ok_or_else(|| HieraError::UnknownBackend {
                    name: name.to_owned(),
                })
            })
            .transpose()?;
        let root = self.base_path.join(dir.as_ref());
        walk_data_files(&root, &self.registry, owner)?
            .into_iter()
            .map(|candidate| {
                self.cache.load(&candidate.path, candidate.backend)?;
                Ok(candidate.path)
            })
            .collect()
    }

    /// Load every candidate reachable with the default context.
    ///
    /// Returns the number of candidate documents.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::Load`] for the first document that fails.
    pub fn preload(&self) -> HieraResult<usize> {
        let context = self.context.clone().filtered();
        let loaded = self.load_candidates(&context)?;
        tracing::debug!(documents = loaded.len(), "preloaded candidate documents");
        Ok(loaded.len())
    }

    fn load_candidates(&self, context: &Context) -> HieraResult<Vec<Loaded>> {
        resolve_candidates(&self.base_path, &self.registry, &self.hierarchy, context)?
            .into_iter()
            .map(|candidate| {
                let document = self.cache.load(&candidate.path, candidate.backend)?;
                Ok(Loaded {
                    path: candidate.path,
                    document,
                })
            })
            .collect()
    }
}

/// Builder for [`Hiera`].
#[derive(Debug, Clone)]
pub struct HieraBuilder {
    config: BaseConfig,
    base_path: Option<Utf8PathBuf>,
    context: Context,
    available: Vec<BackendKind>,
    preload: bool,
}

impl HieraBuilder {
    /// Defaults: every compiled-in backend available, empty context, preload
    /// enabled.
    #[must_use]
    pub fn new(config: BaseConfig) -> Self {
        Self {
            config,
            base_path: None,
            context: Context::new(),
            available: BackendKind::ALL.to_vec(),
            preload: true,
        }
    }

    /// Directory that relative datadirs resolve against.
    ///
    /// Defaults to the directory of the base configuration file, or the
    /// working directory for in-memory configurations.
    #[must_use]
    pub fn base_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Replace the default context.
    #[must_use]
    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Add one variable to the default context.
    #[must_use]
    pub fn var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(name, value);
        self
    }

    /// Restrict the backend variants the configuration may activate.
    #[must_use]
    pub fn backends(mut self, kinds: &[BackendKind]) -> Self {
        self.available = kinds.to_vec();
        self
    }

    /// Whether [`Self::build`] loads every default-context candidate.
    #[must_use]
    pub const fn preload(mut self, enabled: bool) -> Self {
        self.preload = enabled;
        self
    }

    /// Validate the configuration and build the engine.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::NoBackends`], [`HieraError::UnknownBackend`],
    /// [`HieraError::MissingHierarchy`] or [`HieraError::Configuration`] for
    /// an invalid configuration, and [`HieraError::Load`] when preloading
    /// finds a broken data file.
    pub fn build(self) -> HieraResult<Hiera> {
        let registry = self.config.registry(&self.available)?;
        let hierarchy = self.config.hierarchy()?;
        let base_path = match (self.base_path, self.config.base_dir()) {
            (Some(path), _) => path,
            (None, Some(dir)) => dir.to_owned(),
            (None, None) => current_dir()?,
        };
        let hiera = Hiera {
            base_path,
            registry,
            hierarchy,
            context: self.context,
            cache: DocumentCache::new(),
        };
        tracing::debug!(
            base_path = %hiera.base_path,
            backends = hiera.registry.len(),
            levels = hiera.hierarchy.len(),
            "built hiera engine"
        );
        if self.preload {
            hiera.preload()?;
        }
        Ok(hiera)
    }
}

fn current_dir() -> HieraResult<Utf8PathBuf> {
    let dir = std::env::current_dir().map_err(|err| {
        HieraError::configuration(format!("cannot determine working directory: {err}"))
    })?;
    Utf8PathBuf::from_path_buf(dir).map_err(|dir| {
        HieraError::configuration(format!(
            "working directory {} is not valid UTF-8",
            dir.display()
        ))
    })
}

#[cfg(test)]
mod tests;
