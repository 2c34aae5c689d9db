//! Base configuration: active backends, hierarchy and per-backend settings.
//!
//! Every recognised key may also be spelled symbol-style with a leading
//! colon (`:backends`, `:hierarchy`, `:yaml`, `:datadir`); the plain spelling
//! is checked first. Configuration is loaded through `figment`, either from a
//! YAML file via [`SaphyrYaml`] or from an in-memory value.

mod yaml;

pub use yaml::SaphyrYaml;

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::Serialized;
use serde_json::{Map, Value};

use crate::backend::{Backend, BackendKind, BackendRegistry};
use crate::document::kind_name;
use crate::error::{HieraError, HieraResult};
use crate::template::Template;

/// Datadir used when a backend's settings block omits one.
pub const DEFAULT_DATADIR: &str = "/etc/puppetlabs/code/environments/%{environment}/hieradata";

/// Look up `key` in `map`, falling back to its symbol-style spelling.
///
/// # Examples
///
/// ```
/// use hierdata::config::sym_lookup;
/// use serde_json::json;
///
/// let map = json!({":hierarchy": ["common"]});
/// let map = map.as_object().cloned().unwrap_or_default();
/// assert_eq!(sym_lookup(&map, "hierarchy"), Some(&json!(["common"])));
/// assert_eq!(sym_lookup(&map, "backends"), None);
/// ```
#[must_use]
pub fn sym_lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).or_else(|| map.get(&format!(":{key}")))
}

/// A loaded base configuration.
///
/// Loading only checks that the configuration is a non-empty mapping. The
/// recognised keys are validated when an engine is built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseConfig {
    values: Map<String, Value>,
    base_dir: Option<Utf8PathBuf>,
}

impl BaseConfig {
    /// Load a YAML base configuration from `path`.
    ///
    /// Relative datadirs will resolve against the directory containing the
    /// file.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::BaseConfig`] when the file cannot be read or
    /// parsed, and [`HieraError::Configuration`] when it is empty.
    pub fn from_file(path: impl AsRef<Utf8Path>) -> HieraResult<Self> {
        let file = path.as_ref();
        let figment = Figment::from(SaphyrYaml::file(file));
        let values = figment
            .extract::<Map<String, Value>>()
            .map_err(|err| HieraError::BaseConfig {
                path: file.to_owned(),
                source: Box::new(err),
            })?;
        tracing::debug!(path = %file, "loaded base configuration");
        let base_dir = file.parent().map(Utf8Path::to_owned).unwrap_or_default();
        Self::from_map(values, Some(base_dir))
    }

    /// Use an in-memory configuration mapping.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::Configuration`] when `value` is not a non-empty
    /// mapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use hierdata::config::BaseConfig;
    /// use serde_json::json;
    ///
    /// let config = BaseConfig::from_value(json!({
    ///     "backends": ["yaml"],
    ///     "hierarchy": ["nodes/%{hostname}", "common"],
    ///     "yaml": {"datadir": "hieradata"},
    /// }))?;
    /// assert_eq!(config.backend_names()?, ["yaml"]);
    /// # Ok::<(), hierdata::HieraError>(())
    /// ```
    pub fn from_value(value: Value) -> HieraResult<Self> {
        if !value.is_object() {
            return Err(HieraError::configuration(format!(
                "expected a mapping, found a {}",
                kind_name(&value)
            )));
        }
        Self::from_figment(&Figment::from(Serialized::defaults(value)))
    }

    /// Extract a configuration from an assembled figment.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::Configuration`] when extraction fails or yields
    /// an empty mapping.
    pub fn from_figment(figment: &Figment) -> HieraResult<Self> {
        let values = figment
            .extract::<Map<String, Value>>()
            .map_err(|err| HieraError::configuration(err.to_string()))?;
        Self::from_map(values, None)
    }

    fn from_map(values: Map<String, Value>, base_dir: Option<Utf8PathBuf>) -> HieraResult<Self> {
        if values.is_empty() {
            return Err(HieraError::configuration("base configuration is empty"));
        }
        Ok(Self { values, base_dir })
    }

    /// Directory of the file this configuration was loaded from.
    #[must_use]
    pub fn base_dir(&self) -> Option<&Utf8Path> {
        self.base_dir.as_deref()
    }

    /// Raw value of a top-level key, accepting the symbol-style spelling.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        sym_lookup(&self.values, key)
    }

    /// Backend names from `backends`, in declared order, without repeats.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::NoBackends`] when the list is absent or empty and
    /// [`HieraError::Configuration`] when it is not a list of strings.
    pub fn backend_names(&self) -> HieraResult<Vec<String>> {
        let names = self
            .get("backends")
            .map(|value| string_list("backends", value))
            .transpose()?
            .unwrap_or_default();
        let mut unique: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        if unique.is_empty() {
            return Err(HieraError::NoBackends);
        }
        Ok(unique)
    }

    /// Parsed hierarchy level templates, in declared order.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::MissingHierarchy`] when `hierarchy` is absent and
    /// [`HieraError::Configuration`] when it is not a list of strings.
    pub fn hierarchy(&self) -> HieraResult<Vec<Template>> {
        let levels = self.get("hierarchy").ok_or(HieraError::MissingHierarchy)?;
        Ok(string_list("hierarchy", levels)?
            .iter()
            .map(|level| Template::parse(level))
            .collect())
    }

    /// Datadir template for `backend`, or [`DEFAULT_DATADIR`].
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::Configuration`] when the settings block or its
    /// `datadir` has the wrong shape.
    pub fn datadir(&self, backend: &str) -> HieraResult<Template> {
        let datadir = match self.get(backend) {
            None | Some(Value::Null) => None,
            Some(Value::Object(settings)) => sym_lookup(settings, "datadir"),
            Some(other) => {
                return Err(HieraError::configuration(format!(
                    "settings for backend `{backend}` must be a mapping, found a {}",
                    kind_name(other)
                )));
            }
        };
        match datadir {
            None | Some(Value::Null) => Ok(Template::parse(DEFAULT_DATADIR)),
            Some(Value::String(template)) => Ok(Template::parse(template)),
            Some(other) => Err(HieraError::configuration(format!(
                "datadir for backend `{backend}` must be a string, found a {}",
                kind_name(other)
            ))),
        }
    }

    /// Activate the configured backends, drawing variants from `available`.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::UnknownBackend`] for a name that is not in
    /// `available`, plus any error of [`Self::backend_names`] or
    /// [`Self::datadir`].
    pub fn registry(&self, available: &[BackendKind]) -> HieraResult<BackendRegistry> {
        let backends = self
            .backend_names()?
            .into_iter()
            .map(|name| {
                let kind = BackendKind::from_name(&name)
                    .filter(|kind| available.contains(kind))
                    .ok_or_else(|| HieraError::UnknownBackend { name: name.clone() })?;
                Ok(Backend::new(kind, self.datadir(&name)?))
            })
            .collect::<HieraResult<Vec<_>>>()?;
        Ok(BackendRegistry::new(backends))
    }
}

fn string_list(key: &str, value: &Value) -> HieraResult<Vec<String>> {
    match value {
        Value::String(single) => Ok(vec![single.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_owned).ok_or_else(|| {
                    HieraError::configuration(format!(
                        "`{key}` entries must be strings, found a {}",
                        kind_name(item)
                    ))
                })
            })
            .collect(),
        other => Err(HieraError::configuration(format!(
            "`{key}` must be a list, found a {}",
            kind_name(other)
        ))),
    }
}

#[cfg(test)]
mod tests;
