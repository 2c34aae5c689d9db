//! Figment provider for YAML base configurations backed by `serde-saphyr`.
//!
//! The shared `SaphyrYaml` provider. It reads through the same cap-std helper
//! as the data backends, so base configurations and data files share one read
//! path.

use camino::{Utf8Path, Utf8PathBuf};
use figment::{
    Metadata, Profile, Provider,
    error::Kind,
    value::{Dict, Map, Value as FigmentValue},
};
use serde_saphyr::Options;

use crate::backend::read::read_file;

#[derive(Debug, Clone)]
enum YamlInput {
    File,
    Inline(String),
}

/// Figment provider that reads a YAML base configuration with strict
/// booleans.
///
/// # Examples
///
/// ```
/// use figment::Figment;
/// use hierdata::config::SaphyrYaml;
///
/// let figment = Figment::from(SaphyrYaml::string(
///     "hiera.yaml",
///     "backends: [yaml]\nhierarchy: [common]\n",
/// ));
/// let backends: Vec<String> = figment.extract_inner("backends")?;
/// assert_eq!(backends, ["yaml"]);
/// # Ok::<(), figment::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SaphyrYaml {
    path: Utf8PathBuf,
    input: YamlInput,
}

impl SaphyrYaml {
    /// Read the configuration from `path` when the figment is extracted.
    #[must_use]
    pub fn file(path: impl AsRef<Utf8Path>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
            input: YamlInput::File,
        }
    }

    /// Use in-memory YAML, reported as coming from `path`.
    #[must_use]
    pub fn string(path: impl AsRef<Utf8Path>, contents: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
            input: YamlInput::Inline(contents.into()),
        }
    }

    fn read_contents(&self) -> Result<String, figment::Error> {
        match &self.input {
            YamlInput::File => read_file(&self.path).map_err(|err| {
                figment::Error::from(format!("failed to read {}: {err}", self.path))
            }),
            YamlInput::Inline(contents) => Ok(contents.clone()),
        }
    }

    fn parse_value(contents: &str) -> Result<FigmentValue, serde_saphyr::Error> {
        serde_saphyr::from_str_with_options(
            contents,
            Options {
                strict_booleans: true,
                ..Options::default()
            },
        )
    }
}

impl Provider for SaphyrYaml {
    fn metadata(&self) -> Metadata {
        Metadata::from("Saphyr YAML", self.path.as_std_path())
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let contents = self.read_contents()?;
        let value = Self::parse_value(&contents).map_err(|err| {
            figment::Error::from(Kind::Message(format!(
                "failed to parse {}: {err}",
                self.path
            )))
        })?;
        let actual = value.to_actual();
        let dict = value
            .into_dict()
            .ok_or_else(|| figment::Error::from(Kind::InvalidType(actual, "map".into())))?;
        Ok(Profile::Default.collect(dict))
    }
}
