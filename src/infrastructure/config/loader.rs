//! Layer merging and the resolution entry points.

use std::path::{Path, PathBuf};

use figment::providers::Serialized;
use figment::Figment;
use thiserror::Error;

use super::env::EnvOverrides;
use super::locator::{ConfigSource, SourceLocator};
use crate::domain::models::ConfigSchema;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A chosen file could not be read
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        /// File that was chosen
        path: PathBuf,
        /// Underlying read failure
        #[source]
        source: std::io::Error,
    },

    /// A document is not well-formed YAML
    #[error("Invalid YAML in {origin}: {source}")]
    Parse {
        /// Name of the document
        origin: String,
        /// Parser error with position
        #[source]
        source: serde_yaml::Error,
    },

    /// A value does not fit the schema
    #[error("Invalid configuration value: {0}")]
    Decode(String),
}

/// Resolution result: the configuration and where its file layer came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// The effective configuration
    pub config: ConfigSchema,
    /// Where the file layer came from
    pub source: ConfigSource,
    /// Environment variables that overrode a value
    pub env_overrides: Vec<String>,
}

/// Merge a YAML document over the embedded defaults and decode it.
///
/// `origin` names the document in error messages. `None` decodes the defaults
/// alone. Fields missing from `document` keep their default value, including
/// fields of a partially specified section.
pub fn merge_document(document: Option<&str>, origin: &str) -> Result<ConfigSchema, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ConfigSchema::default()));

    if let Some(text) = document {
        let parsed: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
                origin: origin.to_string(),
                source,
            })?;

        match prune_document(parsed) {
            None => {}
            Some(value @ serde_yaml::Value::Mapping(_)) => {
                figment = figment.merge(Serialized::defaults(value));
            }
            Some(other) => {
                return Err(ConfigError::Decode(format!(
                    "{origin}: expected a mapping of sections at the top level, found {}",
                    describe(&other)
                )));
            }
        }
    }

    figment
        .extract()
        .map_err(|err| decode_error(origin, &err))
}

/// Name the document and the dotted key instead of figment's provider metadata.
fn decode_error(origin: &str, err: &figment::Error) -> ConfigError {
    if err.path.is_empty() {
        ConfigError::Decode(format!("{origin}: {}", err.kind))
    } else {
        ConfigError::Decode(format!("{origin}: {}: {}", err.path.join("."), err.kind))
    }
}

/// An empty key (`port:`) means "not set here", so it must not blank out the
/// lower layer. Keys that are not strings can never name a field and are
/// dropped along with nulls.
fn prune_document(value: serde_yaml::Value) -> Option<serde_yaml::Value> {
    match value {
        serde_yaml::Value::Null => None,
        serde_yaml::Value::Mapping(mapping) => Some(serde_yaml::Value::Mapping(
            mapping
                .into_iter()
                .filter(|(key, _)| key.is_string())
                .filter_map(|(key, value)| prune_document(value).map(|value| (key, value)))
                .collect(),
        )),
        serde_yaml::Value::Tagged(tagged) => prune_document(tagged.value),
        other => Some(other),
    }
}

const fn describe(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

/// Configuration loader with hierarchical merging
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    locator: SourceLocator,
    env: EnvOverrides,
}

impl ConfigLoader {
    /// Loader with the standard search paths and the `GOFCM` prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the directories searched when no explicit path is given.
    #[must_use]
    pub fn with_search_paths(mut self, search_paths: Vec<PathBuf>) -> Self {
        self.locator = SourceLocator::new(search_paths, super::locator::CONFIG_FILE_STEM);
        self
    }

    /// Read overrides from `<prefix>_<SECTION>_<FIELD>` instead of `GOFCM_...`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env = EnvOverrides::new(prefix);
        self
    }

    /// The file locator in use.
    pub const fn locator(&self) -> &SourceLocator {
        &self.locator
    }

    /// The environment layer in use.
    pub const fn env(&self) -> &EnvOverrides {
        &self.env
    }

    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Embedded default document
    /// 2. The explicit file, or the first `go_fcm.{yml,yaml}` found in the
    ///    search paths
    /// 3. Environment variables (`GOFCM_<SECTION>_<FIELD>`)
    ///
    /// A set variable whose value is not valid unicode is a `Decode` error.
    pub fn load(&self, explicit: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
        let vars = self.env.read_process()?;
        self.load_with_env(explicit, |name| vars.get(name).cloned())
    }

    /// Same as [`load`](Self::load), reading variables through `lookup`.
    pub fn load_with_env<F>(
        &self,
        explicit: Option<&Path>,
        lookup: F,
    ) -> Result<ResolvedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let located = self.locator.load(explicit)?;
        let origin = located.source.to_string();

        let mut config = merge_document(located.content.as_deref(), &origin)?;
        let env_overrides = self.env.apply(&mut config, lookup)?;

        tracing::debug!(
            source = %located.source,
            overrides = env_overrides.len(),
            "configuration resolved"
        );

        Ok(ResolvedConfig {
            config,
            source: located.source,
            env_overrides,
        })
    }
}

/// Resolve the configuration with the standard loader and process environment.
///
/// Shorthand for [`ConfigLoader::load`] when the source does not matter.
pub fn load_config(path: Option<&Path>) -> Result<ConfigSchema, ConfigError> {
    ConfigLoader::new().load(path).map(|resolved| resolved.config)
}
