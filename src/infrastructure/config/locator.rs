//! Decides which configuration file, if any, is layered over the defaults.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::loader::ConfigError;

/// Base name of a discoverable configuration file.
pub const CONFIG_FILE_STEM: &str = "go_fcm";

/// Recognised configuration file extensions, in lookup order.
pub const CONFIG_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Where file-based configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ConfigSource {
    /// Path supplied by the caller
    Explicit(PathBuf),
    /// File found in one of the search directories
    Discovered(PathBuf),
    /// No file, only the embedded defaults
    Default,
}

impl ConfigSource {
    /// The file path, unless only the defaults were used.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::Discovered(path) => Some(path),
            Self::Default => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(path) => write!(f, "{} (explicit)", path.display()),
            Self::Discovered(path) => write!(f, "{} (discovered)", path.display()),
            Self::Default => f.write_str("embedded defaults"),
        }
    }
}

/// A located source together with its text, when there is a file.
#[derive(Debug, Clone)]
pub struct LocatedSource {
    /// Which source was picked
    pub source: ConfigSource,
    /// File text, `None` for the embedded defaults
    pub content: Option<String>,
}

/// Search order for configuration files.
#[derive(Debug, Clone)]
pub struct SourceLocator {
    search_paths: Vec<PathBuf>,
    file_stem: String,
}

impl SourceLocator {
    /// Search `search_paths` in order for `<file_stem>.yml` or `.yaml`.
    pub fn new(search_paths: Vec<PathBuf>, file_stem: impl Into<String>) -> Self {
        Self {
            search_paths,
            file_stem: file_stem.into(),
        }
    }

    /// System directory, then `$HOME/.gofcm`, then the working directory.
    pub fn standard_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/gofcm")];
        if let Some(home) = std::env::var_os("HOME").filter(|home| !home.is_empty()) {
            paths.push(PathBuf::from(home).join(".gofcm"));
        }
        paths.push(PathBuf::from("."));
        paths
    }

    /// Directories searched, highest priority first.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Pick a source without reading it.
    ///
    /// A non-empty explicit path always wins, whether or not it exists.
    pub fn locate(&self, explicit: Option<&Path>) -> ConfigSource {
        if let Some(path) = explicit.filter(|path| !path.as_os_str().is_empty()) {
            return ConfigSource::Explicit(path.to_path_buf());
        }

        self.discover()
            .map_or(ConfigSource::Default, ConfigSource::Discovered)
    }

    /// Locate a source and read its content.
    pub fn load(&self, explicit: Option<&Path>) -> Result<LocatedSource, ConfigError> {
        let source = self.locate(explicit);
        let content = match source.path() {
            Some(path) => Some(fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?),
            None => None,
        };

        match &source {
            ConfigSource::Discovered(path) => {
                tracing::info!(path = %path.display(), "using discovered config file");
            }
            ConfigSource::Explicit(path) => {
                tracing::debug!(path = %path.display(), "using explicit config file");
            }
            ConfigSource::Default => {
                tracing::debug!(
                    searched = ?self.search_paths,
                    "no config file found, using embedded defaults"
                );
            }
        }

        Ok(LocatedSource { source, content })
    }

    fn discover(&self) -> Option<PathBuf> {
        self.search_paths.iter().find_map(|dir| {
            CONFIG_EXTENSIONS
                .iter()
                .map(|ext| dir.join(format!("{}.{ext}", self.file_stem)))
                .find(|candidate| candidate.is_file())
        })
    }
}

impl Default for SourceLocator {
    fn default() -> Self {
        Self::new(Self::standard_search_paths(), CONFIG_FILE_STEM)
    }
}
