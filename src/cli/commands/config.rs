//! Implementation of the `gofcm config` commands.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::ConfigSchema;
use crate::infrastructure::config::{ConfigLoader, ConfigSource, DEFAULT_CONFIG};

/// Arguments for `gofcm config`
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Which view of the configuration to print
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// `gofcm config` subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the resolved configuration
    Show {
        /// Print proxy credentials instead of masking them
        #[arg(long)]
        reveal: bool,
    },

    /// Print the embedded default document
    Default,

    /// List the environment variables that override configuration keys
    Env,

    /// Show which configuration file would be used
    Path,
}

/// Output of `config show`
#[derive(Debug, Serialize)]
pub struct ShowOutput {
    /// Where the file layer came from
    pub source: ConfigSource,
    /// Variables that overrode a value
    pub env_overrides: Vec<String>,
    /// The resolved configuration
    pub config: ConfigSchema,
}

impl CommandOutput for ShowOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("# source: {}", self.source)];
        if !self.env_overrides.is_empty() {
            lines.push(format!("# env overrides: {}", self.env_overrides.join(", ")));
        }
        lines.push(serde_yaml::to_string(&self.config).unwrap_or_default());
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Output of `config default`
#[derive(Debug, Serialize)]
pub struct DefaultOutput {
    /// The embedded YAML, printed verbatim in human mode
    #[serde(skip)]
    pub document: &'static str,
    /// The same document decoded
    pub config: ConfigSchema,
}

impl CommandOutput for DefaultOutput {
    fn to_human(&self) -> String {
        self.document.trim().to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }
}

/// One row of `config env`
#[derive(Debug, Serialize)]
pub struct EnvVariable {
    /// Variable name, e.g. `GOFCM_CORE_PORT`
    pub variable: String,
    /// Dotted key it overrides
    pub key: String,
    /// Whether the variable is currently set to a non-empty value
    pub set: bool,
}

/// Output of `config env`
#[derive(Debug, Serialize)]
pub struct EnvOutput {
    /// Every recognised variable
    pub variables: Vec<EnvVariable>,
}

impl CommandOutput for EnvOutput {
    fn to_human(&self) -> String {
        let width = self
            .variables
            .iter()
            .map(|var| var.variable.len())
            .max()
            .unwrap_or(0);

        self.variables
            .iter()
            .map(|var| {
                let marker = if var.set { "  (set)" } else { "" };
                format!("{:<width$}  {}{marker}", var.variable, var.key)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Output of `config path`
#[derive(Debug, Serialize)]
pub struct PathOutput {
    /// The file that would be used, if any
    pub source: ConfigSource,
    /// Directories searched when no explicit path is given
    pub search_paths: Vec<PathBuf>,
}

impl CommandOutput for PathOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Source: {}", self.source)];
        if !matches!(self.source, ConfigSource::Explicit(_)) {
            lines.push("Searched:".to_string());
            for dir in &self.search_paths {
                lines.push(format!("  - {}", dir.display()));
            }
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run a `gofcm config` subcommand.
pub fn execute(args: ConfigArgs, config_path: Option<&Path>, json_mode: bool) -> Result<()> {
    match args.command {
        ConfigCommands::Show { reveal } => {
            let resolved = super::resolve(config_path)?;
            let config = if reveal {
                resolved.config
            } else {
                resolved.config.redacted()
            };
            output(
                &ShowOutput {
                    source: resolved.source,
                    env_overrides: resolved.env_overrides,
                    config,
                },
                json_mode,
            );
        }
        ConfigCommands::Default => {
            output(
                &DefaultOutput {
                    document: DEFAULT_CONFIG,
                    config: ConfigSchema::default(),
                },
                json_mode,
            );
        }
        ConfigCommands::Env => {
            let loader = ConfigLoader::new();
            let variables = loader
                .env()
                .variable_names()
                .into_iter()
                .map(|(variable, key)| EnvVariable {
                    set: std::env::var_os(&variable).is_some_and(|value| !value.is_empty()),
                    variable,
                    key,
                })
                .collect();
            output(&EnvOutput { variables }, json_mode);
        }
        ConfigCommands::Path => {
            let loader = ConfigLoader::new();
            output(
                &PathOutput {
                    source: loader.locator().locate(config_path),
                    search_paths: loader.locator().search_paths().to_vec(),
                },
                json_mode,
            );
        }
    }

    Ok(())
}
