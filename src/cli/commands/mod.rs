//! CLI command implementations.

pub mod check;
pub mod config;

use std::path::Path;

use anyhow::{Context, Result};

use crate::infrastructure::config::{ConfigLoader, ConfigSource, ResolvedConfig};

/// Resolve once for a command, reporting a discovered file on stderr.
pub(crate) fn resolve(config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let resolved = ConfigLoader::new()
        .load(config_path)
        .context("Failed to resolve configuration")?;

    if let Some(notice) = discovery_notice(&resolved.source) {
        eprintln!("{notice}");
    }

    Ok(resolved)
}

/// Diagnostic line for a file found by searching. Explicit paths and the
/// embedded defaults are not announced.
fn discovery_notice(source: &ConfigSource) -> Option<String> {
    match source {
        ConfigSource::Discovered(path) => Some(format!("Using config file: {}", path.display())),
        ConfigSource::Explicit(_) | ConfigSource::Default => None,
    }
}
