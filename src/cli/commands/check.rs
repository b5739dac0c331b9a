//! Implementation of the `gofcm check` command.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::ConfigSchema;
use crate::infrastructure::config::ConfigSource;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};

/// Startup summary printed by `gofcm check`
#[derive(Debug, Serialize)]
pub struct CheckOutput {
    /// Where the file layer came from
    pub source: ConfigSource,
    /// HTTP listen address
    pub bind_address: String,
    /// Worker threads the service would use
    pub parallelism: usize,
    /// Thrift listen address, `None` when disabled
    pub thrift: Option<String>,
    /// RPC listen address, `None` when disabled
    pub rpc: Option<String>,
    /// Storage backend location
    pub storage_path: String,
}

impl CheckOutput {
    /// Summarise `config` for display.
    pub fn from_config(config: &ConfigSchema, source: ConfigSource) -> Self {
        Self {
            source,
            bind_address: config.core.bind_address(),
            parallelism: config.core.parallelism(),
            thrift: config
                .thrift
                .enabled
                .then(|| format!("{}:{}", config.core.host, config.thrift.port)),
            rpc: config
                .rpc
                .enabled
                .then(|| format!("{}:{}", config.core.host, config.rpc.port)),
            storage_path: config.storage.path.clone(),
        }
    }
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        let listener = |addr: &Option<String>| addr.clone().unwrap_or_else(|| "disabled".to_string());
        [
            "Configuration OK".to_string(),
            format!("  source:      {}", self.source),
            format!("  http:        {}", self.bind_address),
            format!("  thrift:      {}", listener(&self.thrift)),
            format!("  rpc:         {}", listener(&self.rpc)),
            format!("  parallelism: {}", self.parallelism),
            format!("  storage:     {}", self.storage_path),
        ]
        .join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Resolve, install the configured logger and print the summary.
pub fn execute(config_path: Option<&Path>, json_mode: bool) -> Result<()> {
    let resolved = super::resolve(config_path)?;
    let config = &resolved.config;

    let log_config =
        LogConfig::from_section(&config.log).context("Invalid log section in configuration")?;
    let _logger = LoggerImpl::init(&log_config)?;

    let summary = CheckOutput::from_config(config, resolved.source.clone());
    tracing::info!(
        source = %summary.source,
        bind = %summary.bind_address,
        parallelism = summary.parallelism,
        thrift = summary.thrift.as_deref().unwrap_or("disabled"),
        rpc = summary.rpc.as_deref().unwrap_or("disabled"),
        http_proxy = %config.redacted().core.http_proxy,
        env_overrides = ?resolved.env_overrides,
        "configuration resolved"
    );

    output(&summary, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_defaults() {
        let config = ConfigSchema::default();
        let summary = CheckOutput::from_config(&config, ConfigSource::Default);

        assert_eq!(summary.bind_address, "0.0.0.0:2701");
        assert_eq!(summary.thrift.as_deref(), Some("0.0.0.0:2702"));
        assert!(summary.rpc.is_none());
        assert!(summary.parallelism >= 1);
        assert!(summary.to_human().contains("rpc:         disabled"));
    }
}
