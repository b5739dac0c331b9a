//! The configuration schema.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::infrastructure::config::defaults::DEFAULT_CONFIG;

/// Resolved runtime configuration for the gofcm service.
///
/// Every section and field is always present: values that no source sets come
/// from the embedded default document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConfigSchema {
    /// Network binding and process-level settings
    pub core: CoreSection,

    /// Thrift listener
    pub thrift: ThriftSection,

    /// RPC listener
    pub rpc: RpcSection,

    /// HTTP API routes
    pub api: ApiSection,

    /// Access and error logging
    pub log: LogSection,

    /// Storage backend
    pub storage: StorageSection,
}

/// Core network settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreSection {
    /// IP address to bind (`0.0.0.0` binds any)
    pub host: String,

    /// HTTP listener port
    #[serde(deserialize_with = "port_string")]
    pub port: String,

    /// Worker parallelism hint, 0 means all available CPUs
    pub cpu_num: usize,

    /// Proxy used for outbound push requests, empty for none
    pub http_proxy: String,
}

impl CoreSection {
    /// `host:port` pair for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Effective parallelism: `cpu_num`, or the available CPU count when unset.
    pub fn parallelism(&self) -> usize {
        if self.cpu_num > 0 {
            return self.cpu_num;
        }
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    }
}

/// Thrift listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThriftSection {
    /// Start the Thrift listener
    pub enabled: bool,
    /// Thrift listener port
    #[serde(deserialize_with = "port_string")]
    pub port: String,
    /// Use the framed transport
    pub framed: bool,
    /// Use the buffered transport
    pub buffered: bool,
}

/// RPC listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcSection {
    /// Start the RPC listener
    pub enabled: bool,
    /// RPC listener port
    #[serde(deserialize_with = "port_string")]
    pub port: String,
}

/// URI paths served by the HTTP API router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSection {
    /// Admin console
    pub admin_uri: String,
    /// Application registration
    pub app_uri: String,
    /// Push submission
    pub push_uri: String,
    /// Runtime statistics
    pub stat_go_uri: String,
    /// Per-application statistics
    pub stat_app_uri: String,
    /// Effective configuration dump
    pub config_uri: String,
    /// System statistics
    pub sys_stat_uri: String,
    /// Metrics scrape endpoint
    pub metric_uri: String,
    /// Liveness check
    pub health_uri: String,
}

/// Logging destinations and levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSection {
    /// `string` or `json`
    pub format: String,

    /// `stdout`, `stderr`, or a file path
    pub access_log: String,

    /// Most verbose level written to the access log
    pub access_level: String,

    /// `stdout`, `stderr`, or a file path
    pub error_log: String,

    /// Least severe level routed to the error log
    pub error_level: String,
}

/// Storage backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSection {
    /// Database location on disk
    pub path: String,
}

static PROXY_USERINFO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<scheme>[a-zA-Z][a-zA-Z0-9+.-]*://)?(?P<user>[^:@/]+)(?::[^@/]*)?@")
        .expect("proxy userinfo pattern is valid")
});

impl Default for ConfigSchema {
    /// The embedded default document, decoded.
    fn default() -> Self {
        serde_yaml::from_str(DEFAULT_CONFIG).expect("embedded default document is valid")
    }
}

impl ConfigSchema {
    /// Copy of the configuration that is safe to print or log.
    ///
    /// Credentials embedded in `core.http_proxy` are masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.core.http_proxy = PROXY_USERINFO
            .replace(&self.core.http_proxy, "${scheme}${user}:****@")
            .into_owned();
        copy
    }
}

/// Ports are strings in the schema, but YAML authors often write them bare.
fn port_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Text(String),
        Number(u64),
    }

    Ok(match Port::deserialize(deserializer)? {
        Port::Text(text) => text,
        Port::Number(number) => number.to_string(),
    })
}
