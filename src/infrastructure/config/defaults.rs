//! Embedded default configuration document

/// Canonical configuration. Every field of [`ConfigSchema`] is present, so any
/// lower-precedence gap is always filled from here.
///
/// [`ConfigSchema`]: crate::domain::models::ConfigSchema
pub const DEFAULT_CONFIG: &str = r#"
core:
  host: "0.0.0.0" # ip address to bind (default: any)
  port: "2701"
  cpu_num: 0 # 0 uses every available cpu
  http_proxy: "" # proxy for FCM (default: none)
thrift:
  enabled: true
  port: "2702"
  framed: false
  buffered: false
rpc:
  enabled: false
  port: "2703"
api:
  admin_uri: "/admin"
  app_uri: "/api/applications"
  push_uri: "/api/push"
  stat_go_uri: "/api/stat/go"
  stat_app_uri: "/api/stat/app"
  config_uri: "/api/config"
  sys_stat_uri: "/sys/stats"
  metric_uri: "/metrics"
  health_uri: "/healthz"
log:
  format: "string" # string or json
  access_log: "stdout" # stdout, stderr, or a file path like "log/access_log"
  access_level: "debug"
  error_log: "stderr" # stdout, stderr, or a file path like "log/error_log"
  error_level: "error"
storage:
  path: "level.db"
"#;

/// The default document as raw bytes.
pub const fn default_document() -> &'static [u8] {
    DEFAULT_CONFIG.as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ConfigSchema;

    #[test]
    fn test_default_document_decodes() {
        let config: ConfigSchema =
            serde_yaml::from_slice(default_document()).expect("default document must decode");

        assert_eq!(config.core.host, "0.0.0.0");
        assert_eq!(config.core.port, "2701");
        assert_eq!(config.core.cpu_num, 0);
        assert_eq!(config.core.http_proxy, "");
        assert!(config.thrift.enabled);
        assert_eq!(config.thrift.port, "2702");
        assert!(!config.rpc.enabled);
        assert_eq!(config.rpc.port, "2703");
        assert_eq!(config.api.health_uri, "/healthz");
        assert_eq!(config.log.format, "string");
        assert_eq!(config.log.error_log, "stderr");
        assert_eq!(config.storage.path, "level.db");
    }

    #[test]
    fn test_default_document_has_no_unknown_sections() {
        let raw: serde_yaml::Mapping =
            serde_yaml::from_str(DEFAULT_CONFIG).expect("default document must be a mapping");
        let mut keys: Vec<_> = raw.keys().filter_map(serde_yaml::Value::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["api", "core", "log", "rpc", "storage", "thrift"]);
    }
}
