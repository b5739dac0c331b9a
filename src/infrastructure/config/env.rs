//! Environment variable overrides
//!
//! Every scalar field has a variable named `<PREFIX>_<SECTION>_<FIELD>`, e.g.
//! `GOFCM_CORE_PORT` or `GOFCM_CORE_HTTP_PROXY`. A set, non-empty variable
//! replaces the value produced by the file and default layers.

use std::collections::HashMap;
use std::env::VarError;

use super::loader::ConfigError;
use crate::domain::models::ConfigSchema;

/// Default variable prefix.
pub const ENV_PREFIX: &str = "GOFCM";

type Apply = fn(&mut ConfigSchema, &str) -> Result<(), String>;

/// Binds one schema field to its environment variable.
#[derive(Clone, Copy)]
pub struct EnvBinding {
    /// Schema section, e.g. `core`
    pub section: &'static str,
    /// Field within the section, e.g. `http_proxy`
    pub field: &'static str,
    apply: Apply,
}

impl EnvBinding {
    /// Dotted key, e.g. `core.http_proxy`.
    pub fn key(&self) -> String {
        format!("{}.{}", self.section, self.field)
    }

    /// Variable name under `prefix`, e.g. `GOFCM_CORE_HTTP_PROXY`.
    pub fn variable(&self, prefix: &str) -> String {
        format!("{prefix}_{}_{}", self.section, self.field).to_uppercase()
    }
}

impl std::fmt::Debug for EnvBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvBinding")
            .field("section", &self.section)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

macro_rules! bindings {
    ($($section:ident . $field:ident => $parse:ident),* $(,)?) => {
        &[$(EnvBinding {
            section: stringify!($section),
            field: stringify!($field),
            apply: |config: &mut ConfigSchema, raw: &str| -> Result<(), String> {
                config.$section.$field = $parse(raw)?;
                Ok(())
            },
        }),*]
    };
}

/// One binding per schema field.
pub const BINDINGS: &[EnvBinding] = bindings![
    core.host => parse_string,
    core.port => parse_string,
    core.cpu_num => parse_unsigned,
    core.http_proxy => parse_string,
    thrift.enabled => parse_bool,
    thrift.port => parse_string,
    thrift.framed => parse_bool,
    thrift.buffered => parse_bool,
    rpc.enabled => parse_bool,
    rpc.port => parse_string,
    api.admin_uri => parse_string,
    api.app_uri => parse_string,
    api.push_uri => parse_string,
    api.stat_go_uri => parse_string,
    api.stat_app_uri => parse_string,
    api.config_uri => parse_string,
    api.sys_stat_uri => parse_string,
    api.metric_uri => parse_string,
    api.health_uri => parse_string,
    log.format => parse_string,
    log.access_log => parse_string,
    log.access_level => parse_string,
    log.error_log => parse_string,
    log.error_level => parse_string,
    storage.path => parse_string,
];

#[allow(clippy::unnecessary_wraps)]
fn parse_string(raw: &str) -> Result<String, String> {
    Ok(raw.to_string())
}

/// Accepts the usual spellings: `1 t T TRUE true True` and their negations.
fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(format!("expected a boolean, found {raw:?}")),
    }
}

fn parse_unsigned(raw: &str) -> Result<usize, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("expected a non-negative integer, found {raw:?}"))
}

/// Applies environment overrides with a fixed prefix.
#[derive(Debug, Clone)]
pub struct EnvOverrides {
    prefix: String,
}

impl EnvOverrides {
    /// Overrides read from `<prefix>_<SECTION>_<FIELD>`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// `(variable, key)` pairs for every recognised variable.
    pub fn variable_names(&self) -> Vec<(String, String)> {
        BINDINGS
            .iter()
            .map(|binding| (binding.variable(&self.prefix), binding.key()))
            .collect()
    }

    /// Apply overrides read through `lookup`.
    ///
    /// Returns the names of variables that took effect.
    pub fn apply<F>(&self, config: &mut ConfigSchema, lookup: F) -> Result<Vec<String>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = Vec::new();

        for binding in BINDINGS {
            let variable = binding.variable(&self.prefix);
            let Some(raw) = lookup(&variable).filter(|value| !value.is_empty()) else {
                continue;
            };

            (binding.apply)(config, &raw)
                .map_err(|reason| ConfigError::Decode(format!("{variable}: {reason}")))?;

            tracing::debug!(variable = %variable, key = %binding.key(), "applied env override");
            applied.push(variable);
        }

        Ok(applied)
    }

    /// Snapshot the recognised variables from the process environment.
    ///
    /// A set variable that is not valid unicode is a `Decode` error rather
    /// than being treated as unset.
    pub fn read_process(&self) -> Result<HashMap<String, String>, ConfigError> {
        let mut vars = HashMap::new();

        for binding in BINDINGS {
            let variable = binding.variable(&self.prefix);
            match std::env::var(&variable) {
                Ok(value) => {
                    vars.insert(variable, value);
                }
                Err(VarError::NotPresent) => {}
                Err(VarError::NotUnicode(_)) => {
                    return Err(ConfigError::Decode(format!(
                        "{variable}: value is not valid unicode"
                    )));
                }
            }
        }

        Ok(vars)
    }
}

impl Default for EnvOverrides {
    fn default() -> Self {
        Self::new(ENV_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::defaults::DEFAULT_CONFIG;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn defaults() -> ConfigSchema {
        serde_yaml::from_str(DEFAULT_CONFIG).unwrap()
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_variable_names() {
        let env = EnvOverrides::default();
        let vars = env.variable_names();
        assert_eq!(vars.len(), 25);
        assert!(vars.contains(&("GOFCM_CORE_PORT".to_string(), "core.port".to_string())));
        assert!(vars.contains(&(
            "GOFCM_CORE_HTTP_PROXY".to_string(),
            "core.http_proxy".to_string()
        )));
        assert!(vars.contains(&(
            "GOFCM_API_SYS_STAT_URI".to_string(),
            "api.sys_stat_uri".to_string()
        )));
    }

    #[test]
    fn test_every_binding_is_unique() {
        let mut keys: Vec<_> = BINDINGS.iter().map(EnvBinding::key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), BINDINGS.len());
    }

    #[test]
    fn test_string_override() {
        let mut config = defaults();
        let applied = EnvOverrides::default()
            .apply(&mut config, lookup(&[("GOFCM_CORE_PORT", "9999")]))
            .unwrap();

        assert_eq!(config.core.port, "9999");
        assert_eq!(config.core.host, "0.0.0.0");
        assert_eq!(applied, vec!["GOFCM_CORE_PORT".to_string()]);
    }

    #[test]
    fn test_typed_overrides() {
        let mut config = defaults();
        EnvOverrides::default()
            .apply(
                &mut config,
                lookup(&[
                    ("GOFCM_THRIFT_ENABLED", "false"),
                    ("GOFCM_RPC_ENABLED", "1"),
                    ("GOFCM_CORE_CPU_NUM", " 8 "),
                    ("GOFCM_STORAGE_PATH", "/var/lib/gofcm/level.db"),
                ]),
            )
            .unwrap();

        assert!(!config.thrift.enabled);
        assert!(config.rpc.enabled);
        assert_eq!(config.core.cpu_num, 8);
        assert_eq!(config.storage.path, "/var/lib/gofcm/level.db");
    }

    #[test]
    fn test_invalid_bool_is_decode_error() {
        let mut config = defaults();
        let err = EnvOverrides::default()
            .apply(&mut config, lookup(&[("GOFCM_THRIFT_FRAMED", "maybe")]))
            .unwrap_err();

        match err {
            ConfigError::Decode(message) => assert!(message.contains("GOFCM_THRIFT_FRAMED")),
            other => panic!("expected Decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_cpu_num_is_decode_error() {
        let mut config = defaults();
        let result =
            EnvOverrides::default().apply(&mut config, lookup(&[("GOFCM_CORE_CPU_NUM", "-2")]));
        assert!(matches!(result, Err(ConfigError::Decode(_))));
    }

    #[test]
    fn test_empty_and_unset_variables_are_ignored() {
        let mut config = defaults();
        let applied = EnvOverrides::default()
            .apply(&mut config, lookup(&[("GOFCM_CORE_HOST", "")]))
            .unwrap();

        assert!(applied.is_empty());
        assert_eq!(config, defaults());
    }

    #[test]
    fn test_custom_prefix() {
        let mut config = defaults();
        EnvOverrides::new("PUSHD")
            .apply(
                &mut config,
                lookup(&[("PUSHD_LOG_FORMAT", "json"), ("GOFCM_LOG_FORMAT", "ignored")]),
            )
            .unwrap();
        assert_eq!(config.log.format, "json");
    }

    #[test]
    fn test_read_process_snapshots_prefixed_variables() {
        temp_env::with_vars(
            [
                ("GOFCM_UT_READ_CORE_HOST", Some("10.1.2.3")),
                ("GOFCM_UT_READ_UNRELATED", Some("x")),
            ],
            || {
                let vars = EnvOverrides::new("GOFCM_UT_READ").read_process().unwrap();
                assert_eq!(vars.len(), 1);
                assert_eq!(vars["GOFCM_UT_READ_CORE_HOST"], "10.1.2.3");
            },
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_variable_is_decode_error() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let value = OsString::from_vec(vec![b'h', 0xff, b'x']);
        temp_env::with_var("GOFCM_UT_RAW_CORE_HOST", Some(value), || {
            let err = EnvOverrides::new("GOFCM_UT_RAW").read_process().unwrap_err();
            match err {
                ConfigError::Decode(message) => {
                    assert!(message.contains("GOFCM_UT_RAW_CORE_HOST"), "{message}");
                }
                other => panic!("expected Decode error, got {other:?}"),
            }
        });
    }

    proptest! {
        #[test]
        fn prop_parse_bool_rejects_unknown_words(word in "[a-z]{2,8}") {
            prop_assume!(!["true", "false"].contains(&word.as_str()));
            prop_assert!(parse_bool(&word).is_err());
        }

        #[test]
        fn prop_unsigned_roundtrips(n in 0usize..1_000_000) {
            prop_assert_eq!(parse_unsigned(&n.to_string()), Ok(n));
        }
    }
}
