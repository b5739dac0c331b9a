//! Configuration management infrastructure
//!
//! Layered resolution of [`ConfigSchema`](crate::domain::models::ConfigSchema):
//! - Embedded default document
//! - YAML file (explicit path or discovered in the search paths)
//! - Environment variable overrides (`GOFCM_<SECTION>_<FIELD>`)

pub mod defaults;
pub mod env;
pub mod loader;
pub mod locator;

pub use defaults::{default_document, DEFAULT_CONFIG};
pub use env::{EnvOverrides, ENV_PREFIX};
pub use loader::{load_config, merge_document, ConfigError, ConfigLoader, ResolvedConfig};
pub use locator::{ConfigSource, LocatedSource, SourceLocator, CONFIG_FILE_STEM};
