//! gofcm - configuration resolution for the gofcm push service
//!
//! The effective configuration is resolved once at startup from three layers,
//! lowest precedence first:
//!
//! 1. The embedded default document
//! 2. A YAML file, given explicitly or found in `/etc/gofcm`, `~/.gofcm` or
//!    the working directory as `go_fcm.yml`
//! 3. `GOFCM_<SECTION>_<FIELD>` environment variables
//!
//! The result is a fully populated [`ConfigSchema`] that the caller owns and
//! hands to the listeners, router, logger and storage backend.
//!
//! # Example
//!
//! ```no_run
//! use gofcm::load_config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = load_config(None)?;
//!     println!("listening on {}", config.core.bind_address());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::models::{
    ApiSection, ConfigSchema, CoreSection, LogSection, RpcSection, StorageSection, ThriftSection,
};
pub use infrastructure::config::{
    load_config, ConfigError, ConfigLoader, ConfigSource, ResolvedConfig,
};
pub use infrastructure::logging::{LogConfig, LoggerImpl};
