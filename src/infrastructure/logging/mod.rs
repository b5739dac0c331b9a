//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber, configured from
//! the resolved `log` section:
//! - Plain text or JSON formatting
//! - Separate access and error streams
//! - Console or file destinations

pub mod config;
pub mod logger;

pub use config::{parse_log_level, LogConfig, LogFormat, LogSink, LogTarget};
pub use logger::{build_layers, LoggerImpl};
