//! Logging settings derived from the `log` section.

use std::path::PathBuf;

use anyhow::Result;
use tracing::level_filters::LevelFilter;

use crate::domain::models::LogSection;

/// Logging configuration derived from the `log` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Line format shared by both streams
    pub format: LogFormat,
    /// Access stream: events below the error level
    pub access: LogSink,
    /// Error stream: events at or above the error level
    pub error: LogSink,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain text lines
    String,
    /// One JSON object per line
    Json,
}

/// One log stream: where it goes and how verbose it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSink {
    /// Destination
    pub target: LogTarget,
    /// Most verbose level accepted
    pub level: LevelFilter,
}

/// Destination of a log stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
    /// Append to a file, creating its directory if needed
    File(PathBuf),
}

impl LogTarget {
    /// `stdout` and `stderr` name the console streams, anything else is a path.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "stdout" | "" => Self::Stdout,
            "stderr" => Self::Stderr,
            path => Self::File(PathBuf::from(path)),
        }
    }
}

impl LogFormat {
    /// `json` selects JSON, anything else plain text.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::String
        }
    }
}

impl LogConfig {
    /// Build from the resolved `log` section.
    ///
    /// # Errors
    /// Returns an error if either level is not a recognised level name
    pub fn from_section(section: &LogSection) -> Result<Self> {
        Ok(Self {
            format: LogFormat::parse(&section.format),
            access: LogSink {
                target: LogTarget::parse(&section.access_log),
                level: parse_log_level(&section.access_level)?,
            },
            error: LogSink {
                target: LogTarget::parse(&section.error_log),
                level: parse_log_level(&section.error_level)?,
            },
        })
    }
}

/// Parse log level string to a filter
pub fn parse_log_level(level: &str) -> Result<LevelFilter> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" | "warning" => Ok(LevelFilter::WARN),
        "error" | "fatal" | "panic" => Ok(LevelFilter::ERROR),
        "off" => Ok(LevelFilter::OFF),
        _ => anyhow::bail!("Invalid log level: {level}"),
    }
}
