//! Subscriber setup for the access and error streams.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::Metadata;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::{Filter, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

use super::config::{LogConfig, LogFormat, LogTarget};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logger implementation using tracing
///
/// Holds the appender guards; dropping the logger flushes pending lines.
pub struct LoggerImpl {
    _guards: Vec<WorkerGuard>,
}

impl LoggerImpl {
    /// Install the global subscriber described by `config`
    ///
    /// # Errors
    /// Returns an error if a log file cannot be opened or a subscriber is
    /// already installed
    pub fn init(config: &LogConfig) -> Result<Self> {
        let (layers, guards) = build_layers(config)?;

        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .context("Failed to install log subscriber")?;

        tracing::info!(
            format = ?config.format,
            access = ?config.access.target,
            error = ?config.error.target,
            "logger initialized"
        );

        Ok(Self { _guards: guards })
    }
}

/// Build the access and error layers without installing them.
///
/// Events at or above the error level go to the error sink only; everything
/// else that passes the access level goes to the access sink.
pub fn build_layers(config: &LogConfig) -> Result<(Vec<BoxedLayer>, Vec<WorkerGuard>)> {
    let access_level = config.access.level;
    let error_level = config.error.level;

    let (access_writer, access_guard) = open_writer(&config.access.target)?;
    let (error_writer, error_guard) = open_writer(&config.error.target)?;

    let access_filter = filter_fn(move |meta: &Metadata<'_>| {
        access_level >= *meta.level() && error_level < *meta.level()
    });
    let error_filter = filter_fn(move |meta: &Metadata<'_>| error_level >= *meta.level());

    let layers = vec![
        fmt_layer(
            config.format,
            access_writer,
            is_console(&config.access.target),
            access_filter,
        ),
        fmt_layer(
            config.format,
            error_writer,
            is_console(&config.error.target),
            error_filter,
        ),
    ];

    Ok((layers, vec![access_guard, error_guard]))
}

fn fmt_layer<F>(format: LogFormat, writer: NonBlocking, ansi: bool, filter: F) -> BoxedLayer
where
    F: Filter<Registry> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
            .with_current_span(true)
            .with_target(true)
            .with_filter(filter)
            .boxed(),
        LogFormat::String => tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(true)
            .with_filter(filter)
            .boxed(),
    }
}

const fn is_console(target: &LogTarget) -> bool {
    matches!(target, LogTarget::Stdout | LogTarget::Stderr)
}

fn open_writer(target: &LogTarget) -> Result<(NonBlocking, WorkerGuard)> {
    Ok(match target {
        LogTarget::Stdout => tracing_appender::non_blocking(io::stdout()),
        LogTarget::Stderr => tracing_appender::non_blocking(io::stderr()),
        LogTarget::File(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("Log path has no file name: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));

            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            tracing_appender::non_blocking(rolling::never(dir, file_name))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::logging::config::LogSink;
    use tempfile::TempDir;
    use tracing::level_filters::LevelFilter;

    fn file_config(dir: &TempDir, format: LogFormat) -> LogConfig {
        LogConfig {
            format,
            access: LogSink {
                target: LogTarget::File(dir.path().join("logs/access_log")),
                level: LevelFilter::INFO,
            },
            error: LogSink {
                target: LogTarget::File(dir.path().join("logs/error_log")),
                level: LevelFilter::ERROR,
            },
        }
    }

    #[test]
    fn test_access_and_error_streams_are_split() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir, LogFormat::String);

        let (layers, guards) = build_layers(&config).unwrap();
        let subscriber = tracing_subscriber::registry().with(layers);
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("too verbose for access");
            tracing::info!("push accepted");
            tracing::error!("push failed");
        });
        drop(guards);

        let access = fs::read_to_string(dir.path().join("logs/access_log")).unwrap();
        let error = fs::read_to_string(dir.path().join("logs/error_log")).unwrap();

        assert!(access.contains("push accepted"));
        assert!(!access.contains("push failed"));
        assert!(!access.contains("too verbose"));
        assert!(error.contains("push failed"));
        assert!(!error.contains("push accepted"));
    }

    #[test]
    fn test_json_format_writes_json_lines() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir, LogFormat::Json);

        let (layers, guards) = build_layers(&config).unwrap();
        let subscriber = tracing_subscriber::registry().with(layers);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(port = "2701", "listener configured");
        });
        drop(guards);

        let access = fs::read_to_string(dir.path().join("logs/access_log")).unwrap();
        let line = access.lines().next().expect("one access line");
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["fields"]["message"], "listener configured");
    }

    #[test]
    fn test_log_path_without_file_name_is_rejected() {
        assert!(open_writer(&LogTarget::File("/".into())).is_err());
    }
}
