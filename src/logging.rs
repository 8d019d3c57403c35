//! Process Logging
//!
//! JSON-formatted structured logging to stderr and/or a log file. Timestamps
//! are UTC. `RUST_LOG`, when set, takes precedence over the configured level.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration (`[logging]` in the config file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum level: trace, debug, info, warn, error.
    #[serde(default = "default_level")]
    pub level: String,
    /// Write log lines to stderr.
    #[serde(default)]
    pub stream: bool,
    /// Append log lines to this file.
    #[serde(default)]
    pub logfile: Option<PathBuf>,
}

fn default_level() -> String {
    "error".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            stream: false,
            logfile: None,
        }
    }
}

/// Keeps the file writer alive. Dropping it flushes pending lines.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Maps level names from other logging stacks onto tracing's.
fn normalise_level(level: &str) -> String {
    match level.trim().to_ascii_lowercase().as_str() {
        "critical" | "fatal" => "error".to_string(),
        "warning" => "warn".to_string(),
        other => other.to_string(),
    }
}

fn split_log_path(path: &Path) -> Result<(PathBuf, String)> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid log file path: {:?}", path))?
        .to_string();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, file_name))
}

/// Installs the global subscriber. Call once, at startup.
pub fn init_logging(config: &LogConfig) -> Result<LoggingGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(normalise_level(&config.level)))
        .with_context(|| format!("Invalid log level: {}", config.level))?;

    let stream_layer = config
        .stream
        .then(|| fmt::layer().json().with_writer(std::io::stderr));

    let (file_layer, file_guard) = match &config.logfile {
        Some(path) => {
            let (dir, file_name) = split_log_path(path)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(file_name)
                .build(&dir)
                .with_context(|| format!("Failed to open log file: {:?}", path))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stream_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install global tracing subscriber")?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
