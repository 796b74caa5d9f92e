//! Logging System
//!
//! Installs the global `tracing` subscriber from the `logging` section of
//! the configuration file: console and/or rolling file output, text or JSON,
//! filtered by a global level plus per-module overrides.

mod config;


pub use config::{default_log_directory, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig};

use std::path::PathBuf;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Log file name prefix
pub const LOG_FILE_NAME: &str = "network-estop.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter {directives:?}: {reason}")]
    Filter { directives: String, reason: String },

    #[error("cannot create log directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("a global subscriber is already installed: {0}")]
    AlreadyInstalled(String),
}

pub type LoggingResult<T> = Result<T, LoggingError>;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installed subscriber; dropping it flushes and stops the file writer
pub struct LoggingSystem {
    directory: Option<PathBuf>,
    _guard: Option<WorkerGuard>,
}

impl LoggingSystem {
    pub fn init(config: &LoggingConfig) -> LoggingResult<Self> {
        let filter = env_filter(config)?;

        let mut layers: Vec<BoxedLayer> = Vec::new();
        if config.output.to_console() {
            layers.push(console_layer(config));
        }

        let mut guard = None;
        let mut directory = None;
        if config.output.to_file() {
            let (layer, file_guard) = file_layer(config)?;
            layers.push(layer);
            guard = Some(file_guard);
            directory = Some(config.directory());
        }

        tracing_subscriber::registry()
            .with(layers.with_filter(filter))
            .try_init()
            .map_err(|e| LoggingError::AlreadyInstalled(e.to_string()))?;

        Ok(Self {
            directory,
            _guard: guard,
        })
    }

    /// Directory receiving log files, if file output is enabled
    pub fn directory(&self) -> Option<&PathBuf> {
        self.directory.as_ref()
    }
}

fn env_filter(config: &LoggingConfig) -> LoggingResult<EnvFilter> {
    let directives = config.directives();
    EnvFilter::try_new(&directives).map_err(|e| LoggingError::Filter {
        reason: e.to_string(),
        directives,
    })
}

fn console_layer(config: &LoggingConfig) -> BoxedLayer {
    let layer = fmt::layer()
        .with_target(config.show_target)
        .with_file(config.show_source)
        .with_line_number(config.show_source);

    match config.format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Text => layer.boxed(),
    }
}

fn file_layer(config: &LoggingConfig) -> LoggingResult<(BoxedLayer, WorkerGuard)> {
    let path = config.directory();
    std::fs::create_dir_all(&path).map_err(|source| LoggingError::Directory {
        path: path.clone(),
        source,
    })?;

    let rotation = match config.rotation {
        LogRotation::Daily => Rotation::DAILY,
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Never => Rotation::NEVER,
    };
    let appender = RollingFileAppender::new(rotation, &path, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(config.show_target)
        .with_file(config.show_source)
        .with_line_number(config.show_source);

    let layer = match config.format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Text => layer.boxed(),
    };
    Ok((layer, guard))
}
