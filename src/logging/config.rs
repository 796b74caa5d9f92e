//! Logging section of the application configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Verbosity, ordered from most to least chatty
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// Line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    File,
    Both,
}

impl LogOutput {
    pub fn to_console(self) -> bool {
        matches!(self, LogOutput::Console | LogOutput::Both)
    }

    pub fn to_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::Both)
    }
}

/// When the log file rolls over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Daily,
    Hourly,
    Never,
}

/// `logging` section of the configuration file; every key is optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Log file directory, platform data dir when unset
    pub directory: Option<PathBuf>,
    /// Per-target overrides, e.g. `"network_estop::probe": "trace"`
    pub modules: BTreeMap<String, LogLevel>,
    pub rotation: LogRotation,
    /// Print the emitting module
    pub show_target: bool,
    /// Print file and line
    pub show_source: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Text,
            output: LogOutput::Console,
            directory: None,
            modules: BTreeMap::new(),
            rotation: LogRotation::Daily,
            show_target: true,
            show_source: false,
        }
    }
}

impl LoggingConfig {
    /// Raise verbosity to at least debug and print source locations.
    /// A global level already at trace is kept.
    pub fn verbose(mut self) -> Self {
        self.level = self.level.min(LogLevel::Debug);
        self.show_source = true;
        self
    }

    /// Effective log file directory
    pub fn directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(default_log_directory)
    }

    /// `EnvFilter` directive string: global level, then module overrides
    pub fn directives(&self) -> String {
        let mut directives = vec![self.level.to_string()];
        directives.extend(
            self.modules
                .iter()
                .map(|(module, level)| format!("{}={}", module, level)),
        );
        directives.join(",")
    }
}

/// Platform log directory, e.g. `~/.local/share/network-estop/logs`
pub fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("network-estop").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
