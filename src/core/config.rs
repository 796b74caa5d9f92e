//! Watchdog attributes
//!
//! The native configuration of the `dns` model. Field presence is checked by
//! [`WatchdogConfig::validate`]; cadence and deadline fall back to defaults
//! when left unset or non-positive.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::ConfigError;

/// Probe cadence used when `interval_ms` is not positive
pub const DEFAULT_INTERVAL_MS: u64 = 2000;

/// Probe deadline used when `timeout_ms` is not positive
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Attributes of a DNS watchdog component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchdogConfig {
    /// Resolver to probe, `host` or `host:port`
    #[serde(default)]
    pub server: String,

    /// Name to resolve
    #[serde(default)]
    pub lookup: String,

    /// Dependencies to stop when the resolver is unreachable
    #[serde(default)]
    pub stop: Vec<String>,

    /// Probe cadence in milliseconds
    #[serde(default)]
    pub interval_ms: i64,

    /// Per-probe deadline in milliseconds
    #[serde(default)]
    pub timeout_ms: i64,
}

impl WatchdogConfig {
    pub fn new(server: impl Into<String>, lookup: impl Into<String>, stop: Vec<String>) -> Self {
        Self {
            server: server.into(),
            lookup: lookup.into(),
            stop,
            interval_ms: 0,
            timeout_ms: 0,
        }
    }

    pub fn with_interval_ms(mut self, interval_ms: i64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: i64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Check required fields and return the dependencies that must be bound.
    ///
    /// `path` locates the component in the surrounding configuration and is
    /// only used in error messages.
    pub fn validate(&self, path: &str) -> Result<Vec<String>, ConfigError> {
        if self.server.is_empty() {
            return Err(ConfigError::field_required(path, "server"));
        }

        if self.lookup.is_empty() {
            return Err(ConfigError::field_required(path, "lookup"));
        }

        if self.stop.is_empty() {
            return Err(ConfigError::field_required(path, "stop"));
        }

        Ok(self.stop.clone())
    }

    /// Effective probe cadence
    pub fn interval(&self) -> Duration {
        Duration::from_millis(positive_or(self.interval_ms, DEFAULT_INTERVAL_MS))
    }

    /// Effective probe deadline
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(positive_or(self.timeout_ms, DEFAULT_TIMEOUT_MS))
    }
}

fn positive_or(value: i64, default: u64) -> u64 {
    if value <= 0 {
        default
    } else {
        value as u64
    }
}
