//! Core Module
//!
//! Crate-wide error handling and the watchdog's native configuration.

pub mod config;
pub mod error;

pub use config::{WatchdogConfig, DEFAULT_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
pub use error::{ConfigError, NetworkEstopError, Result};
