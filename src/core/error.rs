//! Error types for network-estop
//!
//! Each subsystem owns its error enum; this module aggregates them for
//! callers that only need a single error type.

use thiserror::Error;

use crate::config::ConfigFileError;
use crate::device::DependencyError;
use crate::logging::LoggingError;
use crate::probe::ProbeError;
use crate::registry::RegistryError;

/// Result type alias for network-estop operations
pub type Result<T> = std::result::Result<T, NetworkEstopError>;

/// Main error type for network-estop
#[derive(Error, Debug)]
pub enum NetworkEstopError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ConfigFileError),

    #[error("Dependency error: {0}")]
    Dependency(#[from] DependencyError),

    #[error("Probe failed: {0}")]
    Probe(#[from] ProbeError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Runtime unavailable: {0}")]
    Runtime(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetworkEstopError {
    /// Whether the error prevents a component from being created.
    ///
    /// Probe failures are recovered inside the polling loop and never
    /// abort the process; everything else surfaces at construction time.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, NetworkEstopError::Probe(_))
    }
}

/// Watchdog attribute validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{path}: \"{field}\" is required")]
    FieldRequired { path: String, field: &'static str },

    #[error("{path}: invalid attributes: {reason}")]
    InvalidAttributes { path: String, reason: String },
}

impl ConfigError {
    pub fn field_required(path: &str, field: &'static str) -> Self {
        ConfigError::FieldRequired {
            path: path.to_string(),
            field,
        }
    }

    /// Name of the offending field, if the error is about one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::FieldRequired { field, .. } => Some(field),
            ConfigError::InvalidAttributes { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_required_message() {
        let err = ConfigError::field_required("components.0", "lookup");
        assert_eq!(err.to_string(), "components.0: \"lookup\" is required");
        assert_eq!(err.field(), Some("lookup"));
    }

    #[test]
    fn test_probe_errors_are_not_fatal() {
        let err = NetworkEstopError::from(ProbeError::MissingLookup);
        assert!(!err.is_fatal());

        let err = NetworkEstopError::from(ConfigError::field_required("x", "server"));
        assert!(err.is_fatal());
    }
}
