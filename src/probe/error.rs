//! Probe error types

use thiserror::Error;

/// Probe failure causes
///
/// Causes are kept as strings so a failure can be copied into the health
/// snapshot and compared in tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("no lookup address")]
    MissingLookup,

    #[error("invalid lookup name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("cannot resolve server {server}: {reason}")]
    Resolve { server: String, reason: String },

    #[error("query encoding failed: {reason}")]
    Encode { reason: String },

    #[error("network error: {reason}")]
    Io { reason: String },

    #[error("no reply within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("malformed reply: {reason}")]
    Malformed { reason: String },

    #[error("reply id {actual} does not match query id {expected}")]
    IdMismatch { expected: u16, actual: u16 },
}

impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        ProbeError::Io {
            reason: err.to_string(),
        }
    }
}
