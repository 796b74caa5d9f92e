//! Health snapshot
//!
//! The last-known outcome of the polling loop. Writers replace it in one
//! short critical section per cycle; readers receive a copy.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::probe::ProbeError;

/// Generic string-keyed readings map
pub type Readings = serde_json::Map<String, Value>;

pub const READING_LAST_ATTEMPT: &str = "last_attempt";
pub const READING_LAST_SUCCESS: &str = "last_success";
pub const READING_LAST_SUCCESS_LATENCY_MS: &str = "last_success_latency_ms";
pub const READING_LAST_ERROR: &str = "last_error";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthSnapshot {
    /// Start of the most recent probe
    pub last_attempt: Option<DateTime<Utc>>,
    /// Start of the most recent successful probe
    pub last_success: Option<DateTime<Utc>>,
    /// Duration of the most recent successful probe
    pub last_success_latency: Duration,
    /// Cause of the most recent failure, cleared by a success
    pub last_error: Option<ProbeError>,
}

impl HealthSnapshot {
    pub(crate) fn record_success(&mut self, started: DateTime<Utc>, latency: Duration) {
        self.last_attempt = Some(started);
        self.last_success = Some(started);
        self.last_success_latency = latency;
        self.last_error = None;
    }

    /// Keeps the previous success fields.
    pub(crate) fn record_failure(&mut self, started: DateTime<Utc>, error: ProbeError) {
        self.last_attempt = Some(started);
        self.last_error = Some(error);
    }

    /// True once a probe has run and the latest one succeeded
    pub fn is_healthy(&self) -> bool {
        self.last_attempt.is_some() && self.last_error.is_none()
    }

    /// Latency of the last success in fractional milliseconds
    pub fn last_success_latency_ms(&self) -> f64 {
        self.last_success_latency.as_nanos() as f64 / 1_000_000.0
    }

    pub fn to_readings(&self) -> Readings {
        let mut readings = Readings::new();
        readings.insert(
            READING_LAST_ATTEMPT.to_string(),
            timestamp(self.last_attempt),
        );
        readings.insert(
            READING_LAST_SUCCESS.to_string(),
            timestamp(self.last_success),
        );
        readings.insert(
            READING_LAST_SUCCESS_LATENCY_MS.to_string(),
            json!(self.last_success_latency_ms()),
        );
        readings.insert(
            READING_LAST_ERROR.to_string(),
            self.last_error
                .as_ref()
                .map_or(Value::Null, |e| Value::String(e.to_string())),
        );
        readings
    }
}

fn timestamp(value: Option<DateTime<Utc>>) -> Value {
    value.map_or(Value::Null, |t| Value::String(t.to_rfc3339()))
}
