//! Watchdog Module
//!
//! Periodic DNS reachability monitoring. When the configured resolver stops
//! answering, every bound actuator is stopped and every navigation service is
//! switched to manual mode.

pub mod snapshot;
pub mod supervisor;


pub use snapshot::{
    HealthSnapshot, Readings, READING_LAST_ATTEMPT, READING_LAST_ERROR, READING_LAST_SUCCESS,
    READING_LAST_SUCCESS_LATENCY_MS,
};
pub use supervisor::{CycleOutcome, DnsWatchdog, WatchdogState};
