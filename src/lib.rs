//! network-estop - DNS reachability watchdog
//!
//! Periodically resolves a name against a DNS server. When the resolver
//! cannot be reached, every dependent actuator is stopped and every
//! navigation service is switched to manual mode.
//!
//! - `probe`: a single bounded DNS query
//! - `watchdog`: the polling loop, health snapshot and stop sweep
//! - `device`: capabilities of the devices being protected
//! - `registry`: factory table hosts use to build components

pub mod config;
pub mod core;
pub mod device;
pub mod logging;
pub mod probe;
pub mod registry;
pub mod watchdog;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use crate::core::config::WatchdogConfig;
pub use crate::core::error::{ConfigError, NetworkEstopError, Result};
pub use config::AppConfig;
pub use device::{Actuator, Dependencies, Dependency, NavigationMode, NavigationService};
pub use probe::{DnsProbe, ProbeError};
pub use registry::{ModelRegistry, ResourceConfig, Sensor, DNS_MODEL};
pub use watchdog::{DnsWatchdog, HealthSnapshot, Readings};
