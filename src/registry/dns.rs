//! The `dns` model

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{ModelRegistry, Registration, ResourceConfig, Sensor};
use crate::core::config::WatchdogConfig;
use crate::core::error::{ConfigError, NetworkEstopError, Result};
use crate::device::Dependencies;
use crate::watchdog::{DnsWatchdog, Readings};

/// Fully qualified model name (namespace:family:model)
pub const DNS_MODEL: &str = "erh:networkestop:dns";

pub(super) fn register(registry: &mut ModelRegistry) {
    let registration = Registration { validate, construct };
    if let Err(e) = registry.register(DNS_MODEL, registration) {
        tracing::warn!(error = %e, "dns model not registered");
    }
}

fn attributes(config: &ResourceConfig) -> Result<WatchdogConfig> {
    let attributes = if config.attributes.is_null() {
        Value::Object(Map::new())
    } else {
        config.attributes.clone()
    };

    serde_json::from_value(attributes).map_err(|e| {
        NetworkEstopError::from(ConfigError::InvalidAttributes {
            path: config.name.clone(),
            reason: e.to_string(),
        })
    })
}

fn validate(config: &ResourceConfig) -> Result<Vec<String>> {
    Ok(attributes(config)?.validate(&config.name)?)
}

fn construct(config: &ResourceConfig, dependencies: Dependencies) -> Result<Arc<dyn Sensor>> {
    let watchdog = DnsWatchdog::new(config.name.clone(), attributes(config)?, dependencies)?;
    Ok(Arc::new(DnsSensor { watchdog }))
}

/// Sensor view of a [`DnsWatchdog`]
pub struct DnsSensor {
    watchdog: DnsWatchdog,
}

impl DnsSensor {
    pub fn watchdog(&self) -> &DnsWatchdog {
        &self.watchdog
    }
}

#[async_trait]
impl Sensor for DnsSensor {
    fn name(&self) -> &str {
        self.watchdog.name()
    }

    async fn readings(&self, _extra: Option<&Map<String, Value>>) -> Result<Readings> {
        Ok(self.watchdog.readings())
    }

    async fn do_command(&self, _command: &Map<String, Value>) -> Result<Map<String, Value>> {
        Ok(Map::new())
    }

    async fn close(&self) -> Result<()> {
        self.watchdog.close();
        Ok(())
    }
}
