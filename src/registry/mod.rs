//! Model Registry
//!
//! Hosts construct components through an explicit table of model names to
//! factory functions. Each registration validates a component's attributes
//! (reporting the dependencies it needs) and builds it once those
//! dependencies are bound.

mod dns;

pub use dns::{DnsSensor, DNS_MODEL};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::error::Result;
use crate::device::Dependencies;
use crate::watchdog::Readings;

/// Registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("model already registered: {0}")]
    DuplicateModel(String),
}

/// One component as it appears in the application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

impl ResourceConfig {
    pub fn new(name: impl Into<String>, model: impl Into<String>, attributes: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            attributes,
        }
    }
}

/// Read-only sensor surface exposed to the host
#[async_trait]
pub trait Sensor: Send + Sync {
    fn name(&self) -> &str;

    async fn readings(&self, extra: Option<&serde_json::Map<String, serde_json::Value>>) -> Result<Readings>;

    async fn do_command(
        &self,
        command: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Map<String, serde_json::Value>>;

    async fn close(&self) -> Result<()>;
}

/// Returns the names of the dependencies the component needs
pub type Validator = fn(&ResourceConfig) -> Result<Vec<String>>;

pub type Constructor = fn(&ResourceConfig, Dependencies) -> Result<Arc<dyn Sensor>>;

#[derive(Clone, Copy)]
pub struct Registration {
    pub validate: Validator,
    pub construct: Constructor,
}

/// Model name to factory table
#[derive(Default)]
pub struct ModelRegistry {
    models: HashMap<String, Registration>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every model this crate provides
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        dns::register(&mut registry);
        registry
    }

    pub fn register(
        &mut self,
        model: impl Into<String>,
        registration: Registration,
    ) -> std::result::Result<(), RegistryError> {
        let model = model.into();
        if self.models.contains_key(&model) {
            return Err(RegistryError::DuplicateModel(model));
        }
        tracing::debug!(model = %model, "model registered");
        self.models.insert(model, registration);
        Ok(())
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    fn lookup(&self, model: &str) -> std::result::Result<&Registration, RegistryError> {
        self.models
            .get(model)
            .ok_or_else(|| RegistryError::UnknownModel(model.to_string()))
    }

    /// Validate `config` and list the dependencies the host must bind
    pub fn required_dependencies(&self, config: &ResourceConfig) -> Result<Vec<String>> {
        let registration = self.lookup(&config.model)?;
        (registration.validate)(config)
    }

    pub fn construct(&self, config: &ResourceConfig, dependencies: Dependencies) -> Result<Arc<dyn Sensor>> {
        let registration = self.lookup(&config.model)?;
        (registration.validate)(config)?;
        let sensor = (registration.construct)(config, dependencies)?;
        tracing::info!(component = %config.name, model = %config.model, "component constructed");
        Ok(sensor)
    }
}
