//! Device Capability Module
//!
//! The watchdog never owns the devices it protects. Hosts hand it a set of
//! named [`Dependency`] values; each is classified once into an actuator or a
//! navigation service, and the resulting [`DependencySet`] drives the stop
//! sweep after a failed probe.

mod error;
mod set;

pub use error::DependencyError;
pub use set::{DependencySet, SweepReport};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Free-form parameters forwarded to device calls
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// Something that moves and can be halted
#[async_trait]
pub trait Actuator: Send + Sync {
    async fn stop(&self, extra: Option<&Extra>) -> anyhow::Result<()>;
}

/// Navigation mode requested by the stop sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// Autonomous motion disabled
    Manual,
}

impl fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationMode::Manual => write!(f, "manual"),
        }
    }
}

/// Autonomous navigation that can be handed back to manual control
#[async_trait]
pub trait NavigationService: Send + Sync {
    async fn set_mode(&self, mode: NavigationMode, extra: Option<&Extra>) -> anyhow::Result<()>;
}

/// A dependency as injected by the host
#[derive(Clone)]
pub enum Dependency {
    Actuator(Arc<dyn Actuator>),
    Navigation(Arc<dyn NavigationService>),
    /// Any other resource; carries its API name for error reporting
    Unsupported { api: String },
}

impl Dependency {
    pub fn actuator(actuator: impl Actuator + 'static) -> Self {
        Dependency::Actuator(Arc::new(actuator))
    }

    pub fn navigation(service: impl NavigationService + 'static) -> Self {
        Dependency::Navigation(Arc::new(service))
    }

    pub fn unsupported(api: impl Into<String>) -> Self {
        Dependency::Unsupported { api: api.into() }
    }

    pub fn kind(&self) -> &str {
        match self {
            Dependency::Actuator(_) => "actuator",
            Dependency::Navigation(_) => "navigation",
            Dependency::Unsupported { api } => api,
        }
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dependency({})", self.kind())
    }
}

/// Named dependencies in registration order
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
    entries: Vec<(String, Dependency)>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing an earlier binding in place
    pub fn insert(&mut self, name: impl Into<String>, dependency: Dependency) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = dependency,
            None => self.entries.push((name, dependency)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, dependency: Dependency) -> Self {
        self.insert(name, dependency);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Dependency)> {
        self.entries.iter().map(|(name, dep)| (name.as_str(), dep))
    }
}

impl IntoIterator for Dependencies {
    type Item = (String, Dependency);
    type IntoIter = std::vec::IntoIter<(String, Dependency)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
