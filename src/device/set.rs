//! Classified dependencies and the stop sweep

use std::fmt;
use std::sync::Arc;

use super::{Actuator, Dependencies, Dependency, DependencyError, NavigationMode, NavigationService};

/// Outcome of one stop sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub attempted: usize,
    pub failed: usize,
}

impl SweepReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Dependencies sorted by capability, each group in registration order
#[derive(Default)]
pub struct DependencySet {
    actuators: Vec<(String, Arc<dyn Actuator>)>,
    navigators: Vec<(String, Arc<dyn NavigationService>)>,
}

impl fmt::Debug for DependencySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencySet")
            .field("actuators", &names_of(&self.actuators))
            .field("navigators", &names_of(&self.navigators))
            .finish()
    }
}

fn names_of<T>(entries: &[(String, T)]) -> Vec<&str> {
    entries.iter().map(|(name, _)| name.as_str()).collect()
}

impl DependencySet {
    /// Classify injected dependencies and check every stop target is bound.
    pub fn resolve(stop_targets: &[String], dependencies: Dependencies) -> Result<Self, DependencyError> {
        if let Some(name) = stop_targets.iter().find(|name| !dependencies.contains(name)) {
            return Err(DependencyError::Missing { name: name.clone() });
        }

        let mut set = Self::default();
        for (name, dependency) in dependencies {
            match dependency {
                Dependency::Actuator(actuator) => set.actuators.push((name, actuator)),
                Dependency::Navigation(service) => set.navigators.push((name, service)),
                Dependency::Unsupported { api } => {
                    return Err(DependencyError::Unsupported { name, api });
                }
            }
        }

        Ok(set)
    }

    pub fn actuator_count(&self) -> usize {
        self.actuators.len()
    }

    pub fn navigation_count(&self) -> usize {
        self.navigators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actuators.is_empty() && self.navigators.is_empty()
    }

    /// Stop every actuator, then put every navigation service in manual mode.
    ///
    /// Calls run one after another; a failing device is logged and skipped.
    pub async fn stop_all(&self) -> SweepReport {
        let mut report = SweepReport::default();

        for (name, actuator) in &self.actuators {
            report.attempted += 1;
            if let Err(e) = actuator.stop(None).await {
                report.failed += 1;
                tracing::warn!(device = %name, error = %e, "cannot stop actuator");
            }
        }

        for (name, service) in &self.navigators {
            report.attempted += 1;
            if let Err(e) = service.set_mode(NavigationMode::Manual, None).await {
                report.failed += 1;
                tracing::warn!(
                    device = %name,
                    mode = %NavigationMode::Manual,
                    error = %e,
                    "cannot stop nav service"
                );
            }
        }

        report
    }
}
