//! Dependency binding errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("{name} is not an actuator or nav service (api: {api})")]
    Unsupported { name: String, api: String },

    #[error("stop target {name} was not provided")]
    Missing { name: String },
}
