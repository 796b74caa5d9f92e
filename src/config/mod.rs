//! Configuration File Module
//!
//! Loads the JSON application configuration: the components to build and
//! how to log. Attribute validation of each component belongs to its model.

mod storage;

pub use storage::{AppConfig, ConfigFileError, ConfigFileResult};
