//! fincycle-config
//!
//! Engine tunables and their on-disk persistence.
//! Owns the EngineConfig data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{default_manager, ConfigManager};
pub use model::EngineConfig;
