use fincycle_domain::SettingsError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    /// Whether the error originated in a persistence collaborator.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            CoreError::Storage(_) | CoreError::Serde(_) | CoreError::Io(_)
        )
    }
}

impl From<fincycle_config::ConfigError> for CoreError {
    fn from(err: fincycle_config::ConfigError) -> Self {
        match err {
            fincycle_config::ConfigError::Io(io) => CoreError::Io(io),
            fincycle_config::ConfigError::Serde(message) => CoreError::Serde(message),
            fincycle_config::ConfigError::Invalid(message) => CoreError::Validation(message),
        }
    }
}
