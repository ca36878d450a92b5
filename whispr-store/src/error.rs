//! Store error types.

use thiserror::Error;
use whispr_core::CoreError;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// System keychain failure.
    #[error("Keychain error: {0}")]
    Keychain(#[from] keyring::Error),

    /// Setting value rejected.
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    /// Error from the core crate.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Returns true if the file simply did not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Core(inner) => inner,
            StoreError::Serialization(inner) => CoreError::Serialization(inner),
            other => CoreError::Credential(other.to_string()),
        }
    }
}
