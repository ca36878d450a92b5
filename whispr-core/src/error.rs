//! Core error types for `Whispr`.

use thiserror::Error;

/// Core error type for `Whispr` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Provider not found in the registry.
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Credential storage failed.
    #[error("Credential error: {0}")]
    Credential(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
