//! Trait definitions for `Whispr`.
//!
//! The core consumes credentials through [`CredentialStore`] and never
//! decides where they live. Implementations are provided by `whispr-store`.

use crate::error::CoreError;
use crate::models::{ApiKey, ProviderKind};

/// Storage for per-provider API keys.
///
/// Implementors are responsible for:
/// - Returning `Ok(None)` when nothing is configured (not an error)
/// - Never returning an empty key as `Some`
/// - Keeping secrets out of logs
pub trait CredentialStore: Send + Sync {
    /// Returns the stored credential for a provider, if any.
    fn get_credential(&self, provider: ProviderKind) -> Result<Option<ApiKey>, CoreError>;

    /// Stores a credential for a provider, replacing any previous value.
    fn set_credential(&self, provider: ProviderKind, value: &ApiKey) -> Result<(), CoreError>;

    /// Removes the credential for a provider. Missing entries are not an error.
    fn delete_credential(&self, provider: ProviderKind) -> Result<(), CoreError>;

    /// Returns true if a non-empty credential is available.
    fn has_credential(&self, provider: ProviderKind) -> bool {
        matches!(self.get_credential(provider), Ok(Some(_)))
    }
}
