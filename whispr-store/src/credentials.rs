//! Credential stores.
//!
//! Three [`CredentialStore`] implementations:
//! - [`KeychainCredentialStore`]: the system keychain (macOS Keychain,
//!   Windows Credential Manager, Secret Service on Linux)
//! - [`EnvCredentialStore`]: read-only, one environment variable per provider
//! - [`MemoryCredentialStore`]: process-local, for tests and one-off keys
//!
//! [`resolve_credential`] consults stores in order and returns the first hit.

use keyring::Entry;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, warn};
use whispr_core::{ApiKey, CoreError, CredentialStore, ProviderKind};

use crate::error::StoreError;

/// Service name prefix for keychain entries.
const SERVICE_PREFIX: &str = "Whispr";

/// Account name used for every keychain entry.
const ACCOUNT: &str = "api_key";

/// Returns the keychain service name for a provider, e.g. `Whispr-groq`.
pub fn keychain_service(kind: ProviderKind) -> String {
    format!("{SERVICE_PREFIX}-{}", kind.id())
}

// ============================================================================
// Keychain
// ============================================================================

/// Stores keys in the system keychain.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeychainCredentialStore;

impl KeychainCredentialStore {
    /// Creates a keychain store.
    pub fn new() -> Self {
        Self
    }

    fn entry(kind: ProviderKind) -> Result<Entry, StoreError> {
        Ok(Entry::new(&keychain_service(kind), ACCOUNT)?)
    }
}

impl CredentialStore for KeychainCredentialStore {
    fn get_credential(&self, provider: ProviderKind) -> Result<Option<ApiKey>, CoreError> {
        let entry = Self::entry(provider)?;
        match entry.get_password() {
            Ok(secret) => {
                let key = ApiKey::new(secret);
                if key.is_empty() {
                    return Ok(None);
                }
                debug!(provider = %provider, "API key retrieved from keychain");
                Ok(Some(key))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StoreError::from(e).into()),
        }
    }

    fn set_credential(&self, provider: ProviderKind, value: &ApiKey) -> Result<(), CoreError> {
        if value.is_empty() {
            return Err(CoreError::Credential("refusing to store an empty key".into()));
        }
        Self::entry(provider)?
            .set_password(value.expose())
            .map_err(StoreError::from)?;
        debug!(provider = %provider, "API key stored in keychain");
        Ok(())
    }

    fn delete_credential(&self, provider: ProviderKind) -> Result<(), CoreError> {
        match Self::entry(provider)?.delete_credential() {
            Ok(()) => {
                debug!(provider = %provider, "API key deleted from keychain");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StoreError::from(e).into()),
        }
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Reads keys from environment variables.
///
/// Variable names come from each provider's `credential_env_var`.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialStore {
    vars: HashMap<ProviderKind, String>,
    snapshot: Option<HashMap<String, String>>,
}

impl EnvCredentialStore {
    /// Maps each provider to the variable holding its key.
    pub fn new<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = (ProviderKind, S)>,
        S: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k, v.into())).collect(),
            snapshot: None,
        }
    }

    /// Reads from `values` instead of the process environment.
    #[must_use]
    pub fn with_values<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.snapshot = Some(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Returns the variable name for a provider.
    pub fn var_name(&self, provider: ProviderKind) -> Option<&str> {
        self.vars.get(&provider).map(String::as_str)
    }

    fn lookup(&self, name: &str) -> Option<String> {
        match &self.snapshot {
            Some(values) => values.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }
}

impl CredentialStore for EnvCredentialStore {
    fn get_credential(&self, provider: ProviderKind) -> Result<Option<ApiKey>, CoreError> {
        let Some(name) = self.var_name(provider) else {
            return Ok(None);
        };
        let key = self.lookup(name).map(ApiKey::new).filter(|k| !k.is_empty());
        if key.is_some() {
            debug!(provider = %provider, var = name, "API key found in environment");
        }
        Ok(key)
    }

    fn set_credential(&self, provider: ProviderKind, _value: &ApiKey) -> Result<(), CoreError> {
        Err(CoreError::Credential(format!(
            "environment credentials are read-only; export {} instead",
            self.var_name(provider).unwrap_or("the provider's variable")
        )))
    }

    fn delete_credential(&self, provider: ProviderKind) -> Result<(), CoreError> {
        Err(CoreError::Credential(format!(
            "environment credentials are read-only; unset {} instead",
            self.var_name(provider).unwrap_or("the provider's variable")
        )))
    }
}

// ============================================================================
// Memory
// ============================================================================

/// Keeps keys in process memory.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    keys: RwLock<HashMap<ProviderKind, ApiKey>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> CoreError {
        CoreError::Credential("credential store lock poisoned".into())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get_credential(&self, provider: ProviderKind) -> Result<Option<ApiKey>, CoreError> {
        let keys = self.keys.read().map_err(|_| Self::poisoned())?;
        Ok(keys.get(&provider).cloned())
    }

    fn set_credential(&self, provider: ProviderKind, value: &ApiKey) -> Result<(), CoreError> {
        if value.is_empty() {
            return Err(CoreError::Credential("refusing to store an empty key".into()));
        }
        let mut keys = self.keys.write().map_err(|_| Self::poisoned())?;
        keys.insert(provider, value.clone());
        Ok(())
    }

    fn delete_credential(&self, provider: ProviderKind) -> Result<(), CoreError> {
        let mut keys = self.keys.write().map_err(|_| Self::poisoned())?;
        keys.remove(&provider);
        Ok(())
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Returns the first credential found in `stores`, in order.
///
/// A store that fails (e.g. no keychain daemon) is logged and skipped.
pub fn resolve_credential(
    provider: ProviderKind,
    stores: &[&dyn CredentialStore],
) -> Option<ApiKey> {
    for store in stores {
        match store.get_credential(provider) {
            Ok(Some(key)) => return Some(key),
            Ok(None) => {}
            Err(e) => warn!(provider = %provider, error = %e, "Credential lookup failed"),
        }
    }
    debug!(provider = %provider, "No credential configured");
    None
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl CredentialStore for BrokenStore {
        fn get_credential(&self, _: ProviderKind) -> Result<Option<ApiKey>, CoreError> {
            Err(CoreError::Credential("no keychain".into()))
        }
        fn set_credential(&self, _: ProviderKind, _: &ApiKey) -> Result<(), CoreError> {
            Ok(())
        }
        fn delete_credential(&self, _: ProviderKind) -> Result<(), CoreError> {
            Ok(())
        }
    }

    fn env_store() -> EnvCredentialStore {
        EnvCredentialStore::new([
            (ProviderKind::Groq, "GROQ_API_KEY"),
            (ProviderKind::OpenAI, "OPENAI_API_KEY"),
        ])
        .with_values([("GROQ_API_KEY", " gsk-env "), ("OPENAI_API_KEY", "")])
    }

    #[test]
    fn test_service_name_format() {
        assert_eq!(keychain_service(ProviderKind::Groq), "Whispr-groq");
        assert_eq!(keychain_service(ProviderKind::OpenRouter), "Whispr-openrouter");
    }

    #[test]
    fn test_env_store_reads_and_trims() {
        let store = env_store();
        let key = store.get_credential(ProviderKind::Groq).unwrap().unwrap();
        assert_eq!(key.expose(), "gsk-env");

        // Empty values count as missing
        assert!(store.get_credential(ProviderKind::OpenAI).unwrap().is_none());
        // Unmapped provider
        assert!(store.get_credential(ProviderKind::Gemini).unwrap().is_none());
    }

    #[test]
    fn test_env_store_is_read_only() {
        let store = env_store();
        let err = store
            .set_credential(ProviderKind::Groq, &ApiKey::new("x"))
            .unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY"));
        assert!(store.delete_credential(ProviderKind::Groq).is_err());
    }

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemoryCredentialStore::new();
        assert!(!store.has_credential(ProviderKind::Anthropic));

        store
            .set_credential(ProviderKind::Anthropic, &ApiKey::new("sk-ant"))
            .unwrap();
        assert!(store.has_credential(ProviderKind::Anthropic));

        store.delete_credential(ProviderKind::Anthropic).unwrap();
        store.delete_credential(ProviderKind::Anthropic).unwrap();
        assert!(!store.has_credential(ProviderKind::Anthropic));

        assert!(
            store
                .set_credential(ProviderKind::Anthropic, &ApiKey::new("  "))
                .is_err()
        );
    }

    #[test]
    fn test_resolve_prefers_earlier_store() {
        let env = env_store();
        let memory = MemoryCredentialStore::new();
        memory
            .set_credential(ProviderKind::Groq, &ApiKey::new("gsk-mem"))
            .unwrap();
        memory
            .set_credential(ProviderKind::Gemini, &ApiKey::new("AIza-mem"))
            .unwrap();

        let stores: [&dyn CredentialStore; 2] = [&env, &memory];
        let groq = resolve_credential(ProviderKind::Groq, &stores).unwrap();
        assert_eq!(groq.expose(), "gsk-env");

        let gemini = resolve_credential(ProviderKind::Gemini, &stores).unwrap();
        assert_eq!(gemini.expose(), "AIza-mem");

        assert!(resolve_credential(ProviderKind::OpenRouter, &stores).is_none());
    }

    #[test]
    fn test_resolve_skips_failing_store() {
        let memory = MemoryCredentialStore::new();
        memory
            .set_credential(ProviderKind::OpenAI, &ApiKey::new("sk-mem"))
            .unwrap();

        let stores: [&dyn CredentialStore; 2] = [&BrokenStore, &memory];
        let key = resolve_credential(ProviderKind::OpenAI, &stores).unwrap();
        assert_eq!(key.expose(), "sk-mem");
    }
}
