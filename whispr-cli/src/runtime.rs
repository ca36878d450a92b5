//! Wiring shared by commands: settings, credentials, and session setup.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use whispr_core::{
    ApiKey, Attachment, CredentialStore, ProviderConfig, ProviderKind, mime_type_for_path,
};
use whispr_fetch::{ChatAdapter, ChatError, HttpClient, RetryPolicy};
use whispr_providers::{ChatSession, ProviderRegistry, factory};
use whispr_store::{EnvCredentialStore, KeychainCredentialStore, Settings, resolve_credential};

use crate::commands::config::validate_model;

/// Looks up a registered provider by id.
pub fn provider_config(id: &str) -> Result<&'static ProviderConfig, ChatError> {
    ProviderRegistry::get_by_id(id).ok_or_else(|| ChatError::UnknownProvider(id.trim().to_string()))
}

/// Environment store covering every registered provider.
pub fn env_store() -> EnvCredentialStore {
    EnvCredentialStore::new(
        ProviderRegistry::all()
            .iter()
            .map(|c| (c.id, c.credential_env_var.clone())),
    )
}

/// Where a provider's key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Environment variable.
    Environment,
    /// System keychain.
    Keychain,
    /// Not configured.
    Missing,
}

impl CredentialSource {
    /// Short label for output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Environment => "env",
            Self::Keychain => "keychain",
            Self::Missing => "missing",
        }
    }
}

/// Reports where a key for `kind` would come from.
pub fn credential_source(kind: ProviderKind) -> CredentialSource {
    if env_store().has_credential(kind) {
        CredentialSource::Environment
    } else if KeychainCredentialStore::new().has_credential(kind) {
        CredentialSource::Keychain
    } else {
        CredentialSource::Missing
    }
}

/// Resolves a key from the environment, then the keychain.
pub fn credential_for(config: &ProviderConfig) -> Result<ApiKey, ChatError> {
    let env = env_store();
    let keychain = KeychainCredentialStore::new();
    resolve_credential(config.id, &[&env, &keychain])
        .ok_or_else(|| ChatError::MissingCredential(config.id.to_string()))
}

/// Hint shown when no key is configured.
pub fn missing_key_hint(config: &ProviderConfig) -> String {
    let mut hint = format!(
        "Set {} or run `whispr key set {}`",
        config.credential_env_var, config.id
    );
    if let Some(url) = &config.api_key_url {
        let _ = write!(hint, " (get a key at {url})");
    }
    hint
}

/// Retry policy derived from settings.
pub fn retry_policy(settings: &Settings) -> RetryPolicy {
    RetryPolicy::new(settings.max_retries).with_model_fallback(settings.model_fallback)
}

/// HTTP client with the configured timeout.
pub fn http_client(settings: &Settings) -> Result<HttpClient, ChatError> {
    HttpClient::with_timeout(Duration::from_secs(settings.request_timeout_secs))
}

/// Selects `model` on the adapter, failing if it is not supported.
pub fn apply_model(adapter: &mut dyn ChatAdapter, model: &str) -> Result<()> {
    validate_model(adapter.config(), model)?;
    adapter.set_model(model);
    Ok(())
}

/// Options that override settings when building an adapter.
#[derive(Debug, Default, Clone)]
pub struct AdapterOverrides<'a> {
    /// Provider id.
    pub provider: Option<&'a str>,
    /// Model name.
    pub model: Option<&'a str>,
    /// Custom system prompt.
    pub system_prompt: Option<&'a str>,
}

/// Builds a ready adapter from settings plus overrides.
pub fn build_adapter(
    settings: &Settings,
    overrides: &AdapterOverrides<'_>,
) -> Result<Box<dyn ChatAdapter>> {
    let config = match overrides.provider {
        Some(id) => provider_config(id)?,
        None => provider_config(settings.active_provider.id())?,
    };

    let key = credential_for(config).with_context(|| missing_key_hint(config))?;
    let mut adapter = factory::create_with_client(config.id.id(), key, http_client(settings)?)?;

    if let Some(model) = overrides.model.or(settings.model_for(config.id)) {
        apply_model(adapter.as_mut(), model)?;
    }

    let prompt = overrides
        .system_prompt
        .or(settings.custom_system_prompt_for(config.id))
        .map(str::to_string);
    adapter.set_custom_system_prompt(prompt);

    info!(provider = %adapter.kind(), model = %adapter.model(), "Adapter ready");
    Ok(adapter)
}

/// Builds a chat session from settings plus overrides.
pub fn build_session(settings: &Settings, overrides: &AdapterOverrides<'_>) -> Result<ChatSession> {
    let adapter = build_adapter(settings, overrides)?;
    Ok(ChatSession::with_policy(adapter, retry_policy(settings)))
}

/// Reads a file into an attachment.
pub async fn load_attachment(path: &Path) -> Result<Attachment> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let mime = mime_type_for_path(path);

    debug!(file = %name, mime = %mime, bytes = bytes.len(), "Loaded attachment");
    Ok(Attachment::from_bytes(name, mime, &bytes))
}

/// Reads several files, in order.
pub async fn load_attachments(paths: &[impl AsRef<Path>]) -> Result<Vec<Attachment>> {
    let mut attachments = Vec::with_capacity(paths.len());
    for path in paths {
        attachments.push(load_attachment(path.as_ref()).await?);
    }
    Ok(attachments)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider() {
        let err = provider_config("mistral").unwrap_err();
        assert!(matches!(err, ChatError::UnknownProvider(id) if id == "mistral"));
        assert!(provider_config("Groq").is_ok());
    }

    #[test]
    fn test_env_store_covers_registry() {
        let store = env_store();
        assert_eq!(store.var_name(ProviderKind::Groq), Some("GROQ_API_KEY"));
        assert_eq!(store.var_name(ProviderKind::Gemini), Some("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_missing_key_hint() {
        let config = provider_config("anthropic").unwrap();
        let hint = missing_key_hint(config);
        assert!(hint.contains("ANTHROPIC_API_KEY"));
        assert!(hint.contains("whispr key set anthropic"));
    }

    #[test]
    fn test_retry_policy_from_settings() {
        let settings = Settings {
            max_retries: 1,
            model_fallback: false,
            ..Settings::default()
        };
        let policy = retry_policy(&settings);
        assert_eq!(policy.max_retries, 1);
        assert!(!policy.model_fallback);
    }

    #[test]
    fn test_apply_model_rejects_unknown() {
        let config = provider_config("groq").unwrap().clone();
        let mut adapter =
            factory::create_for_config(config, ApiKey::new("k"), HttpClient::new().unwrap());

        apply_model(adapter.as_mut(), "llama-3.1-8b-instant").unwrap();
        assert_eq!(adapter.model(), "llama-3.1-8b-instant");

        let err = apply_model(adapter.as_mut(), "gpt-4o").unwrap_err();
        assert!(err.to_string().contains("mixtral-8x7b-32768"));
        assert_eq!(adapter.model(), "llama-3.1-8b-instant");
    }

    #[tokio::test]
    async fn test_load_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.TXT");
        tokio::fs::write(&path, b"hi").await.unwrap();

        let attachment = load_attachment(&path).await.unwrap();
        assert_eq!(attachment.name(), "notes.TXT");
        assert_eq!(attachment.mime_type(), "text/plain");
        assert_eq!(attachment.base64_data(), "aGk=");

        assert!(load_attachment(&dir.path().join("missing.png")).await.is_err());
    }
}
