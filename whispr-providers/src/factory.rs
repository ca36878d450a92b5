//! Provider factory.
//!
//! Resolves a provider id and credential into a ready adapter. Each wire
//! family maps to exactly one adapter type.

use tracing::info;
use whispr_core::{ApiKey, ProviderConfig, WireFamily};
use whispr_fetch::{ChatAdapter, ChatError, HttpClient};

use crate::anthropic::AnthropicAdapter;
use crate::gemini::GeminiAdapter;
use crate::openai::ChatCompletionsAdapter;
use crate::registry::ProviderRegistry;

/// Creates an adapter for `provider_id` with a default HTTP client.
pub fn create(
    provider_id: &str,
    credential: impl Into<ApiKey>,
) -> Result<Box<dyn ChatAdapter>, ChatError> {
    create_with_client(provider_id, credential, HttpClient::new()?)
}

/// Creates an adapter for `provider_id` sharing `client`.
///
/// # Errors
///
/// - [`ChatError::UnknownProvider`] if the id is not registered
/// - [`ChatError::MissingCredential`] if the credential is blank
pub fn create_with_client(
    provider_id: &str,
    credential: impl Into<ApiKey>,
    client: HttpClient,
) -> Result<Box<dyn ChatAdapter>, ChatError> {
    let config = ProviderRegistry::get_by_id(provider_id)
        .ok_or_else(|| ChatError::UnknownProvider(provider_id.trim().to_string()))?;

    let credential = credential.into();
    if credential.is_empty() {
        return Err(ChatError::MissingCredential(config.id.to_string()));
    }

    info!(provider = %config.id, model = %config.default_model, "Creating adapter");
    Ok(create_for_config(config.clone(), credential, client))
}

/// Builds the adapter for an arbitrary configuration.
///
/// Skips registry lookup and credential checks; used to target
/// self-hosted or mock endpoints.
pub fn create_for_config(
    config: ProviderConfig,
    credential: ApiKey,
    client: HttpClient,
) -> Box<dyn ChatAdapter> {
    match config.wire_family {
        WireFamily::Native => Box::new(GeminiAdapter::new(config, credential, client)),
        WireFamily::Messages => Box::new(AnthropicAdapter::new(config, credential, client)),
        WireFamily::ChatCompletions => {
            Box::new(ChatCompletionsAdapter::new(config, credential, client))
        }
    }
}
