//! Configurations for the OpenAI-compatible providers.

use std::collections::BTreeMap;
use whispr_core::{ProviderConfig, ProviderKind, WireFamily};

fn models(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

/// Creates the Groq provider configuration.
pub fn groq_config() -> ProviderConfig {
    ProviderConfig {
        id: ProviderKind::Groq,
        display_name: ProviderKind::Groq.display_name().to_string(),
        endpoint_base_url: Some("https://api.groq.com/openai/v1".to_string()),
        supported_models: models(&[
            "llama-3.3-70b-versatile",
            "llama-3.1-8b-instant",
            "mixtral-8x7b-32768",
        ]),
        default_model: "llama-3.3-70b-versatile".to_string(),
        credential_env_var: "GROQ_API_KEY".to_string(),
        supports_multimodal: false,
        extra_request_headers: BTreeMap::new(),
        wire_family: WireFamily::ChatCompletions,
        api_key_url: Some("https://console.groq.com/keys".to_string()),
    }
}

/// Creates the `OpenAI` provider configuration.
pub fn openai_config() -> ProviderConfig {
    ProviderConfig {
        id: ProviderKind::OpenAI,
        display_name: ProviderKind::OpenAI.display_name().to_string(),
        endpoint_base_url: Some("https://api.openai.com/v1".to_string()),
        supported_models: models(&["gpt-4o", "gpt-4o-mini", "gpt-4-turbo", "gpt-3.5-turbo"]),
        default_model: "gpt-4o-mini".to_string(),
        credential_env_var: "OPENAI_API_KEY".to_string(),
        supports_multimodal: true,
        extra_request_headers: BTreeMap::new(),
        wire_family: WireFamily::ChatCompletions,
        api_key_url: Some("https://platform.openai.com/api-keys".to_string()),
    }
}

/// Creates the `OpenRouter` provider configuration.
pub fn openrouter_config() -> ProviderConfig {
    ProviderConfig {
        id: ProviderKind::OpenRouter,
        display_name: ProviderKind::OpenRouter.display_name().to_string(),
        endpoint_base_url: Some("https://openrouter.ai/api/v1".to_string()),
        supported_models: models(&[
            "anthropic/claude-3.5-sonnet",
            "openai/gpt-4o",
            "google/gemini-pro-1.5",
            "meta-llama/llama-3.1-70b-instruct",
        ]),
        default_model: "anthropic/claude-3.5-sonnet".to_string(),
        credential_env_var: "OPENROUTER_API_KEY".to_string(),
        supports_multimodal: true,
        extra_request_headers: BTreeMap::from([
            ("HTTP-Referer".to_string(), "https://gabay.app".to_string()),
            ("X-Title".to_string(), "Gabay AI Assistant".to_string()),
        ]),
        wire_family: WireFamily::ChatCompletions,
        api_key_url: Some("https://openrouter.ai/keys".to_string()),
    }
}
