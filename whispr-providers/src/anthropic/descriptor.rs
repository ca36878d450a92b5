//! Anthropic provider configuration.

use std::collections::BTreeMap;
use whispr_core::{ProviderConfig, ProviderKind, WireFamily};

/// Creates the Anthropic provider configuration.
pub fn anthropic_config() -> ProviderConfig {
    ProviderConfig {
        id: ProviderKind::Anthropic,
        display_name: ProviderKind::Anthropic.display_name().to_string(),
        endpoint_base_url: Some("https://api.anthropic.com/v1".to_string()),
        supported_models: vec![
            "claude-sonnet-4-20250514".to_string(),
            "claude-3-5-sonnet-20241022".to_string(),
            "claude-3-5-haiku-20241022".to_string(),
        ],
        default_model: "claude-sonnet-4-20250514".to_string(),
        credential_env_var: "ANTHROPIC_API_KEY".to_string(),
        supports_multimodal: true,
        extra_request_headers: BTreeMap::new(),
        wire_family: WireFamily::Messages,
        api_key_url: Some("https://console.anthropic.com/settings/keys".to_string()),
    }
}
