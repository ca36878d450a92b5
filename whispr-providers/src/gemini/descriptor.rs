//! Gemini provider configuration.

use std::collections::BTreeMap;
use whispr_core::{ProviderConfig, ProviderKind, WireFamily};

/// Creates the Gemini provider configuration.
///
/// The endpoint is left unset; the adapter owns the Generative Language
/// API base URL.
pub fn gemini_config() -> ProviderConfig {
    ProviderConfig {
        id: ProviderKind::Gemini,
        display_name: ProviderKind::Gemini.display_name().to_string(),
        endpoint_base_url: None,
        supported_models: vec![
            "gemini-2.0-flash".to_string(),
            "gemini-1.5-flash".to_string(),
            "gemini-1.5-pro".to_string(),
        ],
        default_model: "gemini-2.0-flash".to_string(),
        credential_env_var: "GOOGLE_API_KEY".to_string(),
        supports_multimodal: true,
        extra_request_headers: BTreeMap::new(),
        wire_family: WireFamily::Native,
        api_key_url: Some("https://aistudio.google.com/app/apikey".to_string()),
    }
}
