//! Serde tests for core types.
//!
//! Settings files and CLI JSON output depend on these exact shapes.

use std::collections::BTreeMap;

use crate::{Attachment, ConversationTurn, ProviderConfig, ProviderKind, WireFamily};

// ============================================================================
// ProviderKind Serde Tests
// ============================================================================

#[test]
fn test_provider_kind_serde_roundtrip_all_variants() {
    for kind in ProviderKind::all() {
        let json = serde_json::to_string(kind).unwrap();
        let deserialized: ProviderKind = serde_json::from_str(&json).unwrap();
        assert_eq!(*kind, deserialized, "Round-trip failed for {:?}", kind);
    }
}

#[test]
fn test_provider_kind_serializes_as_id() {
    for kind in ProviderKind::all() {
        let json = serde_json::to_string(kind).unwrap();
        assert_eq!(json, format!("\"{}\"", kind.id()));
    }
}

#[test]
fn test_provider_kind_invalid_deserialize() {
    let result: Result<ProviderKind, _> = serde_json::from_str(r#""invalid_provider""#);
    assert!(result.is_err());
}

// ============================================================================
// WireFamily / ProviderConfig
// ============================================================================

#[test]
fn test_wire_family_snake_case() {
    let json = serde_json::to_string(&WireFamily::ChatCompletions).unwrap();
    assert_eq!(json, r#""chat_completions""#);
}

#[test]
fn test_provider_config_missing_headers_default_empty() {
    let json = r#"{
        "id": "anthropic",
        "display_name": "Anthropic",
        "endpoint_base_url": "https://api.anthropic.com/v1",
        "supported_models": ["m1"],
        "default_model": "m1",
        "credential_env_var": "ANTHROPIC_API_KEY",
        "supports_multimodal": true,
        "wire_family": "messages",
        "api_key_url": null
    }"#;

    let config: ProviderConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.id, ProviderKind::Anthropic);
    assert_eq!(config.wire_family, WireFamily::Messages);
    assert_eq!(config.extra_request_headers, BTreeMap::new());
}

// ============================================================================
// Conversation / Attachment
// ============================================================================

#[test]
fn test_conversation_turn_camel_case() {
    let turn = ConversationTurn::new("hi", "hello");
    let value = serde_json::to_value(&turn).unwrap();
    assert_eq!(value["userText"], "hi");
    assert_eq!(value["assistantText"], "hello");
}

#[test]
fn test_attachment_camel_case() {
    let att = Attachment::new("a.png", "image/png", "AAAA");
    let value = serde_json::to_value(&att).unwrap();
    assert_eq!(value["mimeType"], "image/png");
    assert_eq!(value["base64Data"], "AAAA");
}
