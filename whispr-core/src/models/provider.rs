//! Provider-related types.
//!
//! This module contains types related to LLM providers:
//! - [`ProviderKind`] - Enum of supported providers
//! - [`WireFamily`] - Request/response format family
//! - [`ProviderConfig`] - Static provider configuration
//! - [`ApiKey`] - Provider credential

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Provider Kind
// ============================================================================

/// Supported LLM provider kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini
    Gemini,
    /// Groq
    Groq,
    /// `OpenAI`
    OpenAI,
    /// Anthropic
    Anthropic,
    /// `OpenRouter`
    OpenRouter,
}

impl ProviderKind {
    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gemini => "Google Gemini",
            Self::Groq => "Groq",
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::OpenRouter => "OpenRouter",
        }
    }

    /// Returns the stable identifier (lowercase, no spaces).
    pub fn id(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Groq => "groq",
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::OpenRouter => "openrouter",
        }
    }

    /// Returns all available provider kinds.
    pub fn all() -> &'static [ProviderKind] {
        &[
            Self::Gemini,
            Self::Groq,
            Self::OpenAI,
            Self::Anthropic,
            Self::OpenRouter,
        ]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|k| k.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CoreError::ProviderNotFound(needle.to_string()))
    }
}

// ============================================================================
// Wire Family
// ============================================================================

/// The request/response format a provider speaks.
///
/// Every provider belongs to exactly one family, and each family has one
/// adapter implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFamily {
    /// Vendor-native API (Gemini `generateContent`).
    Native,
    /// Anthropic Messages format.
    Messages,
    /// OpenAI-compatible chat completions format.
    ChatCompletions,
}

impl WireFamily {
    /// Returns the display name for this family.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Native => "Native",
            Self::Messages => "Messages",
            Self::ChatCompletions => "Chat Completions",
        }
    }
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Static configuration for one provider.
///
/// Loaded once into the registry and never mutated. Adapters keep their own
/// clone so tests can point one at a mock server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider identifier.
    pub id: ProviderKind,
    /// Display name in UI.
    pub display_name: String,
    /// Base URL of the HTTP API. `None` for native-family providers whose
    /// adapter owns its endpoint.
    pub endpoint_base_url: Option<String>,
    /// Supported models in fallback order.
    pub supported_models: Vec<String>,
    /// Model selected when an adapter is created.
    pub default_model: String,
    /// Environment variable that may hold the API key.
    pub credential_env_var: String,
    /// Whether image/document input is accepted.
    pub supports_multimodal: bool,
    /// Headers added to every request.
    #[serde(default)]
    pub extra_request_headers: BTreeMap<String, String>,
    /// Wire format family.
    pub wire_family: WireFamily,
    /// Where users can create an API key.
    pub api_key_url: Option<String>,
}

impl ProviderConfig {
    /// Returns true if `model` is one of the supported models.
    pub fn supports_model(&self, model: &str) -> bool {
        self.supported_models.iter().any(|m| m == model)
    }

    /// Returns the model listed after `current`, if any.
    ///
    /// An unknown `current` has no successor.
    pub fn model_after(&self, current: &str) -> Option<&str> {
        let idx = self.supported_models.iter().position(|m| m == current)?;
        self.supported_models.get(idx + 1).map(String::as_str)
    }

    /// Validates the internal consistency of this configuration.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.supported_models.is_empty() {
            return Err(CoreError::InvalidConfig(format!(
                "{} has no supported models",
                self.id
            )));
        }
        if !self.supports_model(&self.default_model) {
            return Err(CoreError::InvalidConfig(format!(
                "{} default model {} is not in its supported models",
                self.id, self.default_model
            )));
        }
        if self.wire_family != WireFamily::Native && self.endpoint_base_url.is_none() {
            return Err(CoreError::InvalidConfig(format!(
                "{} requires an endpoint",
                self.id
            )));
        }
        Ok(())
    }
}

// ============================================================================
// API Key
// ============================================================================

/// A provider credential.
///
/// The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a raw key. Surrounding whitespace is removed.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self(value.trim().to_string())
    }

    /// Returns the raw secret for use in a request header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if the key is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a short hint safe for display, e.g. `sk-a…(51 chars)`.
    pub fn masked(&self) -> String {
        let prefix: String = self.0.chars().take(4).collect();
        format!("{prefix}…({} chars)", self.0.chars().count())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ApiKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// Tests
// ============================================================================
