// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Whispr Providers
//!
//! Provider configurations and adapters for the Whispr chat core.
//!
//! Every provider belongs to one wire family, and each family has one
//! adapter:
//!
//! | Provider | Family | Adapter | Multimodal |
//! |----------|--------|---------|------------|
//! | Google Gemini | Native | [`GeminiAdapter`] | ✅ |
//! | Groq | Chat Completions | [`ChatCompletionsAdapter`] | ❌ |
//! | OpenAI | Chat Completions | [`ChatCompletionsAdapter`] | ✅ |
//! | Anthropic | Messages | [`AnthropicAdapter`] | ✅ |
//! | OpenRouter | Chat Completions | [`ChatCompletionsAdapter`] | ✅ |
//!
//! ## Usage
//!
//! ```ignore
//! use whispr_core::ConversationContext;
//! use whispr_providers::{generate, select_provider};
//!
//! let mut adapter = select_provider("groq", api_key)?;
//! let context = ConversationContext::new();
//! let reply = generate(adapter.as_mut(), "Hello!", &context).await?;
//! ```

pub mod base;
pub mod factory;
pub mod prompt;
pub mod registry;
pub mod session;

// Provider modules (alphabetical)
pub mod anthropic;
pub mod gemini;
pub mod openai;

use whispr_core::{ApiKey, Attachment, ConversationContext, ProviderConfig};
use whispr_fetch::{ChatAdapter, ChatError, RetryOrchestrator};

// Re-export key types
pub use base::AdapterBase;
pub use registry::ProviderRegistry;
pub use session::ChatSession;

// Re-export adapters and configurations
pub use anthropic::{AnthropicAdapter, anthropic_config};
pub use gemini::{GeminiAdapter, gemini_config};
pub use openai::{ChatCompletionsAdapter, groq_config, openai_config, openrouter_config};

// ============================================================================
// Entry Points
// ============================================================================

/// Lists every registered provider.
pub fn list_providers() -> &'static [ProviderConfig] {
    ProviderRegistry::all()
}

/// Creates an adapter for `provider_id`.
pub fn select_provider(
    provider_id: &str,
    credential: impl Into<ApiKey>,
) -> Result<Box<dyn ChatAdapter>, ChatError> {
    factory::create(provider_id, credential)
}

/// Sends a text message with the default retry policy.
pub async fn generate(
    adapter: &mut dyn ChatAdapter,
    user_text: &str,
    context: &ConversationContext,
) -> Result<String, ChatError> {
    RetryOrchestrator::default()
        .generate(adapter, user_text, context)
        .await
}

/// Sends a message with attachments with the default retry policy.
pub async fn generate_multimodal(
    adapter: &mut dyn ChatAdapter,
    user_text: &str,
    attachments: &[Attachment],
    context: &ConversationContext,
) -> Result<String, ChatError> {
    RetryOrchestrator::default()
        .generate_multimodal(adapter, user_text, attachments, context)
        .await
}
