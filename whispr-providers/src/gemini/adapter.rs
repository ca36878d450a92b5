//! Gemini adapter.

use async_trait::async_trait;
use std::fmt::Write as _;
use tracing::{debug, instrument};
use whispr_core::{ApiKey, Attachment, ConversationContext, ProviderConfig};
use whispr_fetch::{ChatAdapter, ChatError, HttpClient};

use super::wire::{Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part};
use crate::base::{AdapterBase, history_window};
use crate::prompt::{attachment_prompt, strip_repeated_introduction, with_file_markers};

/// Generative Language API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Adapter for the Gemini `generateContent` API.
///
/// History and system prompt are flattened into a single text block.
#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    base: AdapterBase,
    client: HttpClient,
    base_url: String,
}

impl GeminiAdapter {
    /// Creates a new adapter.
    pub fn new(config: ProviderConfig, api_key: ApiKey, client: HttpClient) -> Self {
        let base_url = config
            .endpoint_base_url
            .clone()
            .unwrap_or_else(|| GEMINI_API_BASE.to_string());
        Self {
            base: AdapterBase::new(config, api_key),
            client,
            base_url,
        }
    }

    /// Points the adapter at a different API root.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builds the flattened prompt sent as the final text part.
    pub fn build_prompt(
        &self,
        message: &str,
        context: &ConversationContext,
        multimodal: bool,
    ) -> String {
        let mut history = String::new();
        let mut exchanges = 0usize;
        for (idx, turn) in history_window(context).enumerate() {
            if idx > 0 {
                history.push('\n');
            }
            let _ = write!(
                history,
                "{}. User: {}\n   Assistant: {}",
                idx + 1,
                turn.user_text(),
                turn.assistant_text()
            );
            exchanges += 1;
        }
        if history.is_empty() {
            history.push_str("(This is the start of the conversation)");
        }

        let closing = if multimodal {
            "Analyze the provided content and respond thoughtfully:"
        } else {
            "Respond thoughtfully:"
        };

        format!(
            "{system}\n\n---\nCONVERSATION HISTORY (last {exchanges} exchanges):\n{history}\n\n---\nUSER: {message}\n\n{closing}",
            system = self.base.system_prompt(multimodal),
        )
    }

    #[instrument(skip_all, fields(provider = %self.base.config().id, model = %self.base.model()))]
    async fn send(
        &self,
        parts: Vec<Part<'_>>,
        context: &ConversationContext,
    ) -> Result<String, ChatError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.base.model()
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
        };
        let headers = [("x-goog-api-key", self.base.api_key().expose())];

        let response: GenerateContentResponse =
            self.client.post_json(&url, &headers, &body).await?;
        let text = response.into_text()?;
        debug!(chars = text.len(), "Gemini reply received");
        Ok(strip_repeated_introduction(&text, context))
    }
}

#[async_trait]
impl ChatAdapter for GeminiAdapter {
    fn config(&self) -> &ProviderConfig {
        self.base.config()
    }

    fn model(&self) -> &str {
        self.base.model()
    }

    fn set_model(&mut self, name: &str) {
        self.base.set_model(name);
    }

    fn custom_system_prompt(&self) -> Option<&str> {
        self.base.custom_system_prompt()
    }

    fn set_custom_system_prompt(&mut self, prompt: Option<String>) {
        self.base.set_custom_system_prompt(prompt);
    }

    async fn generate(
        &self,
        user_text: &str,
        context: &ConversationContext,
    ) -> Result<String, ChatError> {
        let text = self.build_prompt(user_text, context, false);
        self.send(vec![Part::Text { text }], context).await
    }

    async fn generate_multimodal(
        &self,
        user_text: &str,
        attachments: &[Attachment],
        context: &ConversationContext,
    ) -> Result<String, ChatError> {
        if !self.supports_multimodal() {
            return self
                .generate(&with_file_markers(user_text, attachments), context)
                .await;
        }

        let mut parts: Vec<Part<'_>> = attachments
            .iter()
            .map(|a| Part::InlineData {
                inline_data: InlineData {
                    mime_type: a.mime_type(),
                    data: a.base64_data(),
                },
            })
            .collect();
        parts.push(Part::Text {
            text: self.build_prompt(attachment_prompt(user_text), context, true),
        });

        self.send(parts, context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::gemini_config;
    use crate::prompt::{DEFAULT_SYSTEM_PROMPT, MULTIMODAL_SYSTEM_PROMPT};
    use whispr_core::ConversationTurn;

    fn adapter() -> GeminiAdapter {
        GeminiAdapter::new(
            gemini_config(),
            ApiKey::new("test-key"),
            HttpClient::new().unwrap(),
        )
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(adapter().base_url, GEMINI_API_BASE);
    }

    #[test]
    fn test_prompt_for_new_conversation() {
        let prompt = adapter().build_prompt("What is Rust?", &ConversationContext::new(), false);
        let expected = format!(
            "{DEFAULT_SYSTEM_PROMPT}\n\n---\nCONVERSATION HISTORY (last 0 exchanges):\n(This is the start of the conversation)\n\n---\nUSER: What is Rust?\n\nRespond thoughtfully:"
        );
        assert_eq!(prompt, expected);
    }

    #[test]
    fn test_prompt_numbers_history() {
        let ctx = ConversationContext::from_turns([
            ConversationTurn::new("one", "uno"),
            ConversationTurn::new("two", "dos"),
        ]);
        let prompt = adapter().build_prompt("three", &ctx, true);

        assert!(prompt.starts_with(MULTIMODAL_SYSTEM_PROMPT));
        assert!(prompt.contains("(last 2 exchanges):\n1. User: one\n   Assistant: uno\n2. User: two\n   Assistant: dos\n"));
        assert!(prompt.ends_with("USER: three\n\nAnalyze the provided content and respond thoughtfully:"));
    }

    #[test]
    fn test_prompt_uses_custom_system_prompt() {
        let mut adapter = adapter();
        adapter.set_custom_system_prompt(Some("You are terse.".to_string()));
        let prompt = adapter.build_prompt("hi", &ConversationContext::new(), false);
        assert!(prompt.starts_with("You are terse."));
    }
}
