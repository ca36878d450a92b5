//! OpenAI-compatible chat completions adapter.

use async_trait::async_trait;
use tracing::{debug, instrument};
use whispr_core::{ApiKey, Attachment, ConversationContext, ProviderConfig};
use whispr_fetch::{ChatAdapter, ChatError, HttpClient};

use super::wire::{
    ChatCompletionRequest, ChatCompletionResponse, ChatContent, ChatMessage, ContentPart,
    ImageUrl, MAX_TOKENS,
};
use crate::base::{AdapterBase, history_window};
use crate::prompt::{attachment_prompt, strip_repeated_introduction, with_file_markers};

/// Adapter for `/chat/completions` endpoints (Groq, `OpenAI`, `OpenRouter`).
#[derive(Debug, Clone)]
pub struct ChatCompletionsAdapter {
    base: AdapterBase,
    client: HttpClient,
}

impl ChatCompletionsAdapter {
    /// Creates a new adapter.
    pub fn new(config: ProviderConfig, api_key: ApiKey, client: HttpClient) -> Self {
        Self {
            base: AdapterBase::new(config, api_key),
            client,
        }
    }

    /// Points the adapter at a different API root.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base.set_endpoint(url);
        self
    }

    fn messages<'a>(
        &self,
        context: &'a ConversationContext,
        multimodal: bool,
        user: ChatContent<'a>,
    ) -> Vec<ChatMessage<'a>> {
        let mut messages = vec![ChatMessage::text(
            "system",
            self.base.system_prompt(multimodal),
        )];
        for turn in history_window(context) {
            messages.push(ChatMessage::text("user", turn.user_text()));
            messages.push(ChatMessage::text("assistant", turn.assistant_text()));
        }
        messages.push(ChatMessage {
            role: "user",
            content: user,
        });
        messages
    }

    #[instrument(skip_all, fields(provider = %self.base.config().id, model = %self.base.model()))]
    async fn send(
        &self,
        messages: Vec<ChatMessage<'_>>,
        context: &ConversationContext,
    ) -> Result<String, ChatError> {
        let url = format!("{}/chat/completions", self.base.endpoint()?);
        let body = ChatCompletionRequest {
            model: self.base.model(),
            messages,
            max_tokens: MAX_TOKENS,
        };

        let bearer = format!("Bearer {}", self.base.api_key().expose());
        let mut headers = vec![("Authorization", bearer.as_str())];
        headers.extend(self.base.extra_headers());

        let response: ChatCompletionResponse =
            self.client.post_json(&url, &headers, &body).await?;
        let text = response.into_text()?;
        debug!(chars = text.len(), "Chat completion received");
        Ok(strip_repeated_introduction(&text, context))
    }
}

#[async_trait]
impl ChatAdapter for ChatCompletionsAdapter {
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
        let messages = self.messages(context, false, ChatContent::Text(user_text.into()));
        self.send(messages, context).await
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

        let mut parts: Vec<ContentPart> = attachments
            .iter()
            .filter(|a| a.is_image())
            .map(|a| ContentPart::ImageUrl {
                image_url: ImageUrl::data(a.mime_type(), a.base64_data()),
            })
            .collect();
        parts.push(ContentPart::Text {
            text: with_file_markers(
                attachment_prompt(user_text),
                attachments.iter().filter(|a| !a.is_image()),
            ),
        });

        let messages = self.messages(context, true, ChatContent::Parts(parts));
        self.send(messages, context).await
    }
}
