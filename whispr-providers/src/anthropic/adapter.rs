//! Anthropic Messages adapter.

use async_trait::async_trait;
use tracing::{debug, instrument};
use whispr_core::{ApiKey, Attachment, ConversationContext, ProviderConfig};
use whispr_fetch::{ChatAdapter, ChatError, HttpClient};

use super::wire::{
    Base64Source, ContentBlock, MAX_TOKENS, Message, MessageContent, MessagesRequest,
    MessagesResponse,
};
use crate::base::{AdapterBase, history_window};
use crate::prompt::{attachment_prompt, strip_repeated_introduction, with_file_markers};

/// API version sent in the `anthropic-version` header.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Adapter for the Anthropic Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    base: AdapterBase,
    client: HttpClient,
}

impl AnthropicAdapter {
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

    fn history_messages<'a>(context: &'a ConversationContext) -> Vec<Message<'a>> {
        history_window(context)
            .flat_map(|turn| {
                [
                    Message {
                        role: "user",
                        content: MessageContent::Text(turn.user_text()),
                    },
                    Message {
                        role: "assistant",
                        content: MessageContent::Text(turn.assistant_text()),
                    },
                ]
            })
            .collect()
    }

    #[instrument(skip_all, fields(provider = %self.base.config().id, model = %self.base.model()))]
    async fn send(
        &self,
        system: String,
        messages: Vec<Message<'_>>,
        context: &ConversationContext,
    ) -> Result<String, ChatError> {
        let url = format!("{}/messages", self.base.endpoint()?);
        let body = MessagesRequest {
            model: self.base.model(),
            max_tokens: MAX_TOKENS,
            system,
            messages,
        };

        let mut headers = vec![
            ("x-api-key", self.base.api_key().expose()),
            ("anthropic-version", ANTHROPIC_VERSION),
        ];
        headers.extend(self.base.extra_headers());

        let response: MessagesResponse = self.client.post_json(&url, &headers, &body).await?;
        let text = response.into_text()?;
        debug!(chars = text.len(), "Anthropic reply received");
        Ok(strip_repeated_introduction(&text, context))
    }
}

#[async_trait]
impl ChatAdapter for AnthropicAdapter {
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
        let mut messages = Self::history_messages(context);
        messages.push(Message {
            role: "user",
            content: MessageContent::Text(user_text),
        });
        self.send(self.base.system_prompt(false), messages, context)
            .await
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

        let images = attachments.iter().filter(|a| a.is_image()).map(|a| ContentBlock::Image {
            source: Base64Source::new(a.mime_type(), a.base64_data()),
        });
        let documents = attachments.iter().filter(|a| a.is_pdf()).map(|a| ContentBlock::Document {
            source: Base64Source::new(a.mime_type(), a.base64_data()),
        });
        let others = attachments.iter().filter(|a| !a.is_image() && !a.is_pdf());

        let mut blocks: Vec<ContentBlock<'_>> = images.chain(documents).collect();
        blocks.push(ContentBlock::Text {
            text: with_file_markers(attachment_prompt(user_text), others),
        });

        let mut messages = Self::history_messages(context);
        messages.push(Message {
            role: "user",
            content: MessageContent::Blocks(blocks),
        });
        self.send(self.base.system_prompt(true), messages, context)
            .await
    }
}
