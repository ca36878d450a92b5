//! Chat adapter trait.
//!
//! An adapter speaks one wire family for one provider. It owns the selected
//! model and custom system prompt; everything else comes from its
//! [`ProviderConfig`].

use async_trait::async_trait;
use whispr_core::{Attachment, ConversationContext, ProviderConfig, ProviderKind};

use crate::error::ChatError;

// ============================================================================
// Chat Adapter Trait
// ============================================================================

/// A provider-specific chat implementation.
///
/// ## Implementing an Adapter
///
/// ```ignore
/// struct EchoAdapter { config: ProviderConfig, model: String }
///
/// #[async_trait]
/// impl ChatAdapter for EchoAdapter {
///     fn config(&self) -> &ProviderConfig { &self.config }
///     fn model(&self) -> &str { &self.model }
///     fn set_model(&mut self, name: &str) {
///         if self.config.supports_model(name) {
///             self.model = name.to_string();
///         }
///     }
///     // ...
///     async fn generate(&self, text: &str, _ctx: &ConversationContext)
///         -> Result<String, ChatError> {
///         Ok(text.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait ChatAdapter: Send + Sync {
    /// Static configuration of the provider this adapter talks to.
    fn config(&self) -> &ProviderConfig;

    /// Provider identifier.
    fn kind(&self) -> ProviderKind {
        self.config().id
    }

    /// Currently selected model. Always one of the supported models.
    fn model(&self) -> &str;

    /// Selects a model. Names outside the supported list are ignored.
    fn set_model(&mut self, name: &str);

    /// The custom system prompt, if one is set.
    fn custom_system_prompt(&self) -> Option<&str>;

    /// Replaces the built-in system prompt. `None` or blank reverts to the
    /// default.
    fn set_custom_system_prompt(&mut self, prompt: Option<String>);

    /// Whether attachments can be embedded inline.
    fn supports_multimodal(&self) -> bool {
        self.config().supports_multimodal
    }

    /// The model after the current one in fallback order.
    fn fallback_model(&self) -> Option<&str> {
        self.config().model_after(self.model())
    }

    /// Sends one user message with the given context and returns the
    /// assistant reply.
    async fn generate(
        &self,
        user_text: &str,
        context: &ConversationContext,
    ) -> Result<String, ChatError>;

    /// Sends one user message with attachments.
    async fn generate_multimodal(
        &self,
        user_text: &str,
        attachments: &[Attachment],
        context: &ConversationContext,
    ) -> Result<String, ChatError>;
}

// ============================================================================
// Chat Request
// ============================================================================

/// One logical request, replayed on every retry.
#[derive(Debug, Clone, Copy)]
pub enum ChatRequest<'a> {
    /// Plain text message.
    Text {
        /// The user's message.
        user_text: &'a str,
    },
    /// Message with inline attachments.
    Multimodal {
        /// The user's message (may be empty).
        user_text: &'a str,
        /// Files sent with the message.
        attachments: &'a [Attachment],
    },
}

impl<'a> ChatRequest<'a> {
    /// Creates a text request.
    pub fn text(user_text: &'a str) -> Self {
        Self::Text { user_text }
    }

    /// Creates a multimodal request. No attachments means plain text.
    pub fn with_attachments(user_text: &'a str, attachments: &'a [Attachment]) -> Self {
        if attachments.is_empty() {
            Self::Text { user_text }
        } else {
            Self::Multimodal {
                user_text,
                attachments,
            }
        }
    }

    /// The user's message.
    pub fn user_text(&self) -> &'a str {
        match self {
            Self::Text { user_text } | Self::Multimodal { user_text, .. } => user_text,
        }
    }

    /// The attachments (empty for text requests).
    pub fn attachments(&self) -> &'a [Attachment] {
        match self {
            Self::Text { .. } => &[],
            Self::Multimodal { attachments, .. } => attachments,
        }
    }

    /// Sends this request through `adapter`.
    pub async fn dispatch(
        &self,
        adapter: &dyn ChatAdapter,
        context: &ConversationContext,
    ) -> Result<String, ChatError> {
        match *self {
            Self::Text { user_text } => adapter.generate(user_text, context).await,
            Self::Multimodal {
                user_text,
                attachments,
            } => {
                adapter
                    .generate_multimodal(user_text, attachments, context)
                    .await
            }
        }
    }
}
