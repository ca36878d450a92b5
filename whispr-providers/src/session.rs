//! Chat session.
//!
//! Owns the active adapter, the conversation window and the orchestrator,
//! and records each successful exchange.

use tracing::info;
use whispr_core::{ApiKey, Attachment, ConversationContext, ConversationTurn};
use whispr_fetch::{CallOutcome, ChatAdapter, ChatError, ChatRequest, RetryOrchestrator, RetryPolicy};

use crate::factory;

/// One conversation with one active provider.
pub struct ChatSession {
    adapter: Box<dyn ChatAdapter>,
    context: ConversationContext,
    orchestrator: RetryOrchestrator,
}

impl ChatSession {
    /// Creates a session with the default retry policy.
    pub fn new(adapter: Box<dyn ChatAdapter>) -> Self {
        Self::with_policy(adapter, RetryPolicy::default())
    }

    /// Creates a session with a custom retry policy.
    pub fn with_policy(adapter: Box<dyn ChatAdapter>, policy: RetryPolicy) -> Self {
        Self {
            adapter,
            context: ConversationContext::new(),
            orchestrator: RetryOrchestrator::new(policy),
        }
    }

    /// Seeds the conversation window.
    #[must_use]
    pub fn with_context(mut self, context: ConversationContext) -> Self {
        self.context = context;
        self
    }

    /// The active adapter.
    pub fn adapter(&self) -> &dyn ChatAdapter {
        self.adapter.as_ref()
    }

    /// The active adapter, for model or prompt changes.
    pub fn adapter_mut(&mut self) -> &mut dyn ChatAdapter {
        self.adapter.as_mut()
    }

    /// The conversation window.
    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    /// Sends a text message and records the exchange on success.
    pub async fn send(&mut self, text: &str) -> Result<String, ChatError> {
        self.send_with_attachments(text, &[]).await
    }

    /// Sends a message with attachments and records the exchange on success.
    pub async fn send_with_attachments(
        &mut self,
        text: &str,
        attachments: &[Attachment],
    ) -> Result<String, ChatError> {
        self.execute(text, attachments).await.result
    }

    /// Like [`ChatSession::send_with_attachments`], but returns the full
    /// attempt log.
    pub async fn execute(&mut self, text: &str, attachments: &[Attachment]) -> CallOutcome {
        let request = ChatRequest::with_attachments(text, attachments);
        let outcome = self
            .orchestrator
            .execute(self.adapter.as_mut(), request, &self.context)
            .await;

        if let Ok(reply) = &outcome.result {
            let user_text = if attachments.is_empty() {
                text.to_string()
            } else {
                attachment_note(text, attachments)
            };
            self.context
                .append(ConversationTurn::new(user_text, reply.clone()));
        }
        outcome
    }

    /// Replaces the adapter with a new provider. The conversation window and
    /// custom system prompt carry over.
    pub fn switch_provider(
        &mut self,
        provider_id: &str,
        credential: impl Into<ApiKey>,
    ) -> Result<(), ChatError> {
        let adapter = factory::create(provider_id, credential)?;
        self.replace_adapter(adapter);
        Ok(())
    }

    /// Installs an already-built adapter, keeping the custom system prompt.
    pub fn replace_adapter(&mut self, mut adapter: Box<dyn ChatAdapter>) {
        let prompt = self.adapter.custom_system_prompt().map(str::to_string);
        adapter.set_custom_system_prompt(prompt);
        info!(from = %self.adapter.kind(), to = %adapter.kind(), "Switched provider");
        self.adapter = adapter;
    }

    /// Clears the conversation window.
    pub fn reset(&mut self) {
        self.context.clear();
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("provider", &self.adapter.kind())
            .field("model", &self.adapter.model())
            .field("turns", &self.context.len())
            .finish_non_exhaustive()
    }
}

/// The user text stored in history for a turn that carried files.
pub fn attachment_note(text: &str, attachments: &[Attachment]) -> String {
    let text = if text.trim().is_empty() {
        "Analyze attached files"
    } else {
        text
    };
    let names: Vec<&str> = attachments.iter().map(Attachment::name).collect();
    format!(
        "{text} [with {} file(s): {}]",
        attachments.len(),
        names.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_note() {
        let files = [
            Attachment::new("a.png", "image/png", ""),
            Attachment::new("b.pdf", "application/pdf", ""),
        ];
        assert_eq!(
            attachment_note("compare", &files),
            "compare [with 2 file(s): a.png, b.pdf]"
        );
        assert_eq!(
            attachment_note("", &files[..1]),
            "Analyze attached files [with 1 file(s): a.png]"
        );
    }

    #[test]
    fn test_switch_provider_keeps_prompt_and_context() {
        let mut adapter = factory::create("groq", "key").unwrap();
        adapter.set_custom_system_prompt(Some("Be brief.".to_string()));
        let context = ConversationContext::from_turns([ConversationTurn::new("q", "a")]);
        let mut session = ChatSession::new(adapter).with_context(context);

        session.switch_provider("anthropic", "other-key").unwrap();

        assert_eq!(session.adapter().kind().id(), "anthropic");
        assert_eq!(session.adapter().custom_system_prompt(), Some("Be brief."));
        assert_eq!(session.context().len(), 1);

        session.reset();
        assert!(session.context().is_empty());
    }

    #[test]
    fn test_switch_provider_errors_leave_session_intact() {
        let adapter = factory::create("groq", "key").unwrap();
        let mut session = ChatSession::new(adapter);

        assert!(session.switch_provider("nope", "key").is_err());
        assert!(session.switch_provider("openai", "").is_err());
        assert_eq!(session.adapter().kind().id(), "groq");
    }
}
