//! State shared by every adapter.

use tracing::debug;
use whispr_core::{ApiKey, CONTEXT_CAPACITY, ConversationContext, ConversationTurn, ProviderConfig};
use whispr_fetch::ChatError;

use crate::prompt;

/// Credential, selected model and custom prompt for one adapter instance.
#[derive(Debug, Clone)]
pub struct AdapterBase {
    config: ProviderConfig,
    api_key: ApiKey,
    model: String,
    custom_system_prompt: Option<String>,
}

impl AdapterBase {
    /// Creates state for `config` with its default model selected.
    pub fn new(config: ProviderConfig, api_key: ApiKey) -> Self {
        let model = config.default_model.clone();
        Self {
            config,
            api_key,
            model,
            custom_system_prompt: None,
        }
    }

    /// Provider configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// The credential.
    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Selected model.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Selects `name` if supported. Returns false when it is not.
    pub fn set_model(&mut self, name: &str) -> bool {
        if !self.config.supports_model(name) {
            debug!(provider = %self.config.id, model = %name, "Ignoring unsupported model");
            return false;
        }
        if self.model != name {
            debug!(provider = %self.config.id, from = %self.model, to = %name, "Model selected");
            self.model = name.to_string();
        }
        true
    }

    /// Custom system prompt, if any.
    pub fn custom_system_prompt(&self) -> Option<&str> {
        self.custom_system_prompt.as_deref()
    }

    /// Sets or clears the custom system prompt. Blank prompts clear it.
    pub fn set_custom_system_prompt(&mut self, prompt: Option<String>) {
        self.custom_system_prompt = prompt.filter(|p| !p.trim().is_empty());
    }

    /// The system prompt to send.
    pub fn system_prompt(&self, multimodal: bool) -> String {
        prompt::system_prompt(self.custom_system_prompt(), multimodal)
    }

    /// Endpoint base URL without a trailing slash.
    pub fn endpoint(&self) -> Result<&str, ChatError> {
        self.config
            .endpoint_base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .ok_or_else(|| {
                ChatError::InvalidResponse(format!("{} has no endpoint configured", self.config.id))
            })
    }

    /// Overrides the endpoint base URL.
    pub fn set_endpoint(&mut self, url: impl Into<String>) {
        self.config.endpoint_base_url = Some(url.into());
    }

    /// Extra headers configured for this provider.
    pub fn extra_headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.config
            .extra_request_headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The trailing turns replayed to the provider, oldest first.
pub fn history_window(context: &ConversationContext) -> impl Iterator<Item = &ConversationTurn> {
    context
        .iter()
        .skip(context.len().saturating_sub(CONTEXT_CAPACITY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderRegistry;
    use whispr_core::ProviderKind;

    fn adapter_base(kind: ProviderKind) -> AdapterBase {
        let config = ProviderRegistry::get(kind).unwrap().clone();
        AdapterBase::new(config, ApiKey::new("test-key"))
    }

    #[test]
    fn test_starts_on_default_model() {
        let base = adapter_base(ProviderKind::OpenAI);
        assert_eq!(base.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_set_model_ignores_unknown() {
        let mut base = adapter_base(ProviderKind::Groq);
        assert!(!base.set_model("gpt-4o"));
        assert_eq!(base.model(), "llama-3.3-70b-versatile");

        assert!(base.set_model("llama-3.1-8b-instant"));
        assert_eq!(base.model(), "llama-3.1-8b-instant");
        assert!(base.config().supports_model(base.model()));
    }

    #[test]
    fn test_blank_custom_prompt_reverts() {
        let mut base = adapter_base(ProviderKind::Anthropic);
        base.set_custom_system_prompt(Some("Talk like a pirate".to_string()));
        assert!(base.system_prompt(false).starts_with("Talk like a pirate"));

        base.set_custom_system_prompt(Some("   ".to_string()));
        assert_eq!(base.custom_system_prompt(), None);
        assert_eq!(base.system_prompt(false), prompt::DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let mut base = adapter_base(ProviderKind::Groq);
        base.set_endpoint("http://127.0.0.1:9999/v1/");
        assert_eq!(base.endpoint().unwrap(), "http://127.0.0.1:9999/v1");

        let gemini = adapter_base(ProviderKind::Gemini);
        assert!(gemini.endpoint().is_err());
    }

    #[test]
    fn test_history_window_keeps_newest() {
        let mut ctx = ConversationContext::with_capacity(12);
        for n in 0..12 {
            ctx.append(ConversationTurn::new(format!("q{n}"), format!("a{n}")));
        }
        let window: Vec<_> = history_window(&ctx).map(ConversationTurn::user_text).collect();
        assert_eq!(window.len(), CONTEXT_CAPACITY);
        assert_eq!(window[0], "q4");
        assert_eq!(window[7], "q11");
    }

    #[test]
    fn test_debug_redacts_key() {
        let dbg = format!("{:?}", adapter_base(ProviderKind::Groq));
        assert!(!dbg.contains("test-key"));
    }
}
