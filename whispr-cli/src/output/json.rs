//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;
use whispr_core::ProviderConfig;
use whispr_fetch::{CallAttempt, CallOutcome, ChatError};

use crate::runtime::CredentialSource;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for one provider.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOutput {
    pub id: String,
    pub name: String,
    pub family: String,
    pub multimodal: bool,
    pub default_model: String,
    pub models: Vec<String>,
    pub credential: String,
    pub active: bool,
}

impl ProviderOutput {
    /// Builds the output for a provider.
    pub fn new(config: &ProviderConfig, source: CredentialSource, active: bool) -> Self {
        Self {
            id: config.id.id().to_string(),
            name: config.display_name.clone(),
            family: config.wire_family.display_name().to_string(),
            multimodal: config.supports_multimodal,
            default_model: config.default_model.clone(),
            models: config.supported_models.clone(),
            credential: source.label().to_string(),
            active,
        }
    }
}

/// JSON output for one chat call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatOutput {
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorOutput>,
    pub attempts: Vec<AttemptOutput>,
    pub model_switches: usize,
    pub duration_ms: u128,
}

/// A classified error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub kind: String,
    pub message: String,
    pub retryable: bool,
}

impl From<&ChatError> for ErrorOutput {
    fn from(err: &ChatError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// One adapter call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptOutput {
    pub model: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub duration_ms: u128,
}

impl From<&CallAttempt> for AttemptOutput {
    fn from(attempt: &CallAttempt) -> Self {
        Self {
            model: attempt.model.clone(),
            success: attempt.success,
            error: attempt.error.clone(),
            kind: attempt.kind.map(|k| k.to_string()),
            duration_ms: attempt.duration.as_millis(),
        }
    }
}

impl ChatOutput {
    /// Builds the output for an orchestrated call.
    pub fn new(provider: &str, outcome: &CallOutcome) -> Self {
        let (reply, error) = match &outcome.result {
            Ok(reply) => (Some(reply.clone()), None),
            Err(err) => (None, Some(ErrorOutput::from(err))),
        };
        Self {
            provider: provider.to_string(),
            model: outcome.final_model.clone(),
            reply,
            error,
            attempts: outcome.attempts.iter().map(AttemptOutput::from).collect(),
            model_switches: outcome.model_switches(),
            duration_ms: outcome.duration.as_millis(),
        }
    }
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}
