//! Retry and model-fallback orchestration.
//!
//! The orchestrator wraps one adapter call. On a transient failure it first
//! walks the provider's model list, then backs off exponentially on the last
//! model until the retry budget is spent.

use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use whispr_core::{Attachment, ConversationContext};

use crate::adapter::{ChatAdapter, ChatRequest};
use crate::error::{ChatError, ErrorKind};
use crate::retry::RetryPolicy;

// ============================================================================
// Call Attempt
// ============================================================================

/// Record of a single adapter call.
#[derive(Debug, Clone)]
pub struct CallAttempt {
    /// Model used for the call.
    pub model: String,
    /// Whether the call succeeded.
    pub success: bool,
    /// Error message if the call failed.
    pub error: Option<String>,
    /// Classification of the failure.
    pub kind: Option<ErrorKind>,
    /// How long the call took.
    pub duration: Duration,
}

impl CallAttempt {
    /// Creates a successful attempt record.
    pub fn success(model: impl Into<String>, duration: Duration) -> Self {
        Self {
            model: model.into(),
            success: true,
            error: None,
            kind: None,
            duration,
        }
    }

    /// Creates a failed attempt record.
    pub fn failure(
        model: impl Into<String>,
        kind: ErrorKind,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            model: model.into(),
            success: false,
            error: Some(error.into()),
            kind: Some(kind),
            duration,
        }
    }
}

// ============================================================================
// Call Outcome
// ============================================================================

/// The outcome of an orchestrated call.
#[derive(Debug)]
pub struct CallOutcome {
    /// The reply, or the final classified error.
    pub result: Result<String, ChatError>,
    /// All attempts made, in order.
    pub attempts: Vec<CallAttempt>,
    /// Total duration including backoff sleeps.
    pub duration: Duration,
    /// Model selected on the adapter when the call finished.
    pub final_model: String,
}

impl CallOutcome {
    /// Returns true if the call succeeded.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the number of adapter calls made.
    pub fn attempts_count(&self) -> usize {
        self.attempts.len()
    }

    /// Returns the number of times the model changed between attempts.
    pub fn model_switches(&self) -> usize {
        self.attempts
            .windows(2)
            .filter(|pair| pair[0].model != pair[1].model)
            .count()
    }

    /// Returns all errors that occurred.
    pub fn errors(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter_map(|a| a.error.as_deref())
            .collect()
    }
}

// ============================================================================
// Retry Orchestrator
// ============================================================================

/// Runs adapter calls under a [`RetryPolicy`].
#[derive(Debug, Clone, Default)]
pub struct RetryOrchestrator {
    policy: RetryPolicy,
}

impl RetryOrchestrator {
    /// Creates an orchestrator with the given policy.
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// The active policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Sends a text message, returning only the result.
    pub async fn generate(
        &self,
        adapter: &mut dyn ChatAdapter,
        user_text: &str,
        context: &ConversationContext,
    ) -> Result<String, ChatError> {
        self.execute(adapter, ChatRequest::text(user_text), context)
            .await
            .result
    }

    /// Sends a message with attachments, returning only the result.
    pub async fn generate_multimodal(
        &self,
        adapter: &mut dyn ChatAdapter,
        user_text: &str,
        attachments: &[Attachment],
        context: &ConversationContext,
    ) -> Result<String, ChatError> {
        self.execute(
            adapter,
            ChatRequest::with_attachments(user_text, attachments),
            context,
        )
        .await
        .result
    }

    /// Executes `request`, retrying transient failures.
    ///
    /// Fallback switches are sticky: the adapter keeps the advanced model
    /// after this call returns.
    #[instrument(
        skip_all,
        fields(provider = %adapter.kind(), max_retries = self.policy.max_retries)
    )]
    pub async fn execute(
        &self,
        adapter: &mut dyn ChatAdapter,
        request: ChatRequest<'_>,
        context: &ConversationContext,
    ) -> CallOutcome {
        let start = Instant::now();
        let mut attempts = Vec::new();
        let mut retries: u32 = 0;

        loop {
            let model = adapter.model().to_string();
            let attempt_start = Instant::now();
            debug!(model = %model, retries, "Calling adapter");

            let result = self.call_once(&*adapter, request, context).await;
            let duration = attempt_start.elapsed();

            let error = match result {
                Ok(text) => {
                    info!(model = %model, attempts = attempts.len() + 1, "Call succeeded");
                    attempts.push(CallAttempt::success(&model, duration));
                    return CallOutcome {
                        result: Ok(text),
                        attempts,
                        duration: start.elapsed(),
                        final_model: model,
                    };
                }
                Err(e) => e,
            };

            let kind = error.kind();
            warn!(model = %model, kind = ?kind, error = %error, "Call failed");
            attempts.push(CallAttempt::failure(&model, kind, error.to_string(), duration));

            if !kind.is_retryable() {
                return Self::failed(error, attempts, start, model);
            }

            let next = if self.policy.model_fallback {
                adapter.fallback_model().map(str::to_string)
            } else {
                None
            };
            if let Some(next) = next {
                adapter.set_model(&next);
                if adapter.model() == next {
                    info!(from = %model, to = %next, "Switching to fallback model");
                    continue;
                }
            }

            retries += 1;
            if retries > self.policy.max_retries {
                warn!(model = %model, "Retry budget exhausted");
                return Self::failed(error, attempts, start, model);
            }

            let delay = self.policy.delay_for_attempt(retries - 1);
            info!(
                model = %model,
                retry = retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Backing off before retry"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn call_once(
        &self,
        adapter: &dyn ChatAdapter,
        request: ChatRequest<'_>,
        context: &ConversationContext,
    ) -> Result<String, ChatError> {
        let call = request.dispatch(adapter, context);
        match self.policy.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ChatError::Timeout(limit))?,
            None => call.await,
        }
    }

    fn failed(
        error: ChatError,
        attempts: Vec<CallAttempt>,
        start: Instant,
        final_model: String,
    ) -> CallOutcome {
        CallOutcome {
            result: Err(error.into_classified()),
            attempts,
            duration: start.elapsed(),
            final_model,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
