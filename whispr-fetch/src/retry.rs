//! Retry policy for chat calls.

use std::time::Duration;

/// Default number of backoff retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Policy for retrying transient failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of backoff retries. Model fallback switches do not
    /// count against this budget.
    pub max_retries: u32,
    /// Delay before the first backoff retry.
    pub base_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Whether to advance to the next supported model on transient failure.
    pub model_fallback: bool,
    /// Optional deadline for each adapter call.
    pub attempt_timeout: Option<Duration>,
}

impl RetryPolicy {
    /// Creates a policy with the given retry budget and default delays.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(1500),
            max_delay: Duration::from_millis(6000),
            model_fallback: true,
            attempt_timeout: None,
        }
    }

    /// Disables retries and model fallback.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            model_fallback: false,
            ..Self::new(0)
        }
    }

    /// Sets the base delay.
    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the maximum delay.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Removes all backoff sleeps. Used by tests and batch callers.
    #[must_use]
    pub fn no_backoff(self) -> Self {
        self.with_base_delay(Duration::ZERO)
            .with_max_delay(Duration::ZERO)
    }

    /// Enables or disables model fallback.
    #[must_use]
    pub fn with_model_fallback(mut self, enabled: bool) -> Self {
        self.model_fallback = enabled;
        self
    }

    /// Bounds each adapter call.
    #[must_use]
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Delay before retry number `attempt` (zero based):
    /// `min(base * 2^attempt, max)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}
