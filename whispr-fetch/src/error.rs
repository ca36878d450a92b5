//! Chat error types.
//!
//! Adapters report raw failures ([`ChatError::Upstream`], [`ChatError::Http`]).
//! The orchestrator turns them into the user-facing taxonomy with
//! [`ChatError::into_classified`] before handing them to the caller.

use std::time::Duration;
use thiserror::Error;

use crate::classify::classify_error;

// ============================================================================
// Error Kind
// ============================================================================

/// Coarse classification used for retry decisions and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Overloaded, unavailable or rate limited; worth retrying.
    Transient,
    /// Credential rejected or permission denied.
    Auth,
    /// Quota or billing exhausted.
    Quota,
    /// Attachment content or format rejected.
    UnsupportedContent,
    /// DNS/connection failure.
    Network,
    /// Request exceeded its deadline.
    Timeout,
    /// Unknown provider or missing credential.
    Configuration,
    /// Anything else.
    Other,
}

impl ErrorKind {
    /// Returns true if the orchestrator may retry this kind.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Transient)
    }

    /// Stable snake_case label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transient => "transient",
            Self::Auth => "auth",
            Self::Quota => "quota",
            Self::UnsupportedContent => "unsupported_content",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Configuration => "configuration",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Chat Error
// ============================================================================

/// Error type for chat operations.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Requested provider id is not registered.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// No credential configured for the provider.
    #[error("No API key configured for {0}")]
    MissingCredential(String),

    /// Non-success response from the vendor, not yet classified.
    #[error("AI service error ({status}): {message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Vendor error message.
        message: String,
    },

    /// Service overloaded, unavailable or rate limited after all retries.
    #[error("AI service is temporarily unavailable: {0}")]
    TransientUpstream(String),

    /// Vendor rejected the credential.
    #[error("Invalid API key - please check your API key ({0})")]
    AuthUpstream(String),

    /// Vendor reported quota or billing exhaustion.
    #[error("API quota exceeded - please check your plan and billing ({0})")]
    QuotaUpstream(String),

    /// Vendor rejected attachment content.
    #[error("File format not supported by AI - try a different file type ({0})")]
    UnsupportedContent(String),

    /// DNS or connection failure.
    #[error("Network error - please check your internet connection ({0})")]
    NetworkUnreachable(String),

    /// Request exceeded its deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Response could not be interpreted.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChatError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownProvider(_) | Self::MissingCredential(_) => ErrorKind::Configuration,
            Self::Upstream { status, message } => classify_error(&format!("{status} {message}")),
            Self::TransientUpstream(_) => ErrorKind::Transient,
            Self::AuthUpstream(_) => ErrorKind::Auth,
            Self::QuotaUpstream(_) => ErrorKind::Quota,
            Self::UnsupportedContent(_) => ErrorKind::UnsupportedContent,
            Self::NetworkUnreachable(_) => ErrorKind::Network,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Http(e) => {
                if e.is_timeout() {
                    ErrorKind::Timeout
                } else if e.is_connect() {
                    ErrorKind::Network
                } else {
                    classify_error(&e.to_string())
                }
            }
            Self::InvalidResponse(_) | Self::Json(_) => ErrorKind::Other,
        }
    }

    /// Returns true if the orchestrator may retry this error.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Converts a raw adapter failure into the matching taxonomy variant.
    ///
    /// Errors that are already classified, and raw errors that classify as
    /// [`ErrorKind::Other`], are returned unchanged.
    #[must_use]
    pub fn into_classified(self) -> Self {
        let message = match &self {
            Self::Upstream { message, .. } => message.clone(),
            Self::Http(e) => e.to_string(),
            _ => return self,
        };

        match self.kind() {
            ErrorKind::Transient => Self::TransientUpstream(message),
            ErrorKind::Auth => Self::AuthUpstream(message),
            ErrorKind::Quota => Self::QuotaUpstream(message),
            ErrorKind::UnsupportedContent => Self::UnsupportedContent(message),
            ErrorKind::Network => Self::NetworkUnreachable(message),
            ErrorKind::Timeout | ErrorKind::Configuration | ErrorKind::Other => self,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
