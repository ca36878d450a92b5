//! Error message classification.
//!
//! Vendors report failures as free-form text. Every adapter funnels its
//! error strings through [`classify_error`] so retry decisions and user
//! messages stay consistent across providers.

use crate::error::ErrorKind;

/// Ordered rules; the first rule with a matching needle wins.
const RULES: &[(ErrorKind, &[&str])] = &[
    (ErrorKind::Transient, &["503", "overloaded", "unavailable"]),
    (
        ErrorKind::Quota,
        &["quota", "billing", "insufficient_quota", "credit balance"],
    ),
    (
        ErrorKind::Auth,
        &[
            "api key",
            "api_key",
            "x-api-key",
            "401",
            "unauthorized",
            "authentication",
            "permission",
            "403",
            "forbidden",
        ],
    ),
    (
        ErrorKind::UnsupportedContent,
        &[
            "invalid_argument",
            "unsupported",
            "could not process image",
            "invalid image",
            "media type",
        ],
    ),
    (
        ErrorKind::Transient,
        &[
            "429",
            "rate limit",
            "rate_limit",
            "too many requests",
            "resource_exhausted",
            "529",
        ],
    ),
    (
        ErrorKind::Network,
        &[
            "enotfound",
            "network",
            "dns",
            "connection refused",
            "error sending request",
        ],
    ),
];

/// Classifies an error message (case-insensitive).
pub fn classify_error(message: &str) -> ErrorKind {
    let haystack = message.to_lowercase();
    RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| haystack.contains(n)))
        .map_or(ErrorKind::Other, |(kind, _)| *kind)
}
