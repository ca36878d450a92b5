//! HTTP client shared by all adapters.

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use crate::error::ChatError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Longest slice of an unparseable body kept in an error message.
const BODY_SNIPPET_LEN: usize = 200;

/// JSON-over-HTTPS client with a per-request timeout.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, ChatError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("whispr/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: client,
            timeout,
        })
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POSTs `body` as JSON and decodes a JSON response.
    ///
    /// Non-success statuses become [`ChatError::Upstream`] carrying the
    /// vendor's error message.
    #[instrument(skip(self, headers, body), fields(url = %url))]
    pub async fn post_json<B, T>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &B,
    ) -> Result<T, ChatError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let start = Instant::now();
        let mut request = self.inner.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        debug!(
            status = status.as_u16(),
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            bytes = text.len(),
            "Received response"
        );

        if !status.is_success() {
            let message = parse_vendor_error(&text).unwrap_or_else(|| {
                format!("API request failed with status {}", status.as_u16())
            });
            warn!(status = status.as_u16(), message = %message, "Upstream returned an error");
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            ChatError::InvalidResponse(format!("{e}: {}", snippet(&text)))
        })
    }

    fn map_send_error(&self, error: reqwest::Error) -> ChatError {
        if error.is_timeout() {
            ChatError::Timeout(self.timeout)
        } else if error.is_connect() {
            ChatError::NetworkUnreachable(error.to_string())
        } else {
            ChatError::Http(error)
        }
    }
}

/// Extracts `error.message` from a vendor error envelope, with the vendor's
/// error type or status appended in parentheses.
///
/// All three wire families wrap errors as `{"error": {"message": ..}}` and
/// carry the category in `type` (Anthropic, `OpenAI`) or `status` (Gemini).
pub fn parse_vendor_error(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;

    let message = match error {
        serde_json::Value::String(s) => return Some(s.clone()),
        _ => error.get("message")?.as_str()?,
    };

    let category = error
        .get("type")
        .or_else(|| error.get("status"))
        .and_then(serde_json::Value::as_str);

    Some(match category {
        Some(category) if !category.is_empty() => format!("{message} ({category})"),
        _ => message.to_string(),
    })
}

fn snippet(text: &str) -> &str {
    match text.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
