//! Chat completions request and response bodies.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use whispr_fetch::{ChatError, parse_vendor_error};

/// Output token cap sent with every request.
pub(crate) const MAX_TOKENS: u32 = 4096;

// ============================================================================
// Request
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: ChatContent<'a>,
}

impl<'a> ChatMessage<'a> {
    pub fn text(role: &'static str, text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            role,
            content: ChatContent::Text(text.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum ChatContent<'a> {
    Text(Cow<'a, str>),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart {
    ImageUrl { image_url: ImageUrl },
    Text { text: String },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
}

impl ImageUrl {
    /// Builds a `data:` URL from base64 content.
    pub fn data(mime_type: &str, base64_data: &str) -> Self {
        Self {
            url: format!("data:{mime_type};base64,{base64_data}"),
        }
    }
}

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Some gateways report failures inside a 200 response.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Returns `choices[0].message.content`.
    pub fn into_text(self) -> Result<String, ChatError> {
        if let Some(error) = self.error {
            let status = error
                .get("code")
                .and_then(serde_json::Value::as_u64)
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(502);
            let envelope = serde_json::json!({ "error": error }).to_string();
            let message = parse_vendor_error(&envelope)
                .unwrap_or_else(|| "Provider returned an error".to_string());
            return Err(ChatError::Upstream { status, message });
        }

        self.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| ChatError::InvalidResponse("Response has no choices".to_string()))
    }
}
