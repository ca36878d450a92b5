//! Messages API request and response bodies.

use serde::{Deserialize, Serialize};
use whispr_fetch::ChatError;

/// Output token cap sent with every request.
pub(crate) const MAX_TOKENS: u32 = 4096;

// ============================================================================
// Request
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Message<'a> {
    pub role: &'static str,
    pub content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum MessageContent<'a> {
    Text(&'a str),
    Blocks(Vec<ContentBlock<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentBlock<'a> {
    Image { source: Base64Source<'a> },
    Document { source: Base64Source<'a> },
    Text { text: String },
}

#[derive(Debug, Serialize)]
pub(crate) struct Base64Source<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub media_type: &'a str,
    pub data: &'a str,
}

impl<'a> Base64Source<'a> {
    pub fn new(media_type: &'a str, data: &'a str) -> Self {
        Self {
            kind: "base64",
            media_type,
            data,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessagesResponse {
    /// Concatenates all `text` blocks.
    pub fn into_text(self) -> Result<String, ChatError> {
        if self.content.is_empty() {
            return Err(ChatError::InvalidResponse(
                "Response has no content blocks".to_string(),
            ));
        }
        Ok(self
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blocks_serialize_tagged() {
        let blocks = MessageContent::Blocks(vec![
            ContentBlock::Image {
                source: Base64Source::new("image/png", "AAAA"),
            },
            ContentBlock::Text {
                text: "what is this".to_string(),
            },
        ]);
        assert_eq!(
            serde_json::to_value(&blocks).unwrap(),
            json!([
                {"type": "image", "source": {"type": "base64", "media_type": "image/png", "data": "AAAA"}},
                {"type": "text", "text": "what is this"}
            ])
        );
        assert_eq!(
            serde_json::to_value(MessageContent::Text("hi")).unwrap(),
            json!("hi")
        );
    }

    #[test]
    fn test_into_text_skips_non_text_blocks() {
        let response: MessagesResponse = serde_json::from_value(json!({
            "content": [
                {"type": "text", "text": "Hello"},
                {"type": "tool_use", "id": "x", "name": "y", "input": {}},
                {"type": "text", "text": " there"}
            ],
            "stop_reason": "end_turn"
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "Hello there");
    }

    #[test]
    fn test_empty_content_is_invalid() {
        let response: MessagesResponse = serde_json::from_value(json!({"content": []})).unwrap();
        assert!(response.into_text().is_err());
    }
}
