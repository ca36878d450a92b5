//! Google Gemini provider.
//!
//! Talks to the Generative Language REST API:
//!
//! - `POST {base}/models/{model}:generateContent`
//! - API key in the `x-goog-api-key` header
//!
//! Gemini receives no structured history. The system prompt, the numbered
//! conversation history and the new message are flattened into one text
//! part; attachments go first as `inline_data` parts.

mod adapter;
mod descriptor;
mod wire;

pub use adapter::{GEMINI_API_BASE, GeminiAdapter};
pub use descriptor::gemini_config;
