//! OpenAI-compatible providers: Groq, `OpenAI` and `OpenRouter`.
//!
//! - `POST {endpoint}/chat/completions`
//! - `Authorization: Bearer <key>` plus any configured extra headers
//!
//! The system prompt is the first message. Images are sent as `image_url`
//! parts carrying `data:` URLs; other files are named in the text part.

mod adapter;
mod descriptor;
mod wire;

pub use adapter::ChatCompletionsAdapter;
pub use descriptor::{groq_config, openai_config, openrouter_config};
