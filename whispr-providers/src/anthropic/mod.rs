//! Anthropic provider (Messages API).
//!
//! - `POST {endpoint}/messages`
//! - Headers: `x-api-key`, `anthropic-version: 2023-06-01`
//!
//! The system prompt travels in the top-level `system` field. Multimodal
//! turns send image blocks, then PDF document blocks, then one text block.

mod adapter;
mod descriptor;
mod wire;

pub use adapter::{ANTHROPIC_VERSION, AnthropicAdapter};
pub use descriptor::anthropic_config;
