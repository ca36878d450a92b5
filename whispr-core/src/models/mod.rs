//! Domain models for Whispr.
//!
//! ## Submodules
//!
//! - [`provider`] - Provider types (ProviderKind, WireFamily, ProviderConfig, ApiKey)
//! - [`conversation`] - Conversation types (ConversationTurn, ConversationContext)
//! - [`attachment`] - Inline file attachments

mod attachment;
mod conversation;
mod provider;

// Re-export everything at the models level
pub use attachment::{Attachment, mime_type_for_path};
pub use conversation::{CONTEXT_CAPACITY, ConversationContext, ConversationTurn};
pub use provider::{ApiKey, ProviderConfig, ProviderKind, WireFamily};
#[cfg(test)]
mod serde_tests;
