// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `Whispr` Core
//!
//! Core types, models, and traits for the `Whispr` chat client.
//!
//! This crate provides the foundational abstractions used across all other
//! `Whispr` crates, including:
//!
//! - Domain models (providers, conversation turns, attachments)
//! - Error types
//! - Trait definitions for external collaborators (credential storage)
//!
//! ## Key Types
//!
//! ### Provider Types
//! - [`ProviderKind`] - Enum of all supported LLM providers
//! - [`WireFamily`] - The request/response format a provider speaks
//! - [`ProviderConfig`] - Static provider configuration
//! - [`ApiKey`] - Secret credential with redacted `Debug`
//!
//! ### Conversation Types
//! - [`ConversationTurn`] - One user/assistant exchange
//! - [`ConversationContext`] - Bounded window of recent turns
//! - [`Attachment`] - Inline file sent with a single request

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Provider types
    ApiKey,
    ProviderConfig,
    ProviderKind,
    WireFamily,
    // Conversation types
    CONTEXT_CAPACITY,
    ConversationContext,
    ConversationTurn,
    // Attachments
    Attachment,
    mime_type_for_path,
};

// Re-export traits
pub use traits::CredentialStore;
