// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Whispr Fetch
//!
//! Transport and call orchestration for the Whispr chat core.
//!
//! ## Adapters
//!
//! - [`adapter::ChatAdapter`] - Trait every provider adapter implements
//! - [`adapter::ChatRequest`] - One logical request (text or multimodal)
//! - [`client::HttpClient`] - JSON POST client with timeout and error parsing
//!
//! ## Errors
//!
//! - [`error::ChatError`] - Error taxonomy returned to callers
//! - [`classify::classify_error`] - Maps vendor error text to an [`ErrorKind`]
//!
//! ## Orchestration
//!
//! - [`retry::RetryPolicy`] - Retry budget, backoff and fallback switches
//! - [`orchestrator::RetryOrchestrator`] - Walks fallback models, then backs off
//!
//! ## Example
//!
//! ```ignore
//! use whispr_fetch::{RetryOrchestrator, RetryPolicy};
//!
//! let orchestrator = RetryOrchestrator::new(RetryPolicy::default());
//! let reply = orchestrator
//!     .generate(adapter.as_mut(), "Hello", &context)
//!     .await?;
//! ```

pub mod adapter;
pub mod classify;
pub mod client;
pub mod error;
pub mod orchestrator;
pub mod retry;

// Re-export key types at crate root
pub use adapter::{ChatAdapter, ChatRequest};
pub use classify::classify_error;
pub use client::{DEFAULT_TIMEOUT_SECS, HttpClient, parse_vendor_error};
pub use error::{ChatError, ErrorKind};
pub use orchestrator::{CallAttempt, CallOutcome, RetryOrchestrator};
pub use retry::{DEFAULT_MAX_RETRIES, RetryPolicy};
