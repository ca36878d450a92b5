// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Whispr Store
//!
//! Settings and credential storage for Whispr.
//!
//! This crate provides:
//!
//! - **SettingsStore**: User preferences with persistence and change notification
//! - **Credentials**: Keychain, environment, and in-memory [`CredentialStore`]s
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use whispr_store::{EnvCredentialStore, KeychainCredentialStore, SettingsStore, resolve_credential};
//!
//! let settings = SettingsStore::load_default().await?;
//! let provider = settings.active_provider().await;
//!
//! let env = EnvCredentialStore::new(vars);
//! let keychain = KeychainCredentialStore::new();
//! let key = resolve_credential(provider, &[&env, &keychain]);
//! ```
//!
//! [`CredentialStore`]: whispr_core::CredentialStore

pub mod credentials;
pub mod error;
pub mod persistence;
pub mod settings_store;

pub use credentials::{
    EnvCredentialStore, KeychainCredentialStore, MemoryCredentialStore, keychain_service,
    resolve_credential,
};
pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_settings_path, load_json, load_json_or_default, save_json,
};
pub use settings_store::{LogLevel, ProviderSettings, Settings, SettingsStore};

#[cfg(test)]
mod persistence_tests;
