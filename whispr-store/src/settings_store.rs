//! User preferences store.
//!
//! Manages user settings with validation and persistence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use whispr_core::ProviderKind;

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, remove_file_if_exists, save_json};

/// Upper bound accepted for `max_retries`.
pub const MAX_RETRIES_LIMIT: u32 = 10;

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Provider used when none is given explicitly.
    pub active_provider: ProviderKind,

    /// Per-provider overrides.
    pub provider_settings: BTreeMap<ProviderKind, ProviderSettings>,

    /// Backoff retries after model fallback is exhausted.
    pub max_retries: u32,

    /// Walk to the next supported model on transient failures.
    pub model_fallback: bool,

    /// Per-request transport timeout.
    pub request_timeout_secs: u64,

    /// Default log level when neither `--verbose` nor `WHISPR_LOG` is given.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            active_provider: ProviderKind::Gemini,
            provider_settings: BTreeMap::new(),
            max_retries: 3,
            model_fallback: true,
            request_timeout_secs: 60,
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// Returns the overrides for a provider, or empty ones.
    pub fn provider(&self, kind: ProviderKind) -> ProviderSettings {
        self.provider_settings.get(&kind).cloned().unwrap_or_default()
    }

    /// Returns the preferred model for a provider, if set.
    pub fn model_for(&self, kind: ProviderKind) -> Option<&str> {
        self.provider_settings.get(&kind)?.model.as_deref()
    }

    /// Returns the custom system prompt for a provider, if set.
    pub fn custom_system_prompt_for(&self, kind: ProviderKind) -> Option<&str> {
        self.provider_settings
            .get(&kind)?
            .custom_system_prompt
            .as_deref()
    }

    /// Checks numeric fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSetting` naming the first bad field.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(StoreError::InvalidSetting(format!(
                "max_retries must be at most {MAX_RETRIES_LIMIT}, got {}",
                self.max_retries
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(StoreError::InvalidSetting(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn provider_entry(&mut self, kind: ProviderKind) -> &mut ProviderSettings {
        self.provider_settings.entry(kind).or_default()
    }

    /// Drops provider entries with nothing set.
    fn prune(&mut self) {
        self.provider_settings.retain(|_, p| !p.is_empty());
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl LogLevel {
    /// All levels, quietest first.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    /// Directive name understood by `tracing` filters.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == wanted)
            .ok_or_else(|| {
                StoreError::InvalidSetting(format!(
                    "unknown log level '{s}', expected one of: error, warn, info, debug, trace"
                ))
            })
    }
}

/// Per-provider settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Preferred model. Must be one of the provider's supported models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Replaces the built-in persona prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_system_prompt: Option<String>,
}

impl ProviderSettings {
    /// Returns true if no override is set.
    pub fn is_empty(&self) -> bool {
        self.model.is_none() && self.custom_system_prompt.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store.
pub struct SettingsStore {
    settings: RwLock<Settings>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store with default settings backed by `path`.
    pub fn new(path: PathBuf) -> Self {
        Self::with_settings(path, Settings::default())
    }

    fn with_settings(path: PathBuf, settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
            path,
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Currently infallible; corrupt files fall back to defaults.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// Missing, corrupt, or out-of-range files yield defaults.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible for callers that propagate.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            match load_json::<Settings>(&path).await.and_then(|s| {
                s.validate()?;
                Ok(s)
            }) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(error = %e, "Failed to load settings, using defaults");
                    Settings::default()
                }
            }
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Ok(Self::with_settings(path, settings))
    }

    /// Path the store saves to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings in memory. Call [`save`](Self::save) to persist.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        f(&mut settings);
        settings.prune();
    }

    /// Applies `f` only if the result validates.
    ///
    /// # Errors
    ///
    /// Returns the validation error; settings are left untouched.
    pub async fn try_update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        let mut candidate = settings.clone();
        f(&mut candidate);
        candidate.validate()?;
        candidate.prune();
        *settings = candidate;
        Ok(())
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Restores defaults and removes the file.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be removed.
    pub async fn reset(&self) -> Result<(), StoreError> {
        *self.settings.write().await = Settings::default();
        remove_file_if_exists(&self.path).await?;
        info!(path = %self.path.display(), "Settings reset");
        Ok(())
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Returns the active provider.
    pub async fn active_provider(&self) -> ProviderKind {
        self.settings.read().await.active_provider
    }

    /// Sets the active provider.
    pub async fn set_active_provider(&self, kind: ProviderKind) {
        self.update(|s| s.active_provider = kind).await;
    }

    /// Returns the overrides for a provider.
    pub async fn provider_settings(&self, kind: ProviderKind) -> ProviderSettings {
        self.settings.read().await.provider(kind)
    }

    /// Sets or clears the preferred model for a provider.
    ///
    /// The caller checks the name against the provider's supported models.
    pub async fn set_model(&self, kind: ProviderKind, model: Option<String>) {
        let model = non_blank(model);
        self.update(|s| s.provider_entry(kind).model = model).await;
    }

    /// Sets or clears the custom system prompt for a provider.
    /// Blank prompts clear the override.
    pub async fn set_custom_system_prompt(&self, kind: ProviderKind, prompt: Option<String>) {
        let prompt = non_blank(prompt);
        self.update(|s| s.provider_entry(kind).custom_system_prompt = prompt)
            .await;
    }

    /// Sets the retry budget.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSetting` above [`MAX_RETRIES_LIMIT`].
    pub async fn set_max_retries(&self, max_retries: u32) -> Result<(), StoreError> {
        self.try_update(|s| s.max_retries = max_retries).await
    }

    /// Enables or disables model fallback.
    pub async fn set_model_fallback(&self, enabled: bool) {
        self.update(|s| s.model_fallback = enabled).await;
    }

    /// Sets the request timeout.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSetting` for zero.
    pub async fn set_request_timeout_secs(&self, secs: u64) -> Result<(), StoreError> {
        self.try_update(|s| s.request_timeout_secs = secs).await
    }

    /// Sets the default log level.
    pub async fn set_log_level(&self, level: LogLevel) {
        self.update(|s| s.log_level = level).await;
    }
}

// ============================================================================
// Tests
// ============================================================================
