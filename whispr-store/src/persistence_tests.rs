//! Persistence round-trip and edge case tests.
//!
//! Tests file I/O operations, JSON persistence, and settings round-trip.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::persistence::{load_json, load_json_or_default, save_json};
use crate::settings_store::{LogLevel, ProviderSettings, Settings, SettingsStore};
use whispr_core::ProviderKind;

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_load_json_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.json");

    let settings = Settings::default();
    save_json(&file_path, &settings).await.unwrap();

    let loaded: Settings = load_json(&file_path).await.unwrap();
    assert_eq!(loaded, settings);
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("test.json");

    save_json(&nested_path, &serde_json::json!({"key": "value"}))
        .await
        .unwrap();
    assert!(nested_path.exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/settings.json");

    let result: Result<Settings, _> = load_json(&file_path).await;
    assert!(result.unwrap_err().is_not_found());

    let fallback: Settings = load_json_or_default(&file_path).await;
    assert_eq!(fallback, Settings::default());
}

#[tokio::test]
async fn test_atomic_write_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    save_json(&file_path, &Settings::default()).await.unwrap();
    save_json(&file_path, &Settings::default()).await.unwrap();

    assert!(!temp_dir.path().join("settings.json.tmp").exists());
}

// ============================================================================
// Settings Round-trip Tests
// ============================================================================

#[tokio::test]
async fn test_settings_full_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let mut settings = Settings {
        active_provider: ProviderKind::OpenRouter,
        max_retries: 5,
        model_fallback: false,
        request_timeout_secs: 90,
        log_level: LogLevel::Debug,
        ..Settings::default()
    };
    settings.provider_settings.insert(
        ProviderKind::Anthropic,
        ProviderSettings {
            model: Some("claude-3-5-haiku-20241022".to_string()),
            custom_system_prompt: Some("You answer in haiku.".to_string()),
        },
    );

    save_json(&file_path, &settings).await.unwrap();
    let loaded: Settings = load_json(&file_path).await.unwrap();
    assert_eq!(loaded, settings);

    let raw = tokio::fs::read_to_string(&file_path).await.unwrap();
    assert!(raw.contains("\"anthropic\""));
    assert!(raw.contains("\"debug\""));
}

#[tokio::test]
async fn test_settings_all_log_levels() {
    let temp_dir = TempDir::new().unwrap();

    for level in [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ] {
        let file_path = temp_dir.path().join(format!("settings_{level}.json"));
        let settings = Settings {
            log_level: level,
            ..Settings::default()
        };
        save_json(&file_path, &settings).await.unwrap();
        let loaded: Settings = load_json(&file_path).await.unwrap();
        assert_eq!(loaded.log_level, level);
    }
}

#[tokio::test]
async fn test_load_json_with_unknown_fields() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(
        &file_path,
        r#"{"active_provider": "groq", "theme": "dark", "window": {"w": 800}}"#,
    )
    .await
    .unwrap();

    let loaded: Settings = load_json(&file_path).await.unwrap();
    assert_eq!(loaded.active_provider, ProviderKind::Groq);
}

#[tokio::test]
async fn test_unicode_in_settings() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let mut settings = Settings::default();
    settings.provider_settings.insert(
        ProviderKind::Gemini,
        ProviderSettings {
            model: None,
            custom_system_prompt: Some("Sumagot sa Tagalog 🇵🇭, salamat!".to_string()),
        },
    );

    save_json(&file_path, &settings).await.unwrap();
    let loaded: Settings = load_json(&file_path).await.unwrap();
    assert_eq!(
        loaded.custom_system_prompt_for(ProviderKind::Gemini),
        Some("Sumagot sa Tagalog 🇵🇭, salamat!")
    );
}

// ============================================================================
// Store Load Tests
// ============================================================================

#[tokio::test]
async fn test_store_save_then_load() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let store = SettingsStore::new(file_path.clone());
    store.set_active_provider(ProviderKind::Anthropic).await;
    store
        .set_model(ProviderKind::Anthropic, Some("claude-3-opus-20240229".into()))
        .await;
    store.save().await.unwrap();

    let reloaded = SettingsStore::load(file_path).await.unwrap();
    let settings = reloaded.get().await;
    assert_eq!(settings.active_provider, ProviderKind::Anthropic);
    assert_eq!(
        settings.model_for(ProviderKind::Anthropic),
        Some("claude-3-opus-20240229")
    );
}

#[tokio::test]
async fn test_store_load_corrupt_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, "{not json").await.unwrap();

    let store = SettingsStore::load(file_path).await.unwrap();
    assert_eq!(store.get().await, Settings::default());
}

#[tokio::test]
async fn test_store_load_out_of_range_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, r#"{"max_retries": 99}"#)
        .await
        .unwrap();

    let store = SettingsStore::load(file_path).await.unwrap();
    assert_eq!(store.get().await.max_retries, 3);
}
