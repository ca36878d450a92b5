//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;
use whispr_core::ProviderConfig;
use whispr_store::{LogLevel, SettingsStore, default_config_dir, default_settings_path};

use crate::output::{JsonFormatter, TextFormatter, truncate};
use crate::runtime::provider_config;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set the active provider.
    Provider {
        /// Provider id (gemini, groq, openai, anthropic, openrouter).
        provider: String,
    },

    /// Set the preferred model for a provider.
    Model {
        /// Provider id.
        provider: String,
        /// Model name. Omit to restore the provider default.
        model: Option<String>,
    },

    /// Set the custom system prompt for a provider.
    Prompt {
        /// Provider id.
        provider: String,
        /// Prompt text. Omit to restore the built-in prompt.
        text: Option<String>,
    },

    /// Set retry behavior.
    Retries {
        /// Backoff retries after model fallback (0-10).
        max_retries: u32,
        /// Disable switching to the next model when one is busy.
        #[arg(long)]
        no_fallback: bool,
    },

    /// Set the request timeout in seconds.
    Timeout {
        /// Seconds, greater than zero.
        seconds: u64,
    },

    /// Set the default log level (error, warn, info, debug, trace).
    LogLevel {
        /// Level used when neither --verbose nor WHISPR_LOG is given.
        level: String,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Provider { provider } => set_provider(provider).await,
        ConfigAction::Model { provider, model } => set_model(provider, model.as_deref()).await,
        ConfigAction::Prompt { provider, text } => set_prompt(provider, text.as_deref()).await,
        ConfigAction::Retries {
            max_retries,
            no_fallback,
        } => set_retries(*max_retries, !*no_fallback).await,
        ConfigAction::Timeout { seconds } => set_timeout(*seconds).await,
        ConfigAction::LogLevel { level } => set_log_level(level).await,
        ConfigAction::Reset => reset_config().await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_settings(&settings));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = default_settings_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_provider(id: &str) -> Result<()> {
    let config = provider_config(id)?;

    let store = SettingsStore::load_default().await?;
    store.set_active_provider(config.id).await;
    store.save().await?;

    info!(provider = %config.id, "Active provider updated");
    println!("Active provider: {}", config.display_name);
    Ok(())
}

/// Checks a model name against the provider's list.
pub fn validate_model(config: &ProviderConfig, model: &str) -> Result<()> {
    if config.supports_model(model) {
        Ok(())
    } else {
        anyhow::bail!(
            "{} does not support model '{}'. Choose one of: {}",
            config.display_name,
            model,
            config.supported_models.join(", ")
        )
    }
}

async fn set_model(id: &str, model: Option<&str>) -> Result<()> {
    let config = provider_config(id)?;
    if let Some(model) = model {
        validate_model(config, model)?;
    }

    let store = SettingsStore::load_default().await?;
    store.set_model(config.id, model.map(str::to_string)).await;
    store.save().await?;

    info!(provider = %config.id, model = ?model, "Preferred model updated");
    match model {
        Some(model) => println!("{} model: {model}", config.display_name),
        None => println!("{} model: {} (default)", config.display_name, config.default_model),
    }
    Ok(())
}

async fn set_prompt(id: &str, text: Option<&str>) -> Result<()> {
    let config = provider_config(id)?;

    let store = SettingsStore::load_default().await?;
    store
        .set_custom_system_prompt(config.id, text.map(str::to_string))
        .await;
    store.save().await?;

    info!(provider = %config.id, custom = text.is_some(), "System prompt updated");
    match text.filter(|t| !t.trim().is_empty()) {
        Some(text) => println!("{} prompt: {}", config.display_name, truncate(text, 60)),
        None => println!("{} prompt: built-in", config.display_name),
    }
    Ok(())
}

async fn set_retries(max_retries: u32, model_fallback: bool) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    store.set_max_retries(max_retries).await?;
    store.set_model_fallback(model_fallback).await;
    store.save().await?;

    info!(max_retries, model_fallback, "Retry policy updated");
    println!("Max retries: {max_retries}, model fallback: {model_fallback}");
    Ok(())
}

async fn set_timeout(seconds: u64) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    store.set_request_timeout_secs(seconds).await?;
    store.save().await?;

    info!(seconds, "Request timeout updated");
    println!("Request timeout: {seconds}s");
    Ok(())
}

async fn set_log_level(level: &str) -> Result<()> {
    let level: LogLevel = level.parse()?;

    let store = SettingsStore::load_default().await?;
    store.set_log_level(level).await;
    store.save().await?;

    info!(%level, "Log level updated");
    println!("Log level: {level}");
    Ok(())
}

async fn reset_config() -> Result<()> {
    let store = SettingsStore::load_default().await?;
    let existed = store.path().exists();
    store.reset().await?;

    if existed {
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
