//! Key command - manage API keys in the system keychain.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::io::Write as _;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use whispr_core::{ApiKey, CredentialStore};
use whispr_providers::list_providers;
use whispr_store::{KeychainCredentialStore, keychain_service};

use crate::runtime::{credential_source, env_store, provider_config};
use crate::{Cli, OutputFormat};

/// Arguments for the key command.
#[derive(Args)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub action: KeyAction,
}

/// Key subcommands.
#[derive(Subcommand)]
pub enum KeyAction {
    /// Store an API key. Reads from stdin when no value is given.
    Set {
        /// Provider id.
        provider: String,
        /// The key. Prefer stdin so it stays out of shell history.
        #[arg(long)]
        value: Option<String>,
    },

    /// Remove a stored API key.
    Delete {
        /// Provider id.
        provider: String,
    },

    /// Show where each provider's key comes from.
    Status,
}

/// Runs the key command.
pub async fn run(args: &KeyArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        KeyAction::Set { provider, value } => set_key(provider, value.as_deref(), cli).await,
        KeyAction::Delete { provider } => delete_key(provider),
        KeyAction::Status => show_status(cli),
    }
}

async fn read_key_from_stdin(prompt: &str, quiet: bool) -> Result<String> {
    if !quiet {
        eprint!("{prompt}");
        let _ = std::io::stderr().flush();
    }
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read key from stdin")?;
    Ok(line)
}

async fn set_key(id: &str, value: Option<&str>, cli: &Cli) -> Result<()> {
    let config = provider_config(id)?;

    let raw = match value {
        Some(value) => value.to_string(),
        None => {
            read_key_from_stdin(&format!("{} API key: ", config.display_name), cli.quiet).await?
        }
    };
    let key = ApiKey::new(raw);
    if key.is_empty() {
        anyhow::bail!("No key given for {}", config.display_name);
    }

    KeychainCredentialStore::new()
        .set_credential(config.id, &key)
        .with_context(|| format!("Failed to store key in keychain service {}", keychain_service(config.id)))?;

    info!(provider = %config.id, "API key stored");
    println!("Stored {} key {}", config.display_name, key.masked());

    if env_store().has_credential(config.id) {
        eprintln!(
            "Note: {} is set and takes precedence over the keychain.",
            config.credential_env_var
        );
    }
    Ok(())
}

fn delete_key(id: &str) -> Result<()> {
    let config = provider_config(id)?;

    KeychainCredentialStore::new()
        .delete_credential(config.id)
        .context("Failed to delete key from keychain")?;

    info!(provider = %config.id, "API key deleted");
    println!("Removed {} key from keychain", config.display_name);
    Ok(())
}

fn show_status(cli: &Cli) -> Result<()> {
    let rows: Vec<_> = list_providers()
        .iter()
        .map(|c| (c, credential_source(c.id)))
        .collect();

    match cli.format {
        OutputFormat::Text => {
            for (config, source) in &rows {
                println!(
                    "{:<16} {:<9} ({})",
                    config.display_name,
                    source.label(),
                    config.credential_env_var
                );
            }
        }
        OutputFormat::Json => {
            let status: serde_json::Map<String, serde_json::Value> = rows
                .iter()
                .map(|(c, s)| (c.id.to_string(), serde_json::Value::from(s.label())))
                .collect();
            let formatter = crate::output::JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&status)?);
        }
    }
    Ok(())
}
