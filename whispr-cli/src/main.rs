// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Whispr CLI - chat with LLM providers from the command line.
//!
//! # Examples
//!
//! ```bash
//! # List providers
//! whispr providers
//!
//! # One-shot question with the active provider
//! whispr chat "What is a borrow checker?"
//!
//! # Attach files, pick a provider and model
//! whispr chat "Summarize this" --attach report.pdf --provider anthropic
//!
//! # Interactive session
//! whispr chat
//!
//! # Store an API key in the system keychain
//! whispr key set groq
//!
//! # JSON output
//! whispr --format json --pretty chat "hello"
//! ```

mod commands;
mod output;
mod runtime;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use whispr_fetch::{ChatError, ErrorKind};
use whispr_store::{LogLevel, SettingsStore};

use commands::{chat, config, key, providers};

// ============================================================================
// CLI Definition
// ============================================================================

/// Whispr CLI - multi-provider LLM chat.
#[derive(Parser)]
#[command(name = "whispr")]
#[command(about = "Multi-provider LLM chat from the terminal")]
#[command(long_about = r#"
Whispr sends your messages to an LLM provider, keeping the last few
exchanges as context and falling back to other models when one is busy.

Supported providers:
  • Google Gemini (gemini)
  • Groq (groq)
  • OpenAI (openai)
  • Anthropic (anthropic)
  • OpenRouter (openrouter)

Examples:
  whispr providers                         # List providers and key status
  whispr chat "hello"                      # One-shot message
  whispr chat --attach photo.jpg "what?"   # Message with a file
  whispr chat                              # Interactive session
  whispr key set openai                    # Store an API key
"#)]
#[command(version)]
#[command(author = "Whispr Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List available providers.
    #[command(visible_alias = "p")]
    Providers,

    /// Send a message, or start an interactive session.
    #[command(visible_alias = "c")]
    Chat(chat::ChatArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),

    /// Manage API keys in the system keychain.
    Key(key::KeyArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Unknown provider or missing API key.
    Configuration = 2,
    /// Rejected key, permissions, or billing.
    Auth = 3,
    /// Provider busy, unreachable, or too slow.
    Unavailable = 4,
}

impl ExitCode {
    /// Picks the exit code for a failed command.
    pub fn for_error(err: &anyhow::Error) -> Self {
        let Some(chat) = err.downcast_ref::<ChatError>() else {
            return Self::Error;
        };
        match chat.kind() {
            ErrorKind::Configuration => Self::Configuration,
            ErrorKind::Auth | ErrorKind::Quota => Self::Auth,
            ErrorKind::Transient | ErrorKind::Network | ErrorKind::Timeout => Self::Unavailable,
            ErrorKind::UnsupportedContent | ErrorKind::Other => Self::Error,
        }
    }
}

/// Renders an error with its full context chain.
fn error_report(err: &anyhow::Error) -> String {
    format!("{err:#}")
}

// ============================================================================
// Logging Setup
// ============================================================================

/// Environment variable that overrides the configured log level.
const LOG_ENV: &str = "WHISPR_LOG";

/// Picks the filter directive: `--verbose`, then `WHISPR_LOG`, then settings.
fn log_directive(verbose: bool, env: Option<String>, configured: LogLevel) -> String {
    if verbose {
        return "whispr=debug,info".to_string();
    }
    env.filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| format!("whispr={configured}"))
}

fn setup_logging(verbose: bool, quiet: bool, configured: LogLevel) {
    if quiet {
        return;
    }

    let directive = log_directive(verbose, std::env::var(LOG_ENV).ok(), configured);
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(format!("whispr={configured}")));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let configured = match SettingsStore::load_default().await {
        Ok(store) => store.get().await.log_level,
        Err(_) => LogLevel::default(),
    };
    setup_logging(cli.verbose, cli.quiet, configured);

    let result = match &cli.command {
        Commands::Providers => providers::run(&cli).await,
        Commands::Chat(args) => chat::run(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli).await,
        Commands::Key(args) => key::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {}", error_report(&e));
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
