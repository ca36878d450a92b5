//! Chat command - one-shot messages and the interactive session.

use anyhow::Result;
use clap::Args;
use std::future::Future;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use whispr_core::Attachment;
use whispr_fetch::CallOutcome;
use whispr_providers::ChatSession;
use whispr_store::{Settings, SettingsStore};

use crate::output::{ChatOutput, JsonFormatter, TextFormatter};
use crate::runtime::{
    AdapterOverrides, apply_model, build_adapter, build_session, load_attachment,
    load_attachments,
};
use crate::{Cli, OutputFormat};

/// Arguments for the chat command.
#[derive(Args, Debug, Default)]
pub struct ChatArgs {
    /// Message to send. Starts an interactive session when omitted.
    pub message: Vec<String>,

    /// File to attach (repeatable).
    #[arg(long = "attach", short = 'a', value_name = "FILE")]
    pub attach: Vec<PathBuf>,

    /// Provider to use instead of the active one.
    #[arg(long, short = 'p')]
    pub provider: Option<String>,

    /// Model to use instead of the provider default.
    #[arg(long, short = 'm')]
    pub model: Option<String>,

    /// Custom system prompt for this session.
    #[arg(long = "system-prompt", short = 's', value_name = "TEXT")]
    pub system_prompt: Option<String>,

    /// Show the model, attempts, and timing after each reply.
    #[arg(long)]
    pub stats: bool,
}

/// Runs the chat command.
pub async fn run(args: &ChatArgs, cli: &Cli) -> Result<()> {
    let settings = SettingsStore::load_default().await?.get().await;
    let overrides = AdapterOverrides {
        provider: args.provider.as_deref(),
        model: args.model.as_deref(),
        system_prompt: args.system_prompt.as_deref(),
    };
    let session = build_session(&settings, &overrides)?;
    let attachments = load_attachments(&args.attach).await?;
    let message = args.message.join(" ");

    if message.trim().is_empty() && attachments.is_empty() {
        interactive(session, &settings, attachments, args, cli).await
    } else {
        one_shot(session, &message, &attachments, args, cli).await
    }
}

// ============================================================================
// One-shot
// ============================================================================

async fn one_shot(
    mut session: ChatSession,
    message: &str,
    attachments: &[Attachment],
    args: &ChatArgs,
    cli: &Cli,
) -> Result<()> {
    info!(files = attachments.len(), "Sending message");
    let outcome = session.execute(message, attachments).await;
    let provider = session.adapter().kind().to_string();

    match cli.format {
        OutputFormat::Text => {
            if let Ok(reply) = &outcome.result {
                let formatter = TextFormatter::new(!cli.no_color);
                println!("{}", formatter.format_reply(reply, &outcome, args.stats || cli.verbose));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&ChatOutput::new(&provider, &outcome))?);
        }
    }

    outcome.result.map(|_| ()).map_err(Into::into)
}

// ============================================================================
// Interactive Session
// ============================================================================

/// One parsed line of interactive input.
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    /// Blank line.
    Empty,
    /// Text to send.
    Message(&'a str),
    /// Slash command.
    Command(ReplCommand<'a>),
}

/// Slash commands available in interactive mode.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    /// List commands.
    Help,
    /// Leave the session.
    Exit,
    /// Forget the conversation.
    Reset,
    /// Show the conversation window.
    History,
    /// Show models, or switch to one.
    Model(Option<&'a str>),
    /// Switch provider.
    Provider(Option<&'a str>),
    /// Set or clear the custom system prompt.
    Prompt(Option<&'a str>),
    /// Queue a file for the next message.
    Attach(Option<&'a str>),
    /// Anything unrecognized.
    Unknown(&'a str),
}

const HELP: &str = "\
/help               Show this help
/exit, /quit        Leave the session
/reset              Forget the conversation
/history            Show the conversation window
/model [NAME]       List models or switch model
/provider ID        Switch provider (history is kept)
/prompt [TEXT]      Set the system prompt; no text restores the default
/attach PATH        Attach a file to the next message";

/// Parses a line of interactive input.
pub fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Message(line);
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, Some(rest.trim()).filter(|r| !r.is_empty())),
        None => (command, None),
    };

    Input::Command(match name.to_ascii_lowercase().as_str() {
        "help" | "?" => ReplCommand::Help,
        "exit" | "quit" | "q" => ReplCommand::Exit,
        "reset" | "clear" => ReplCommand::Reset,
        "history" => ReplCommand::History,
        "model" => ReplCommand::Model(rest),
        "provider" => ReplCommand::Provider(rest),
        "prompt" => ReplCommand::Prompt(rest),
        "attach" => ReplCommand::Attach(rest),
        _ => ReplCommand::Unknown(name),
    })
}

async fn interactive(
    mut session: ChatSession,
    settings: &Settings,
    mut pending: Vec<Attachment>,
    args: &ChatArgs,
    cli: &Cli,
) -> Result<()> {
    let formatter = TextFormatter::new(!cli.no_color);
    let json = JsonFormatter::new(cli.pretty);
    let show_stats = args.stats || cli.verbose;

    if !cli.quiet {
        eprintln!(
            "Chatting with {} ({}). Type /help for commands, /exit to leave.",
            session.adapter().config().display_name,
            session.adapter().model()
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if !cli.quiet {
            eprint!(
                "{}",
                formatter.format_prompt(session.adapter().kind().id(), pending.len())
            );
            let _ = std::io::stderr().flush();
        }

        let Some(read) = until_cancelled(lines.next_line(), tokio::signal::ctrl_c()).await else {
            eprintln!();
            break;
        };
        let Some(line) = read? else {
            break;
        };

        let text = match parse_input(&line) {
            Input::Empty => continue,
            Input::Message(text) => text,
            Input::Command(ReplCommand::Exit) => break,
            Input::Command(command) => {
                handle_command(command, &mut session, settings, &mut pending, &formatter).await;
                continue;
            }
        };

        let Some(outcome) =
            send_turn(&mut session, text, &mut pending, tokio::signal::ctrl_c()).await
        else {
            eprintln!("(cancelled)");
            continue;
        };

        print_outcome(&session, &outcome, &formatter, &json, show_stats, cli)?;
    }

    info!(turns = session.context().len(), "Session ended");
    Ok(())
}

/// Runs `work` unless `cancel` completes first. `None` means cancelled.
async fn until_cancelled<T>(work: impl Future<Output = T>, cancel: impl Future) -> Option<T> {
    tokio::select! {
        biased;
        _ = cancel => None,
        out = work => Some(out),
    }
}

/// Sends one message with the pending attachments.
///
/// On cancel the attachments stay pending for the next message.
async fn send_turn(
    session: &mut ChatSession,
    text: &str,
    pending: &mut Vec<Attachment>,
    cancel: impl Future,
) -> Option<CallOutcome> {
    let files = std::mem::take(pending);
    debug!(files = files.len(), "Sending message");

    let outcome = until_cancelled(session.execute(text, &files), cancel).await;
    if outcome.is_none() {
        *pending = files;
    }
    outcome
}

fn print_outcome(
    session: &ChatSession,
    outcome: &CallOutcome,
    formatter: &TextFormatter,
    json: &JsonFormatter,
    show_stats: bool,
    cli: &Cli,
) -> Result<()> {
    match cli.format {
        OutputFormat::Text => match &outcome.result {
            Ok(reply) => println!("{}\n", formatter.format_reply(reply, outcome, show_stats)),
            Err(err) => eprintln!("{}", formatter.format_error(err)),
        },
        OutputFormat::Json => {
            let provider = session.adapter().kind().to_string();
            println!("{}", json.format(&ChatOutput::new(&provider, outcome))?);
        }
    }
    Ok(())
}

async fn handle_command(
    command: ReplCommand<'_>,
    session: &mut ChatSession,
    settings: &Settings,
    pending: &mut Vec<Attachment>,
    formatter: &TextFormatter,
) {
    match command {
        ReplCommand::Help => eprintln!("{HELP}"),
        ReplCommand::Exit => {}
        ReplCommand::Reset => {
            session.reset();
            pending.clear();
            eprintln!("Conversation cleared.");
        }
        ReplCommand::History => eprintln!("{}", formatter.format_history(session.context())),
        ReplCommand::Model(None) => {
            let adapter = session.adapter();
            eprintln!("{}", formatter.format_models(adapter.config(), adapter.model()));
        }
        ReplCommand::Model(Some(name)) => match apply_model(session.adapter_mut(), name) {
            Ok(()) => eprintln!("Model set to {name}."),
            Err(e) => eprintln!("{e}"),
        },
        ReplCommand::Provider(None) => eprintln!("Usage: /provider ID"),
        ReplCommand::Provider(Some(id)) => {
            let overrides = AdapterOverrides {
                provider: Some(id),
                ..AdapterOverrides::default()
            };
            match build_adapter(settings, &overrides) {
                Ok(adapter) => {
                    session.replace_adapter(adapter);
                    let adapter = session.adapter();
                    eprintln!(
                        "Switched to {} ({}).",
                        adapter.config().display_name,
                        adapter.model()
                    );
                }
                Err(e) => eprintln!("{e:#}"),
            }
        }
        ReplCommand::Prompt(prompt) => {
            session
                .adapter_mut()
                .set_custom_system_prompt(prompt.map(str::to_string));
            if prompt.is_some() {
                eprintln!("System prompt updated.");
            } else {
                eprintln!("System prompt restored to default.");
            }
        }
        ReplCommand::Attach(None) => eprintln!("Usage: /attach PATH"),
        ReplCommand::Attach(Some(path)) => match load_attachment(Path::new(path)).await {
            Ok(attachment) => {
                eprintln!("Attached {} ({}).", attachment.name(), attachment.mime_type());
                pending.push(attachment);
            }
            Err(e) => eprintln!("{e:#}"),
        },
        ReplCommand::Unknown(name) => eprintln!("Unknown command /{name}. Type /help."),
    }
}

// ============================================================================
// Tests
// ============================================================================
