//! Text output formatting with colors.

use std::fmt::Write as _;
use whispr_core::{ConversationContext, ProviderConfig};
use whispr_fetch::{CallOutcome, ChatError};
use whispr_store::Settings;

use crate::runtime::CredentialSource;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Providers
    // ========================================================================

    /// Header for the providers table.
    pub fn format_providers_header(&self) -> String {
        format!(
            "{:<16} {:<11} {:<17} {:<11} {}",
            self.bold("Provider"),
            self.bold("ID"),
            self.bold("Family"),
            self.bold("Files"),
            self.bold("Key")
        )
    }

    /// Formats a single provider line.
    pub fn format_provider_line(
        &self,
        config: &ProviderConfig,
        source: CredentialSource,
        active: bool,
    ) -> String {
        let marker = if active { self.cyan("*") } else { " ".to_string() };
        let files = if config.supports_multimodal {
            self.green("✓")
        } else {
            self.dim("−")
        };
        let key = match source {
            CredentialSource::Missing => self.yellow(source.label()),
            _ => self.green(source.label()),
        };

        format!(
            "{}{:<15} {:<11} {:<17} {:<11} {}",
            marker,
            config.display_name,
            config.id.id(),
            config.wire_family.display_name(),
            files,
            key
        )
    }

    /// Formats the models of one provider, marking the current one.
    pub fn format_models(&self, config: &ProviderConfig, current: &str) -> String {
        config
            .supported_models
            .iter()
            .map(|m| {
                if m == current {
                    format!("  {} {}", self.green("●"), self.bold(m))
                } else {
                    format!("  {} {m}", self.dim("○"))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ========================================================================
    // Chat
    // ========================================================================

    /// Formats a reply with a dim footer naming the model.
    pub fn format_reply(&self, reply: &str, outcome: &CallOutcome, show_attempts: bool) -> String {
        if !show_attempts {
            return reply.to_string();
        }
        format!("{reply}\n{}", self.dim(&Self::outcome_footer(outcome)))
    }

    fn outcome_footer(outcome: &CallOutcome) -> String {
        let mut footer = format!(
            "── {} · {} attempt{}",
            outcome.final_model,
            outcome.attempts_count(),
            if outcome.attempts_count() == 1 { "" } else { "s" }
        );
        let switches = outcome.model_switches();
        if switches > 0 {
            let plural = if switches == 1 { "" } else { "es" };
            let _ = write!(footer, " · {switches} model switch{plural}");
        }
        let _ = write!(footer, " · {:.1}s", outcome.duration.as_secs_f64());
        footer
    }

    /// Formats a chat error.
    pub fn format_error(&self, err: &ChatError) -> String {
        format!("{} {}", self.red("✗"), err)
    }

    /// Prompt shown before each line in interactive mode.
    pub fn format_prompt(&self, provider: &str, pending_files: usize) -> String {
        if pending_files > 0 {
            format!("{} {} ", self.cyan(provider), self.dim(&format!("+{pending_files} file(s) >")))
        } else {
            format!("{} ", self.cyan(&format!("{provider} >")))
        }
    }

    /// Formats the conversation window.
    pub fn format_history(&self, context: &ConversationContext) -> String {
        if context.is_empty() {
            return self.dim("(no history)");
        }
        context
            .iter()
            .enumerate()
            .map(|(i, turn)| {
                format!(
                    "{}. {} {}\n   {} {}",
                    i + 1,
                    self.bold("You:"),
                    turn.user_text(),
                    self.bold("AI:"),
                    turn.assistant_text()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Formats settings for `config show`.
    pub fn format_settings(&self, settings: &Settings) -> String {
        let mut lines = vec![
            self.bold("Whispr Configuration"),
            "─".repeat(40),
            format!("Active provider:  {}", settings.active_provider),
            format!("Max retries:      {}", settings.max_retries),
            format!("Model fallback:   {}", settings.model_fallback),
            format!("Request timeout:  {}s", settings.request_timeout_secs),
            format!("Log level:        {}", settings.log_level),
        ];

        if !settings.provider_settings.is_empty() {
            lines.push(String::new());
            lines.push(self.bold("Provider overrides:"));
            for (kind, overrides) in &settings.provider_settings {
                lines.push(format!("  {kind}"));
                if let Some(model) = &overrides.model {
                    lines.push(format!("    model:  {model}"));
                }
                if let Some(prompt) = &overrides.custom_system_prompt {
                    lines.push(format!("    prompt: {}", truncate(prompt, 60)));
                }
            }
        }

        lines.join("\n")
    }

    // ========================================================================
    // Colors
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Shortens `text` to `max` characters, adding an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let mut cut: String = single_line.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
