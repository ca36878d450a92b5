//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

use std::time::Duration;
use whispr_core::{ConversationContext, ConversationTurn};
use whispr_fetch::{CallAttempt, CallOutcome, ChatError, ErrorKind};
use whispr_providers::ProviderRegistry;
use whispr_store::{ProviderSettings, Settings};

use super::json::{ChatOutput, JsonFormatter, ProviderOutput};
use super::text::{TextFormatter, truncate};
use crate::runtime::CredentialSource;

fn walked_outcome() -> CallOutcome {
    CallOutcome {
        result: Ok("Hello!".to_string()),
        attempts: vec![
            CallAttempt::failure(
                "gpt-4o-mini",
                ErrorKind::Transient,
                "503 overloaded",
                Duration::from_millis(120),
            ),
            CallAttempt::success("gpt-4o", Duration::from_millis(900)),
        ],
        duration: Duration::from_millis(1020),
        final_model: "gpt-4o".to_string(),
    }
}

mod text_formatter_tests {
    use super::*;

    #[test]
    fn test_reply_without_stats_is_verbatim() {
        let formatter = TextFormatter::new(true);
        let outcome = walked_outcome();
        assert_eq!(formatter.format_reply("Hello!", &outcome, false), "Hello!");
    }

    #[test]
    fn test_reply_footer() {
        let formatter = TextFormatter::new(false);
        let text = formatter.format_reply("Hello!", &walked_outcome(), true);
        assert_eq!(text, "Hello!\n── gpt-4o · 2 attempts · 1 model switch · 1.0s");
    }

    #[test]
    fn test_provider_line_marks_active_and_missing_key() {
        let formatter = TextFormatter::new(false);
        let groq = ProviderRegistry::get_by_id("groq").unwrap();

        let line = formatter.format_provider_line(groq, CredentialSource::Missing, true);
        assert!(line.starts_with("*Groq"));
        assert!(line.contains("Chat Completions"));
        assert!(line.contains("−"));
        assert!(line.ends_with("missing"));

        let line = formatter.format_provider_line(groq, CredentialSource::Keychain, false);
        assert!(line.starts_with(' '));
        assert!(line.ends_with("keychain"));
    }

    #[test]
    fn test_colors_only_when_enabled() {
        let groq = ProviderRegistry::get_by_id("groq").unwrap();
        let plain = TextFormatter::new(false).format_provider_line(groq, CredentialSource::Environment, false);
        assert!(!plain.contains('\x1b'));

        let colored = TextFormatter::new(true).format_provider_line(groq, CredentialSource::Environment, false);
        assert!(colored.contains("\x1b[32m"));
    }

    #[test]
    fn test_models_mark_current() {
        let formatter = TextFormatter::new(false);
        let openai = ProviderRegistry::get_by_id("openai").unwrap();
        let text = formatter.format_models(openai, "gpt-4o");

        assert!(text.contains("● gpt-4o\n"));
        assert!(text.contains("○ gpt-4o-mini"));
    }

    #[test]
    fn test_history() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_history(&ConversationContext::new()), "(no history)");

        let context = ConversationContext::from_turns([
            ConversationTurn::new("hi", "hello"),
            ConversationTurn::new("bye", "see you"),
        ]);
        assert_eq!(
            formatter.format_history(&context),
            "1. You: hi\n   AI: hello\n2. You: bye\n   AI: see you"
        );
    }

    #[test]
    fn test_error_line() {
        let formatter = TextFormatter::new(false);
        let err = ChatError::QuotaUpstream("insufficient_quota".into());
        let line = formatter.format_error(&err);
        assert!(line.starts_with("✗ "));
        assert!(line.contains("billing"));
    }

    #[test]
    fn test_settings_overrides() {
        let formatter = TextFormatter::new(false);
        let mut settings = Settings::default();
        assert!(!formatter.format_settings(&settings).contains("Provider overrides"));

        settings.provider_settings.insert(
            whispr_core::ProviderKind::Groq,
            ProviderSettings {
                model: Some("llama-3.1-8b-instant".into()),
                custom_system_prompt: None,
            },
        );
        let text = formatter.format_settings(&settings);
        assert!(text.contains("Active provider:  gemini"));
        assert!(text.contains("  groq\n    model:  llama-3.1-8b-instant"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("line one\nline two", 40), "line one line two");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}

mod json_formatter_tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_chat_output_success() {
        let output = ChatOutput::new("openai", &walked_outcome());
        let json: Value =
            serde_json::from_str(&JsonFormatter::new(false).format(&output).unwrap()).unwrap();

        assert_eq!(json["provider"], "openai");
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["reply"], "Hello!");
        assert!(json.get("error").is_none());
        assert_eq!(json["modelSwitches"], 1);
        assert_eq!(json["durationMs"], 1020);
        assert_eq!(json["attempts"][0]["kind"], "transient");
        assert_eq!(json["attempts"][1]["success"], true);
        assert!(json["attempts"][1].get("error").is_none());
    }

    #[test]
    fn test_chat_output_failure() {
        let outcome = CallOutcome {
            result: Err(ChatError::AuthUpstream("401 invalid key".into())),
            attempts: vec![CallAttempt::failure(
                "claude-sonnet-4-20250514",
                ErrorKind::Auth,
                "401 invalid key",
                Duration::from_millis(50),
            )],
            duration: Duration::from_millis(50),
            final_model: "claude-sonnet-4-20250514".into(),
        };
        let json = serde_json::to_value(ChatOutput::new("anthropic", &outcome)).unwrap();

        assert!(json.get("reply").is_none());
        assert_eq!(json["error"]["kind"], "auth");
        assert_eq!(json["error"]["retryable"], false);
    }

    #[test]
    fn test_provider_output() {
        let gemini = ProviderRegistry::get_by_id("gemini").unwrap();
        let json =
            serde_json::to_value(ProviderOutput::new(gemini, CredentialSource::Environment, true))
                .unwrap();

        assert_eq!(json["id"], "gemini");
        assert_eq!(json["family"], "Native");
        assert_eq!(json["multimodal"], true);
        assert_eq!(json["defaultModel"], gemini.default_model);
        assert_eq!(json["credential"], "env");
        assert_eq!(json["active"], true);
    }

    #[test]
    fn test_pretty_output_is_multiline() {
        let data = serde_json::json!({"a": 1});
        assert!(!JsonFormatter::new(false).format(&data).unwrap().contains('\n'));
        assert!(JsonFormatter::new(true).format(&data).unwrap().contains('\n'));
    }
}
