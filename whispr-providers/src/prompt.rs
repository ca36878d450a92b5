//! System prompts and response post-processing shared by all adapters.

use regex::Regex;
use std::sync::LazyLock;
use whispr_core::{Attachment, ConversationContext};

// ============================================================================
// System Prompts
// ============================================================================

/// Built-in persona prompt for text requests.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are Gabay, a smart and helpful AI assistant. Be concise, clear, and conversational.

## Response Guidelines

**Be Brief**: Give short, focused answers. Skip lengthy explanations unless asked. Get to the point quickly.

**Be Conversational**: Talk naturally like a helpful friend, not a textbook. Use simple language.

**Be Smart**: Think through questions carefully, but share conclusions directly without showing all your work.

**Ask First**: For complex requests (like building a resume, writing code, planning something), ask 1-2 clarifying questions BEFORE diving into a long response. Don't assume - confirm what the user needs.

**Format Wisely**:
- Use bullet points sparingly, only when listing 3+ items
- Avoid walls of text - keep paragraphs short (2-3 sentences max)
- Don't use headers/sections for simple answers

## Behavioral Rules

- When asked who made/created you: "I was created by Asnari Pacalna"
- Never repeat your introduction
- Be direct and confident
- If unsure, admit it briefly and suggest how to find the answer"#;

/// Built-in persona prompt for requests carrying attachments.
pub const MULTIMODAL_SYSTEM_PROMPT: &str = r#"You are Gabay, a smart and helpful AI assistant with vision capabilities. Be concise, clear, and conversational.

## Response Guidelines

**Be Brief**: Give short, focused answers. Skip lengthy explanations unless asked.

**Be Conversational**: Talk naturally like a helpful friend. Use simple language.

**Ask First**: For complex requests, ask 1-2 clarifying questions BEFORE diving into a long response.

**Format Wisely**:
- Use bullet points sparingly
- Keep paragraphs short (2-3 sentences max)
- Don't over-format simple answers

## Vision & Document Analysis

When analyzing images/documents:
- Describe what you see concisely
- Focus on what's relevant to the user's question
- For code: identify issues briefly, suggest fixes
- For documents: extract key info, don't summarize everything

## Behavioral Rules

- When asked who made/created you: "I was created by Asnari Pacalna"
- Never repeat your introduction
- Be direct and confident"#;

const CREATOR_NOTE: &str =
    "\n\nNote: When asked who made/created you, say \"I was created by Asnari Pacalna\".";

const VISION_NOTE: &str =
    "\n\nYou have vision capabilities - you can analyze images and documents.";

/// Text sent when attachments arrive without a message.
pub const DEFAULT_ATTACHMENT_PROMPT: &str = "Please analyze the attached file(s) thoroughly.";

/// Resolves the system prompt for one request.
pub fn system_prompt(custom: Option<&str>, multimodal: bool) -> String {
    match (custom, multimodal) {
        (Some(custom), false) => format!("{custom}{CREATOR_NOTE}"),
        (Some(custom), true) => format!("{custom}{CREATOR_NOTE}{VISION_NOTE}"),
        (None, false) => DEFAULT_SYSTEM_PROMPT.to_string(),
        (None, true) => MULTIMODAL_SYSTEM_PROMPT.to_string(),
    }
}

// ============================================================================
// User Text Helpers
// ============================================================================

/// Returns the user text, or the default analysis request when blank.
pub fn attachment_prompt(user_text: &str) -> &str {
    if user_text.trim().is_empty() {
        DEFAULT_ATTACHMENT_PROMPT
    } else {
        user_text
    }
}

/// Appends a `[File: name]` marker for each attachment to `user_text`.
pub fn with_file_markers<'a>(
    user_text: &str,
    attachments: impl IntoIterator<Item = &'a Attachment>,
) -> String {
    let mut text = user_text.to_string();
    for attachment in attachments {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&attachment.text_marker());
    }
    text
}

// ============================================================================
// Post-processing
// ============================================================================

static INTRODUCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(hi|hello|hey)?,?\s*(i'm|i am)\s+(whispr|gabay)").expect("Invalid regex")
});

/// Drops a repeated self-introduction from the first line of a reply.
///
/// Only applies once the conversation has history. The first line and its
/// terminator are removed; everything after is returned unchanged.
pub fn strip_repeated_introduction(text: &str, context: &ConversationContext) -> String {
    if context.is_empty() || text.is_empty() {
        return text.to_string();
    }

    let (first_line, rest) = match text.find('\n') {
        Some(idx) => (&text[..idx], &text[idx + 1..]),
        None => (text, ""),
    };

    if INTRODUCTION_RE.is_match(first_line.trim()) {
        rest.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whispr_core::ConversationTurn;

    fn history() -> ConversationContext {
        ConversationContext::from_turns([ConversationTurn::new("hi", "hello")])
    }

    #[test]
    fn test_system_prompt_variants() {
        assert_eq!(system_prompt(None, false), DEFAULT_SYSTEM_PROMPT);
        assert!(system_prompt(None, true).contains("Vision & Document Analysis"));

        let custom = system_prompt(Some("Be a pirate."), false);
        assert!(custom.starts_with("Be a pirate."));
        assert!(custom.contains("Asnari Pacalna"));
        assert!(!custom.contains("vision capabilities"));

        let custom = system_prompt(Some("Be a pirate."), true);
        assert!(custom.ends_with("you can analyze images and documents."));
    }

    #[test]
    fn test_attachment_prompt_default() {
        assert_eq!(attachment_prompt("   "), DEFAULT_ATTACHMENT_PROMPT);
        assert_eq!(attachment_prompt("what is this?"), "what is this?");
    }

    #[test]
    fn test_with_file_markers() {
        let files = [
            Attachment::new("a.png", "image/png", ""),
            Attachment::new("notes.txt", "text/plain", ""),
        ];
        assert_eq!(
            with_file_markers("Summarize", &files),
            "Summarize [File: a.png] [File: notes.txt]"
        );
        assert_eq!(with_file_markers("", &files[..1]), "[File: a.png]");
    }

    #[test]
    fn test_strip_removes_only_first_line() {
        let reply = "Hi, I'm Gabay!\n\n  Here is the answer.  \nSecond line";
        assert_eq!(
            strip_repeated_introduction(reply, &history()),
            "\n  Here is the answer.  \nSecond line"
        );
    }

    #[test]
    fn test_strip_handles_crlf_and_case() {
        let reply = "HELLO I AM WHISPR\r\nrest";
        assert_eq!(strip_repeated_introduction(reply, &history()), "rest");
    }

    #[test]
    fn test_strip_requires_history() {
        let reply = "Hi, I'm Gabay!\nAnswer";
        assert_eq!(
            strip_repeated_introduction(reply, &ConversationContext::new()),
            reply
        );
    }

    #[test]
    fn test_strip_leaves_other_replies_untouched() {
        let reply = "Gabay was created by Asnari Pacalna.\nI'm Gabay.";
        assert_eq!(strip_repeated_introduction(reply, &history()), reply);
        assert_eq!(strip_repeated_introduction("", &history()), "");
    }

    #[test]
    fn test_strip_single_line_intro() {
        assert_eq!(strip_repeated_introduction("I'm Gabay", &history()), "");
    }
}
