//! Conversation types.
//!
//! The [`ConversationContext`] is the bounded window of recent turns that
//! adapters replay to the provider on every call. Full history lives
//! outside this crate.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of turns kept in a [`ConversationContext`].
pub const CONTEXT_CAPACITY: usize = 8;

// ============================================================================
// Conversation Turn
// ============================================================================

/// One completed user/assistant exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    user_text: String,
    assistant_text: String,
}

impl ConversationTurn {
    /// Creates a new turn.
    pub fn new(user_text: impl Into<String>, assistant_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            assistant_text: assistant_text.into(),
        }
    }

    /// What the user said.
    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    /// What the assistant answered.
    pub fn assistant_text(&self) -> &str {
        &self.assistant_text
    }
}

// ============================================================================
// Conversation Context
// ============================================================================

/// Bounded FIFO of the most recent turns.
///
/// Appending past capacity evicts the oldest turn. There is no other way to
/// mutate the window besides [`ConversationContext::clear`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationContext {
    turns: VecDeque<ConversationTurn>,
    capacity: usize,
}

impl ConversationContext {
    /// Creates an empty context with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(CONTEXT_CAPACITY)
    }

    /// Creates an empty context with a custom capacity (at least 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Builds a context from existing history, keeping only the newest turns.
    pub fn from_turns(turns: impl IntoIterator<Item = ConversationTurn>) -> Self {
        let mut ctx = Self::new();
        for turn in turns {
            ctx.append(turn);
        }
        ctx
    }

    /// Pushes a turn, evicting from the front once over capacity.
    pub fn append(&mut self, turn: ConversationTurn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }
    }

    /// Returns turns oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ConversationTurn> + ExactSizeIterator {
        self.turns.iter()
    }

    /// Returns turns oldest first as an owned sequence.
    pub fn as_ordered_sequence(&self) -> Vec<ConversationTurn> {
        self.turns.iter().cloned().collect()
    }

    /// Number of turns held.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if no turns are held.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Maximum number of turns held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops all turns (new session).
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a ConversationContext {
    type Item = &'a ConversationTurn;
    type IntoIter = std::collections::vec_deque::Iter<'a, ConversationTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(n: usize) -> ConversationTurn {
        ConversationTurn::new(format!("question {n}"), format!("answer {n}"))
    }

    #[test]
    fn test_append_evicts_oldest_first() {
        let mut ctx = ConversationContext::new();
        for n in 1..=9 {
            ctx.append(turn(n));
        }

        assert_eq!(ctx.len(), CONTEXT_CAPACITY);
        let users: Vec<_> = ctx.iter().map(ConversationTurn::user_text).collect();
        assert_eq!(users.first(), Some(&"question 2"));
        assert_eq!(users.last(), Some(&"question 9"));
        assert!(!users.contains(&"question 1"));
    }

    #[test]
    fn test_length_never_exceeds_capacity() {
        let mut ctx = ConversationContext::with_capacity(3);
        for n in 0..50 {
            ctx.append(turn(n));
            assert!(ctx.len() <= 3);
        }
        assert_eq!(ctx.as_ordered_sequence(), vec![turn(47), turn(48), turn(49)]);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut ctx = ConversationContext::with_capacity(0);
        ctx.append(turn(1));
        assert_eq!(ctx.capacity(), 1);
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_from_turns_keeps_newest() {
        let ctx = ConversationContext::from_turns((0..20).map(turn));
        assert_eq!(ctx.len(), CONTEXT_CAPACITY);
        assert_eq!(ctx.iter().next(), Some(&turn(12)));
    }

    #[test]
    fn test_clear() {
        let mut ctx = ConversationContext::from_turns([turn(1), turn(2)]);
        assert!(!ctx.is_empty());
        ctx.clear();
        assert!(ctx.is_empty());
    }
}
