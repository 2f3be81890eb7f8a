//! Session-local chat memory.
//!
//! A token-budgeted buffer of `(role, content)` messages. When an append
//! pushes the estimated total over the budget, the oldest messages drop
//! first. Token counts are approximate; the budget is a trim heuristic,
//! not an exact accounting.

use crate::llm::ChatMessage;

pub const DEFAULT_TOKEN_LIMIT: usize = 2048;

#[derive(Debug, Clone)]
pub struct MemoryBuffer {
    messages: Vec<ChatMessage>,
    token_limit: usize,
}

impl MemoryBuffer {
    pub fn new(token_limit: usize) -> Self {
        Self {
            messages: Vec::new(),
            token_limit: token_limit.max(1),
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.trim();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Render the buffer as alternating `User:` / `Bot:` transcript lines.
    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(|msg| {
                if msg.role == "user" {
                    format!("User: {}", msg.content)
                } else {
                    format!("Bot: {}", msg.content)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn trim(&mut self) {
        let mut total: usize = self.messages.iter().map(|m| estimate_tokens(&m.content)).sum();
        let mut drop_count = 0;

        while total > self.token_limit && drop_count < self.messages.len().saturating_sub(1) {
            total -= estimate_tokens(&self.messages[drop_count].content);
            drop_count += 1;
        }

        if drop_count > 0 {
            self.messages.drain(..drop_count);
        }
    }
}

impl Default for MemoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_LIMIT)
    }
}

/// Rough token estimate: the larger of word count and chars/4.
pub fn estimate_tokens(text: &str) -> usize {
    let words = text.split_whitespace().count();
    let by_chars = text.chars().count() / 4;
    words.max(by_chars).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_alternates_roles() {
        let mut memory = MemoryBuffer::default();
        memory.push(ChatMessage::user("what is an arrhythmia?"));
        memory.push(ChatMessage::assistant("An irregular heart rhythm."));

        let transcript = memory.transcript();
        assert_eq!(
            transcript,
            "User: what is an arrhythmia?\nBot: An irregular heart rhythm."
        );
    }

    #[test]
    fn oldest_messages_drop_first() {
        let mut memory = MemoryBuffer::new(20);
        memory.push(ChatMessage::user("a ".repeat(15).trim().to_string()));
        memory.push(ChatMessage::assistant("b ".repeat(15).trim().to_string()));

        // Budget only fits the newer message.
        assert_eq!(memory.messages().len(), 1);
        assert!(memory.messages()[0].content.starts_with('b'));
    }

    #[test]
    fn newest_message_survives_even_when_oversized() {
        let mut memory = MemoryBuffer::new(4);
        memory.push(ChatMessage::user("word ".repeat(50).trim().to_string()));
        assert_eq!(memory.messages().len(), 1);
    }

    #[test]
    fn token_estimate_is_nonzero() {
        assert_eq!(estimate_tokens(""), 1);
        assert!(estimate_tokens("four plain words here") >= 4);
    }
}
