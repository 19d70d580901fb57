//! Conversation state management
//!
//! Maintains the append-only message history for one conversation thread.
//! Message order is temporally monotonic: nothing ever deletes or reorders
//! prior messages within a turn; only the storage limit trims the oldest
//! entries between turns.

use std::collections::VecDeque;

use crate::core::Message;

/// Append-only conversation state for one thread
#[derive(Debug, Clone)]
pub struct Conversation {
    /// Message history
    messages: VecDeque<Message>,
    /// Maximum history length
    max_length: usize,
}

impl Conversation {
    /// Create a new conversation
    pub fn new(max_length: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            max_length,
        }
    }

    /// Append a user message
    pub fn add_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    /// Append a message and maintain the storage limit
    pub fn push(&mut self, message: Message) {
        self.messages.push_back(message);

        // Remove oldest messages if over limit (but keep recent context)
        while self.messages.len() > self.max_length {
            self.messages.pop_front();
        }
    }

    /// All messages, oldest first
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// The most recent message, if any
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.back()
    }

    /// The last user message
    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == "user")
    }

    /// The last worker-authored message
    pub fn last_worker_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_worker_reply())
    }

    /// Whether the conversation ends with a worker-authored reply
    ///
    /// When true, no new user input exists since the last worker ran, so
    /// routing must terminate rather than ping-pong between workers.
    pub fn ends_with_worker_reply(&self) -> bool {
        self.last_message().map(Message::is_worker_reply).unwrap_or(false)
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Get message count
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(1000)
    }
}
