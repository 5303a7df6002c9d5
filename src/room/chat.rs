//! Bounded chat backlog.
//!
//! Holds the most recent formatted messages so late joiners can catch up.
//! Eviction is strictly FIFO: once the log is over capacity the oldest
//! entries go first and the survivors keep their order.

use std::collections::VecDeque;

pub const DEFAULT_CHAT_HISTORY: usize = 50;

#[derive(Debug, Clone)]
pub struct ChatLog {
    messages: VecDeque<String>,
    capacity: usize,
}

impl ChatLog {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { messages: VecDeque::with_capacity(capacity + 1), capacity }
    }

    /// Format a chat line the way every client renders it.
    #[must_use]
    pub fn format(name: &str, text: &str) -> String {
        format!("{name}: {text}")
    }

    /// Append a message, evicting from the front until within capacity.
    pub fn push(&mut self, message: String) {
        self.messages.push_back(message);
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
        }
    }

    /// Backlog in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.messages.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_HISTORY)
    }
}
