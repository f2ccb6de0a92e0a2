//! # Conversation
//!
//! The ordered message log of the current chat. Messages are only ever
//! appended; "new chat" clears the whole log.

use chrono::{SecondsFormat, Utc};

pub type MessageId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    /// Raw text. Formatting happens at render time.
    pub text: String,
    pub sender: Sender,
    /// ISO 8601 creation instant.
    pub timestamp: String,
}

impl Message {
    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    next_id: MessageId,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Ids start at the current time in milliseconds.
    pub fn new() -> Self {
        let seed = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: MessageId) -> Self {
        Self {
            messages: Vec::new(),
            next_id: seed,
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> &Message {
        self.push(Sender::User, text.into())
    }

    pub fn push_bot(&mut self, text: impl Into<String>) -> &Message {
        self.push(Sender::Bot, text.into())
    }

    fn push(&mut self, sender: Sender, text: String) -> &Message {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message {
            id,
            text,
            sender,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        &self.messages[self.messages.len() - 1]
    }

    /// Drop every message. The id counter keeps running.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
