//! # Message Timeline
//!
//! Append-only, creation-ordered log of chat messages for the current session.
//! Entries are never edited or removed individually; the only way to drop them
//! is [`Timeline::clear`] when a session resets.

use chrono::{DateTime, Utc};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The local user.
    Own,
    /// A simulated remote party.
    Peer,
}

/// Creation-ordered message identifier. Never reused within one timeline,
/// even across `clear()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    pub origin: Origin,
    pub sent_at: DateTime<Utc>,
    /// Display name shown above the message. `None` when the sender is
    /// implicit (the single partner of a paired chat).
    pub sender_label: Option<String>,
}

/// Fields of a message before the timeline assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub text: String,
    pub origin: Origin,
    pub sent_at: DateTime<Utc>,
    pub sender_label: Option<String>,
}

#[derive(Debug, Default)]
pub struct Timeline {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns the id it was given.
    pub fn append(&mut self, message: NewMessage) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            text: message.text,
            origin: message.origin,
            sent_at: message.sent_at,
            sender_label: message.sender_label,
        });
        id
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Read-only view in insertion order.
    pub fn snapshot(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
