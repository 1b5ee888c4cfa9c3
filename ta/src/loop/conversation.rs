//! Conversation state owned by the agent loop

use crate::llm::Message;

/// Append-only message history for one session
///
/// The system prompt travels separately from the messages because the model
/// client places it at the head of every request itself.
#[derive(Debug, Clone)]
pub struct Conversation {
    system: String,
    messages: Vec<Message>,
}

impl Conversation {
    /// Start a conversation with a system prompt and the user's request
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            messages: vec![Message::user(user)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages, not counting the system prompt
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
