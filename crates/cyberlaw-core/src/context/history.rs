use serde::{Deserialize, Serialize};

use crate::error::BotError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One chat message. Only answered assistant messages carry an `id` and the
/// `question` that triggered them; only those can be bookmarked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sender: Sender,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: None,
            sender: Sender::User,
            text: text.into(),
            question: None,
        }
    }

    pub fn answer(
        text: impl Into<String>,
        question: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            sender: Sender::Assistant,
            text: text.into(),
            question: Some(question.into()),
        }
    }

    /// An assistant message that answers nothing: the greeting or a failed turn.
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            id: None,
            sender: Sender::Assistant,
            text: text.into(),
            question: None,
        }
    }
}

/// Append-only message history for one session.
#[derive(Debug, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_user_message(&mut self, text: impl Into<String>) -> &Message {
        self.push(Message::user(text))
    }

    /// Append an answered assistant message. `id` must not already be in use.
    pub fn append_assistant_message(
        &mut self,
        text: impl Into<String>,
        question: impl Into<String>,
        id: impl Into<String>,
    ) -> Result<&Message, BotError> {
        let id = id.into();
        if self.find_by_id(&id).is_some() {
            return Err(BotError::DuplicateMessageId(id));
        }
        Ok(self.push(Message::answer(text, question, id)))
    }

    pub fn append_notice(&mut self, text: impl Into<String>) -> &Message {
        self.push(Message::notice(text))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id.as_deref() == Some(id))
    }

    /// Derive a fresh `msg-<millis>` id from a submission timestamp, moving
    /// forward a millisecond at a time past ids already taken.
    pub fn next_message_id(&self, timestamp_millis: i64) -> String {
        let mut ts = timestamp_millis;
        loop {
            let id = format!("msg-{ts}");
            if self.find_by_id(&id).is_none() {
                return id;
            }
            ts += 1;
        }
    }

    /// The most recent message that can be bookmarked.
    pub fn last_answer(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.id.is_some())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}
