use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::storage::BOOKMARKS_KEY;
use crate::context::history::{ConversationStore, Sender};
use crate::context::storage::KeyValueStore;
use crate::error::BotError;

/// A saved copy of one answer and the question that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bookmark {
    pub id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added(Bookmark),
    Removed(Bookmark),
    /// The id matched no answer in the conversation; nothing changed.
    Unresolved,
}

/// Bookmarks keyed by message id, kept in insertion order and written to
/// storage in full after every change.
pub struct BookmarkStore {
    storage: Arc<dyn KeyValueStore>,
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    /// Rehydrate from storage. A missing or unparsable value yields an empty set.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let bookmarks = storage
            .get(BOOKMARKS_KEY)
            .map(|raw| parse_bookmarks(&raw))
            .unwrap_or_default();

        tracing::debug!("Loaded {} bookmarks", bookmarks.len());
        Self { storage, bookmarks }
    }

    pub fn toggle(&mut self, message_id: &str, conversation: &ConversationStore) -> ToggleOutcome {
        if let Some(index) = self.bookmarks.iter().position(|b| b.id == message_id) {
            let removed = self.bookmarks.remove(index);
            self.persist_or_warn();
            return ToggleOutcome::Removed(removed);
        }

        let Some(message) = conversation
            .find_by_id(message_id)
            .filter(|m| m.sender == Sender::Assistant)
        else {
            tracing::debug!("Bookmark toggle for unknown message {message_id}");
            return ToggleOutcome::Unresolved;
        };

        let bookmark = Bookmark {
            id: message_id.to_string(),
            question: message.question.clone().unwrap_or_default(),
            answer: message.text.clone(),
        };
        self.bookmarks.push(bookmark.clone());
        self.persist_or_warn();
        ToggleOutcome::Added(bookmark)
    }

    pub fn list(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn contains(&self, message_id: &str) -> bool {
        self.bookmarks.iter().any(|b| b.id == message_id)
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    /// Overwrite the stored set with the in-memory one.
    pub fn persist(&self) -> Result<(), BotError> {
        let json = serde_json::to_string(&self.bookmarks)?;
        self.storage.set(BOOKMARKS_KEY, &json)
    }

    fn persist_or_warn(&self) {
        if let Err(e) = self.persist() {
            tracing::warn!("Failed to persist bookmarks: {e}");
        }
    }
}

/// Parse a stored bookmark array, dropping later duplicates of an id.
fn parse_bookmarks(raw: &str) -> Vec<Bookmark> {
    let parsed: Vec<Bookmark> = match serde_json::from_str(raw) {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!("Ignoring corrupt bookmark data: {e}");
            return Vec::new();
        }
    };

    let mut unique: Vec<Bookmark> = Vec::with_capacity(parsed.len());
    for bookmark in parsed {
        if !unique.iter().any(|b| b.id == bookmark.id) {
            unique.push(bookmark);
        }
    }
    unique
}
