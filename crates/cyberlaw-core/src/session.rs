use std::sync::Arc;

use crate::constants::{messages, persona};
use crate::context::{
    Bookmark, BookmarkStore, ConversationStore, KeyValueStore, Message, Theme, ThemePreference,
    ToggleOutcome,
};
use crate::error::BotError;
use crate::llm::ResponseFetcher;

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Submit(String),
    ToggleBookmark(String),
    ToggleTheme,
}

/// What changed as a result of handling an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateDelta {
    Unchanged,
    /// A user message and the assistant reply (answer or failure notice).
    TurnCompleted { user: Message, reply: Message },
    BookmarkAdded(Bookmark),
    BookmarkRemoved(Bookmark),
    ThemeChanged(Theme),
}

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// One chat session: the conversation, the persisted bookmarks and theme, and
/// the fetcher that answers questions.
///
/// `handle` borrows the session mutably for a whole fetch-and-render cycle,
/// so a second submit cannot start while one is in flight.
pub struct Session {
    conversation: ConversationStore,
    bookmarks: BookmarkStore,
    theme: ThemePreference,
    fetcher: ResponseFetcher,
    clock: Clock,
}

impl Session {
    /// Rehydrate persisted state from `storage` and greet the user.
    pub fn open(storage: Arc<dyn KeyValueStore>, fetcher: ResponseFetcher) -> Self {
        let mut conversation = ConversationStore::new();
        conversation.append_notice(persona::GREETING);

        let session = Self {
            conversation,
            bookmarks: BookmarkStore::load(storage.clone()),
            theme: ThemePreference::load(storage),
            fetcher,
            clock: Box::new(|| chrono::Utc::now().timestamp_millis()),
        };
        tracing::info!(
            bookmarks = session.bookmarks.len(),
            theme = %session.theme.get(),
            "Session opened"
        );
        session
    }

    /// Replace the timestamp source used for answer ids.
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub async fn handle(&mut self, event: Event) -> StateDelta {
        match event {
            Event::Submit(text) => self.submit(&text).await,
            Event::ToggleBookmark(id) => match self.bookmarks.toggle(&id, &self.conversation) {
                ToggleOutcome::Added(bookmark) => StateDelta::BookmarkAdded(bookmark),
                ToggleOutcome::Removed(bookmark) => StateDelta::BookmarkRemoved(bookmark),
                ToggleOutcome::Unresolved => StateDelta::Unchanged,
            },
            Event::ToggleTheme => StateDelta::ThemeChanged(self.theme.toggle()),
        }
    }

    async fn submit(&mut self, text: &str) -> StateDelta {
        let question = text.trim();
        if question.is_empty() {
            return StateDelta::Unchanged;
        }

        let user = self.conversation.append_user_message(question).clone();
        let submitted_at = (self.clock)();

        let reply = match self.fetcher.fetch_response(question).await {
            Ok(answer) => {
                let id = self.conversation.next_message_id(submitted_at);
                let appended = self
                    .conversation
                    .append_assistant_message(answer, question, id)
                    .cloned();
                match appended {
                    Ok(message) => message,
                    Err(e) => self.failure_notice(&e.to_string()),
                }
            }
            Err(e) => {
                tracing::error!("Failed to get chatbot response: {e}");
                self.failure_notice(&e.to_string())
            }
        };

        StateDelta::TurnCompleted { user, reply }
    }

    fn failure_notice(&mut self, detail: &str) -> Message {
        let text = format!("{} {detail}", messages::TURN_FAILED_PREFIX);
        self.conversation.append_notice(text).clone()
    }

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        self.bookmarks.list()
    }

    pub fn is_bookmarked(&self, message_id: &str) -> bool {
        self.bookmarks.contains(message_id)
    }

    pub fn theme(&self) -> Theme {
        self.theme.get()
    }

    /// End the session, writing bookmarks and theme one final time.
    pub fn close(self) -> Result<(), BotError> {
        self.bookmarks.persist()?;
        self.theme.persist()?;
        tracing::info!(messages = self.conversation.len(), "Session closed");
        Ok(())
    }
}
