pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod llm;
pub mod session;

// Re-export key types
pub use config::Settings;
pub use context::{
    Bookmark, BookmarkStore, ConversationStore, FileStore, KeyValueStore, MemoryStore, Message,
    Sender, Theme, ThemePreference, ToggleOutcome,
};
pub use error::BotError;
pub use llm::{
    CompletionRequest, FailureKind, FetchError, GeminiClient, LlmClient, LlmError,
    ResponseFetcher, RetryPolicy, Sleeper, TokioSleeper,
};
pub use session::{Event, Session, StateDelta};
