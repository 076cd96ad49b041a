pub mod bookmarks;
pub mod history;
pub mod storage;
pub mod theme;

pub use bookmarks::{Bookmark, BookmarkStore, ToggleOutcome};
pub use history::{ConversationStore, Message, Sender};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use theme::{Theme, ThemePreference};
