// Library interface for cyberlaw-cli
// Lets integration tests reach command parsing, palettes and markdown rendering.

pub mod app;
pub mod commands;
pub mod render;
pub mod theme;

// Re-export commonly used items for easier testing
pub use commands::{handle_command, CommandResult};
pub use render::{render_markdown, LineKind, RenderedLine};
pub use theme::Palette;
