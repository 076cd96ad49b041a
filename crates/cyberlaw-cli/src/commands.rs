use cyberlaw_core::Theme;

/// Result of processing a slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Quit the application.
    Quit,
    /// Toggle the bookmark on an answer; `None` means the latest answer.
    ToggleBookmark(Option<String>),
    /// Show saved bookmarks.
    ListBookmarks,
    /// Flip between light and dark.
    ToggleTheme,
    /// Switch to a specific theme.
    SetTheme(Theme),
    /// Reprint the conversation so far.
    ShowHistory,
    /// Not a command - treat as a question.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,

        "/bookmark" | "/b" => {
            if arg.is_empty() {
                CommandResult::ToggleBookmark(None)
            } else {
                CommandResult::ToggleBookmark(Some(arg.to_string()))
            }
        }
        "/bookmarks" | "/saved" => CommandResult::ListBookmarks,

        "/theme" => {
            if arg.is_empty() {
                CommandResult::ToggleTheme
            } else {
                match arg.parse::<Theme>() {
                    Ok(theme) => CommandResult::SetTheme(theme),
                    Err(_) => CommandResult::Message("Unknown theme. Options: light, dark".into()),
                }
            }
        }

        "/history" => CommandResult::ShowHistory,
        "/version" => {
            CommandResult::Message(format!("Cyber Law Bot CLI v{}", env!("CARGO_PKG_VERSION")))
        }

        _ => {
            if input.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
╭─ Cyber Law Bot Commands ──────────────────────────────────────╮

  Type a question about Indian Cyber Law and press Enter.

  BOOKMARKS
    /bookmark, /b             Bookmark (or un-bookmark) the latest answer
    /bookmark <id>            Toggle the bookmark on a specific answer
    /bookmarks, /saved        List saved answers

  DISPLAY
    /theme                    Toggle between light and dark
    /theme <light|dark>       Switch to a specific theme
    /history                  Reprint this conversation

  OTHER
    /help, /h                 Show this help message
    /version                  Show version information
    /exit, /quit, /q          Quit

╰────────────────────────────────────────────────────────────────╯";

    CommandResult::Message(help_text.into())
}
