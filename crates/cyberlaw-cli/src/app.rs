use anyhow::Result;
use crossterm::{
    cursor, execute,
    style::Stylize,
    terminal::{Clear, ClearType},
};
use cyberlaw_core::{
    constants::{messages, persona},
    Bookmark, Event, FileStore, KeyValueStore, MemoryStore, Message, ResponseFetcher, Sender,
    Session, Settings, StateDelta, ThemePreference,
};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{self, CommandResult};
use crate::render::{render_markdown, LineKind};
use crate::theme::Palette;

fn build_fetcher(settings: &Settings) -> ResponseFetcher {
    ResponseFetcher::new(Arc::new(settings.build_llm_client())).with_policy(settings.retry_policy())
}

fn open_storage(settings: &Settings) -> Arc<dyn KeyValueStore> {
    let path = settings.storage_path();
    match FileStore::open(&path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!("Falling back to in-memory storage ({}): {e}", path.display());
            Arc::new(MemoryStore::new())
        }
    }
}

// ── Single-prompt mode ──────────────────────────────────────────────────

/// Answer one question and exit. A failed fetch is reported once on stderr
/// and turned into a failing exit status.
pub async fn run_single_prompt(settings: &Settings, prompt: &str) -> Result<ExitCode> {
    let fetcher = build_fetcher(settings);
    let theme = ThemePreference::load(open_storage(settings)).get();
    let palette = Palette::for_theme(theme);

    match fetcher.fetch_response(prompt).await {
        Ok(answer) => {
            print_markdown(&answer, &palette);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            let notice = format!("{} {e}", messages::TURN_FAILED_PREFIX);
            eprintln!("{}", notice.with(palette.error));
            Ok(ExitCode::FAILURE)
        }
    }
}

// ── Interactive REPL ────────────────────────────────────────────────────

pub async fn run_repl(settings: Settings) -> Result<()> {
    let mut session = Session::open(open_storage(&settings), build_fetcher(&settings));
    let mut palette = Palette::for_theme(session.theme());

    println!(
        "{}",
        format!("{} ({})", persona::CHATBOT_NAME, settings.llm.model)
            .with(palette.accent)
            .bold()
    );
    println!("{}", "Type /help for commands.".with(palette.muted));
    println!();
    for message in session.conversation().messages() {
        print_message(message, false, &palette);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", "You > ".with(palette.user_color).bold());
        io::stdout().flush()?;

        let Some(input) = lines.next_line().await? else {
            break;
        };
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match commands::handle_command(input) {
            CommandResult::NotACommand => {
                show_typing_indicator(&palette)?;
                let delta = session.handle(Event::Submit(input.to_string())).await;
                hide_typing_indicator()?;
                if let StateDelta::TurnCompleted { reply, .. } = delta {
                    print_message(&reply, false, &palette);
                }
            }
            CommandResult::ToggleBookmark(id) => {
                let id = id.or_else(|| {
                    session
                        .conversation()
                        .last_answer()
                        .and_then(|m| m.id.clone())
                });
                let Some(id) = id else {
                    print_info("There is no answer to bookmark yet.", &palette);
                    continue;
                };
                match session.handle(Event::ToggleBookmark(id.clone())).await {
                    StateDelta::BookmarkAdded(_) => print_info(
                        &format!("★ Bookmarked {id} ({} saved)", session.bookmarks().len()),
                        &palette,
                    ),
                    StateDelta::BookmarkRemoved(_) => print_info(
                        &format!("☆ Removed bookmark {id} ({} saved)", session.bookmarks().len()),
                        &palette,
                    ),
                    _ => print_info(
                        &format!("No answer with id {id} in this conversation."),
                        &palette,
                    ),
                }
            }
            CommandResult::ListBookmarks => print_bookmarks(session.bookmarks(), &palette),
            CommandResult::ToggleTheme => {
                if let StateDelta::ThemeChanged(theme) = session.handle(Event::ToggleTheme).await {
                    palette = Palette::for_theme(theme);
                    print_info(&format!("Theme: {theme}"), &palette);
                }
            }
            CommandResult::SetTheme(theme) => {
                if session.theme() != theme {
                    session.handle(Event::ToggleTheme).await;
                }
                palette = Palette::for_theme(session.theme());
                print_info(&format!("Theme: {}", session.theme()), &palette);
            }
            CommandResult::ShowHistory => {
                for message in session.conversation().messages() {
                    let saved = message
                        .id
                        .as_deref()
                        .is_some_and(|id| session.is_bookmarked(id));
                    print_message(message, saved, &palette);
                }
            }
            CommandResult::Message(text) => print_info(&text, &palette),
            CommandResult::Quit => break,
        }
    }

    session.close()?;
    Ok(())
}

// ── Output ──────────────────────────────────────────────────────────────

fn show_typing_indicator(palette: &Palette) -> io::Result<()> {
    let mut stdout = io::stdout();
    let indicator = format!("{} is typing…", persona::CHATBOT_NAME);
    print!("{}", indicator.with(palette.muted).italic());
    stdout.flush()
}

fn hide_typing_indicator() -> io::Result<()> {
    execute!(io::stdout(), cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))
}

fn print_info(text: &str, palette: &Palette) {
    println!("{}", text.with(palette.muted));
    println!();
}

fn print_message(message: &Message, bookmarked: bool, palette: &Palette) {
    match message.sender {
        Sender::User => {
            println!(
                "{}{}",
                "You > ".with(palette.user_color).bold(),
                message.text.as_str().with(palette.fg)
            );
        }
        Sender::Assistant => {
            let label = format!("{} >", persona::CHATBOT_NAME);
            println!("{}", label.with(palette.assistant_color).bold());
            print_markdown(&message.text, palette);
            if let Some(ref id) = message.id {
                println!("{}", bookmark_footer(id, bookmarked).with(palette.bookmark));
            }
        }
    }
    println!();
}

fn bookmark_footer(id: &str, bookmarked: bool) -> String {
    if bookmarked {
        format!("★ {id}")
    } else {
        format!("☆ {id}  (/bookmark to save)")
    }
}

fn print_bookmarks(bookmarks: &[Bookmark], palette: &Palette) {
    if bookmarks.is_empty() {
        print_info("You haven't bookmarked any answers yet.", palette);
        return;
    }
    println!("{}", format!("Bookmarks ({})", bookmarks.len()).with(palette.accent).bold());
    println!();
    for bookmark in bookmarks {
        println!(
            "{}",
            format!("Q: {}", bookmark.question).with(palette.heading).bold()
        );
        print_markdown(&bookmark.answer, palette);
        println!("{}", format!("   {}", bookmark.id).with(palette.muted));
        println!();
    }
}

fn print_markdown(source: &str, palette: &Palette) {
    for line in render_markdown(source) {
        let styled = match line.kind {
            LineKind::Heading => line.text.with(palette.heading).bold(),
            LineKind::Body => line.text.with(palette.fg),
            LineKind::Code => line.text.with(palette.code_fg),
            LineKind::Rule => line.text.with(palette.muted),
        };
        println!("{styled}");
    }
}
