use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use cyberlaw_cli::app;
use cyberlaw_core::Settings;

#[derive(Parser)]
#[command(name = "cyberlaw")]
#[command(about = "Cyber Law Bot - ask questions about Indian Cyber Law")]
#[command(version)]
struct Cli {
    /// Ask a single question and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Gemini model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Path to a config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the bookmark/theme storage file
    #[arg(long)]
    storage: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = match cli.config {
        Some(ref path) => Settings::load_from(path),
        None => Settings::load(),
    };

    if let Some(model) = cli.model {
        settings.llm.model = model;
    }
    if let Some(storage) = cli.storage {
        settings.storage.path = Some(storage);
    }

    if let Some(prompt) = cli.prompt {
        return app::run_single_prompt(&settings, &prompt).await;
    }
    app::run_repl(settings).await?;

    Ok(ExitCode::SUCCESS)
}
