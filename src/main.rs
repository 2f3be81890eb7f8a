use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use cardiobot::app::App;
use cardiobot::config::AppPaths;
use cardiobot::{chat, logging, tui};

#[derive(Parser)]
#[command(name = "cardiobot", about = "Document-grounded chatbot", version)]
struct Cli {
    /// Data directory (documents, index cache, notes, logs)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Terminal chat loop: enter sources, then ask questions
    Chat,
    /// Full-screen chat window over the documents in the data directory
    Tui,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => AppPaths::with_data_dir(dir),
        None => AppPaths::new(),
    };

    let command = cli.command.unwrap_or(Command::Chat);

    // The TUI owns the terminal; keep logs off stdout there.
    let with_stdout = matches!(command, Command::Chat);
    logging::init(&paths, with_stdout);

    let app = App::initialize(paths).context("failed to initialize")?;

    match command {
        Command::Chat => chat::run(&app).await.context("chat session failed")?,
        Command::Tui => tui::run(&app).await.context("chat window failed")?,
    }

    Ok(())
}
