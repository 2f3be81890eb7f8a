//! Terminal chat loop: collect sources, index them, answer prompts.

use std::io::{self, BufRead, Write};

use crate::app::App;
use crate::errors::AppError;

const SOURCE_SENTINEL: &str = "done";
const QUIT_SENTINEL: &str = "q";

pub async fn run(app: &App) -> Result<(), AppError> {
    app.check_provider().await;

    let sources = read_sources()?;
    if sources.is_empty() {
        println!("No knowledge base provided. Exiting.");
        return Ok(());
    }

    let documents = app.load_sources(&sources).await?;
    let mut agent = app.build_agent(&documents).await?;
    println!("Knowledge base uploaded and indexed successfully.");

    let stdin = io::stdin();
    loop {
        print!("Enter a prompt ({} to quit): ", QUIT_SENTINEL);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if prompt.eq_ignore_ascii_case(QUIT_SENTINEL) {
            break;
        }

        match agent.query_with_memory(prompt).await {
            Ok(reply) => println!("{}", reply),
            Err(err) => {
                tracing::error!("query failed: {}", err);
                eprintln!("error: {}", err);
            }
        }
    }

    Ok(())
}

fn read_sources() -> Result<Vec<String>, AppError> {
    println!(
        "Enter the knowledge base (document paths or URLs) one by one. Type '{}' when you are finished:",
        SOURCE_SENTINEL
    );

    let stdin = io::stdin();
    let mut sources = Vec::new();
    loop {
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let source = line.trim();
        if source.eq_ignore_ascii_case(SOURCE_SENTINEL) {
            break;
        }
        if !source.is_empty() {
            sources.push(source.to_string());
        }
    }

    Ok(sources)
}
