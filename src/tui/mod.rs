//! Windowed chat: a full-screen transcript with an entry box.
//!
//! Enter sends the current input through the agent; Esc (or Ctrl-C) quits.
//! The terminal is switched to the alternate screen for the duration and
//! restored on the way out, including on error.

mod app_state;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;

use crate::agent::Agent;
use crate::app::App;
use crate::errors::AppError;
use app_state::{Speaker, TuiState};

pub async fn run(app: &App) -> Result<(), AppError> {
    app.check_provider().await;

    let documents = app.load_data_dir()?;
    let mut agent = app.build_agent(&documents).await?;
    let mut state = TuiState::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(AppError::internal)?;

    let result = run_loop(&mut terminal, &mut state, &mut agent).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor().map_err(AppError::internal)?;

    result
}

async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut TuiState,
    agent: &mut Agent,
) -> Result<(), AppError> {
    loop {
        terminal
            .draw(|f| ui::draw(f, state))
            .map_err(AppError::internal)?;

        if state.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(input) = handle_key(state, key.code, key.modifiers) {
                    send(terminal, state, agent, &input).await?;
                }
            }
        }
    }
}

/// Mutate state for a key press; returns the input to send, if any.
fn handle_key(state: &mut TuiState, code: KeyCode, modifiers: KeyModifiers) -> Option<String> {
    match code {
        KeyCode::Esc => state.quit = true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => state.quit = true,
        KeyCode::Enter if !state.busy => return state.take_input(),
        KeyCode::Backspace => {
            state.input.pop();
        }
        KeyCode::Up => state.scroll_up(1),
        KeyCode::Down => state.scroll_down(1),
        KeyCode::PageUp => state.scroll_up(10),
        KeyCode::PageDown => state.scroll_down(10),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => state.input.push(c),
        _ => {}
    }
    None
}

async fn send<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut TuiState,
    agent: &mut Agent,
    input: &str,
) -> Result<(), AppError> {
    state.push_turn(Speaker::User, input);
    state.busy = true;
    terminal
        .draw(|f| ui::draw(f, state))
        .map_err(AppError::internal)?;

    match agent.query_with_memory(input).await {
        Ok(reply) => state.push_turn(Speaker::Bot, reply),
        Err(err) => {
            tracing::error!("query failed: {}", err);
            state.push_turn(Speaker::Bot, format!("error: {}", err));
        }
    }

    state.busy = false;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn esc_quits() {
        let mut state = TuiState::new();
        assert!(handle_key(&mut state, KeyCode::Esc, KeyModifiers::NONE).is_none());
        assert!(state.quit);
    }

    #[test]
    fn enter_takes_input_only_when_idle() {
        let mut state = TuiState::new();
        state.input = "question".to_string();
        assert_eq!(
            handle_key(&mut state, KeyCode::Enter, KeyModifiers::NONE),
            Some("question".to_string())
        );

        state.input = "another".to_string();
        state.busy = true;
        assert_eq!(handle_key(&mut state, KeyCode::Enter, KeyModifiers::NONE), None);
    }

    #[test]
    fn typing_edits_the_input_buffer() {
        let mut state = TuiState::new();
        handle_key(&mut state, KeyCode::Char('h'), KeyModifiers::NONE);
        handle_key(&mut state, KeyCode::Char('i'), KeyModifiers::NONE);
        assert_eq!(state.input, "hi");
        handle_key(&mut state, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(state.input, "h");
    }
}
