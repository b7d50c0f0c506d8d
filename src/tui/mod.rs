//! Terminal UI
//!
//! Full-screen wizard built on ratatui and crossterm.

pub mod app;
pub mod events;
pub mod form;
pub mod preview_render;
pub mod render;

pub use app::App;
pub use events::{EventHandler, TuiEvent};

use crate::error::{self, AppForgeError};
use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

/// Run the TUI until the user quits
pub async fn run(mut app: App) -> Result<()> {
    let mut terminal = setup_terminal().context("Failed to set up terminal")?;

    EventHandler::start_terminal_listener(app.event_sender());

    let result = run_loop(&mut terminal, &mut app).await;

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

fn setup_terminal() -> error::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().map_err(terminal_error)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste).map_err(terminal_error)?;
    Terminal::new(CrosstermBackend::new(stdout)).map_err(terminal_error)
}

fn terminal_error(e: io::Error) -> AppForgeError {
    tracing::error!("Terminal setup failed: {}", e);
    AppForgeError::Terminal(e)
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| render::render(f, app))?;

        let Some(event) = app.next_event().await else {
            break;
        };
        app.handle_event(event).await?;

        // Drain whatever queued up while handling, then redraw once
        while let Some(event) = app.try_next_event() {
            app.handle_event(event).await?;
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
