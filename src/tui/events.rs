//! TUI Event System
//!
//! Terminal input and export notices, funneled into one channel.

use crate::wizard::ExportFinished;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

/// Everything the wizard loop reacts to
#[derive(Debug, Clone)]
pub enum TuiEvent {
    /// User pressed a key
    Key(KeyEvent),

    /// User pasted text
    Paste(String),

    /// Terminal was resized
    Resize(u16, u16),

    /// The simulated build timer fired
    ExportFinished(ExportFinished),

    /// Terminal input closed
    Quit,

    /// Spinner frame
    Tick,
}

/// Owns both ends of the event channel
pub struct EventHandler {
    tx: mpsc::UnboundedSender<TuiEvent>,
    rx: mpsc::UnboundedReceiver<TuiEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Sender for the listener task and the export timer
    pub fn sender(&self) -> mpsc::UnboundedSender<TuiEvent> {
        self.tx.clone()
    }

    /// Wait for the next event
    pub async fn next(&mut self) -> Option<TuiEvent> {
        self.rx.recv().await
    }

    /// Pop a queued event, if any
    pub fn try_next(&mut self) -> Option<TuiEvent> {
        self.rx.try_recv().ok()
    }

    /// Spawn the terminal reader
    ///
    /// Uses crossterm's async EventStream so the export timer and the input
    /// reader share the runtime without blocking each other.
    pub fn start_terminal_listener(tx: mpsc::UnboundedSender<TuiEvent>) {
        use crossterm::event::{Event, EventStream, KeyEventKind};
        use futures::StreamExt;

        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let tick_interval = std::time::Duration::from_millis(100);

            loop {
                let event = tokio::select! {
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(event)) => Some(event),
                            Some(Err(e)) => {
                                tracing::warn!("Terminal event error: {}", e);
                                None
                            }
                            None => {
                                let _ = tx.send(TuiEvent::Quit);
                                break;
                            }
                        }
                    }
                    _ = tokio::time::sleep(tick_interval) => None,
                };

                if let Some(event) = event {
                    let should_break = match event {
                        // Only key presses, releases would double every keystroke
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            tx.send(TuiEvent::Key(key)).is_err()
                        }
                        Event::Resize(w, h) => tx.send(TuiEvent::Resize(w, h)).is_err(),
                        Event::Paste(text) => tx.send(TuiEvent::Paste(text)).is_err(),
                        _ => false,
                    };
                    if should_break {
                        break;
                    }
                }

                if tx.send(TuiEvent::Tick).is_err() {
                    break;
                }
            }
        });
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Exact code and modifier match
pub fn key_matches(event: &KeyEvent, code: KeyCode, modifiers: KeyModifiers) -> bool {
    event.code == code && event.modifiers == modifiers
}

/// Common key bindings
pub mod keys {
    use super::*;

    /// Ctrl+C - Quit
    pub fn is_quit(event: &KeyEvent) -> bool {
        key_matches(event, KeyCode::Char('c'), KeyModifiers::CONTROL)
    }

    /// Ctrl+S - Save the draft as a preset
    pub fn is_save_preset(event: &KeyEvent) -> bool {
        key_matches(event, KeyCode::Char('s'), KeyModifiers::CONTROL)
    }

    /// Escape - Back
    pub fn is_cancel(event: &KeyEvent) -> bool {
        event.code == KeyCode::Esc
    }

    /// Enter - Next step / run action
    pub fn is_enter(event: &KeyEvent) -> bool {
        event.code == KeyCode::Enter && event.modifiers.is_empty()
    }

    /// Tab - Next field
    pub fn is_next_field(event: &KeyEvent) -> bool {
        event.code == KeyCode::Tab
    }

    /// Shift+Tab - Previous field
    pub fn is_prev_field(event: &KeyEvent) -> bool {
        event.code == KeyCode::BackTab
    }

    /// Up arrow
    pub fn is_up(event: &KeyEvent) -> bool {
        event.code == KeyCode::Up && event.modifiers.is_empty()
    }

    /// Down arrow
    pub fn is_down(event: &KeyEvent) -> bool {
        event.code == KeyCode::Down && event.modifiers.is_empty()
    }

    /// Left arrow
    pub fn is_left(event: &KeyEvent) -> bool {
        event.code == KeyCode::Left && event.modifiers.is_empty()
    }

    /// Right arrow
    pub fn is_right(event: &KeyEvent) -> bool {
        event.code == KeyCode::Right && event.modifiers.is_empty()
    }

    /// Space - Toggle
    pub fn is_toggle(event: &KeyEvent) -> bool {
        event.code == KeyCode::Char(' ') && event.modifiers.is_empty()
    }
}
