//! TUI Runner - main event loop.
//!
//! The `TuiRunner` owns the terminal, app, session and dispatcher. It runs
//! the main loop: render → handle events → run a pending turn → repeat.
//! A turn runs to completion before the next event is read.

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::state::AppState;
use super::views::render;
use crate::dispatcher::Dispatcher;
use crate::llm::Role;
use crate::session::{EntryKind, Session, TranscriptEntry};
use eyre::Result;
use log::{error, info};

/// Main TUI runner that owns the event loop.
pub struct TuiRunner {
    /// The terminal instance
    terminal: Tui,
    /// Application state and input handling
    app: App,
    /// Event handler for keyboard and tick events
    event_handler: EventHandler,
    /// Conversation history for this UI session
    session: Session,
    dispatcher: Dispatcher,
}

impl TuiRunner {
    /// Create a new TUI runner.
    pub fn new(terminal: Tui, dispatcher: Dispatcher, tick_rate_ms: u64, page_size: u16) -> Self {
        let session = Session::new();
        let started = session.created_at().with_timezone(&chrono::Local).format("%H:%M").to_string();
        let state = AppState::new(dispatcher.model(), started);

        Self {
            terminal,
            app: App::new(state, page_size),
            event_handler: EventHandler::new(tick_rate_ms),
            session,
            dispatcher,
        }
    }

    /// Run the main TUI loop.
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting TUI main loop");

        loop {
            self.draw()?;

            match self.event_handler.next().await? {
                Event::Key(key) => {
                    if self.app.handle_key(key) {
                        break;
                    }
                }
                Event::Paste(text) => self.app.handle_paste(&text),
                // Nothing to refresh between turns; resize is picked up on the next draw
                Event::Tick | Event::Resize(_, _) => {}
            }

            if let Some(question) = self.app.state_mut().pending_submit.take() {
                self.run_turn(&question).await?;
            }

            if self.app.state().should_quit {
                break;
            }
        }

        info!("TUI main loop ended");
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let state = self.app.state();
        self.terminal.draw(|f| render(state, f))?;
        Ok(())
    }

    /// Show the question and the loading indicator, then block on the turn
    async fn run_turn(&mut self, question: &str) -> Result<()> {
        info!("Submitting question ({} chars)", question.len());

        let mut preview = self.session.transcript();
        preview.push(TranscriptEntry {
            role: Role::User,
            text: question.to_string(),
            kind: EntryKind::Normal,
        });
        self.app.state_mut().set_transcript(preview);
        self.app.state_mut().in_flight = true;
        self.draw()?;

        // Turn errors are shown inline by the session transcript; the UI keeps going
        if let Err(e) = self.session.submit(&self.dispatcher, question).await {
            error!("Turn failed: {}", e);
        }

        let transcript = self.session.transcript();
        let state = self.app.state_mut();
        state.in_flight = false;
        state.set_transcript(transcript);
        Ok(())
    }
}
