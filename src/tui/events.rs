//! Event handling for the TUI.
//!
//! This module provides:
//! - `Event`: The unified event type (keyboard, paste, tick, resize)
//! - `EventHandler`: Polls crossterm with a tick timeout

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use eyre::Result;
use std::time::Duration;

/// Unified event type for the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),
    /// Bracketed paste
    Paste(String),
    /// Poll timeout with no input
    Tick,
    /// Terminal resize
    Resize(u16, u16),
}

/// Handles keyboard and tick events.
pub struct EventHandler {
    /// Tick rate in milliseconds
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler with the given tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Get the next event, or `Tick` when the poll times out.
    pub async fn next(&self) -> Result<Event> {
        // crossterm polling blocks, keep it off the runtime threads
        let tick_rate = self.tick_rate;

        let event = tokio::task::spawn_blocking(move || -> Result<Event> {
            if !event::poll(tick_rate)? {
                return Ok(Event::Tick);
            }
            Ok(translate(event::read()?))
        })
        .await??;

        Ok(event)
    }
}

/// Map a crossterm event onto ours; key releases and repeats become ticks
fn translate(event: CrosstermEvent) -> Event {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
        CrosstermEvent::Paste(text) => Event::Paste(text),
        CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
        _ => Event::Tick,
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(250)
    }
}
