//! Application state for the TUI.
//!
//! `AppState` is everything the views need to draw a frame. The transcript
//! is a snapshot taken from the `Session` after each turn.

use crate::session::TranscriptEntry;

/// The primary application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Model identifier shown in the header
    pub model: String,
    /// When the session started, preformatted for the header
    pub session_started: String,

    // Chat state
    /// Rendered transcript
    pub transcript: Vec<TranscriptEntry>,
    /// Current input buffer
    pub input: String,
    /// Lines scrolled up from the bottom of the transcript
    pub scroll: u16,
    /// Whether a turn is in flight (drives the loading indicator)
    pub in_flight: bool,

    // Pending actions (processed by runner)
    /// Question to submit on the next runner pass
    pub pending_submit: Option<String>,

    // Control flags
    /// Whether the application should quit
    pub should_quit: bool,
}

impl AppState {
    /// Create a new state for the given model.
    pub fn new(model: impl Into<String>, session_started: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            session_started: session_started.into(),
            ..Default::default()
        }
    }

    /// Header text: title, model, session start.
    pub fn header_string(&self) -> String {
        format!(
            "Question-Answering Research Bot │ {} │ since {}",
            self.model, self.session_started
        )
    }

    /// Replace the transcript snapshot and jump back to the newest line.
    pub fn set_transcript(&mut self, transcript: Vec<TranscriptEntry>) {
        self.transcript = transcript;
        self.scroll = 0;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }
}
