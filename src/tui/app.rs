//! TUI Application
//!
//! Owns the `AppState` and turns key presses into state changes. Anything
//! that needs the network (submitting a question) is left as a pending
//! action for the runner.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::AppState;

/// Main TUI application
#[derive(Debug)]
pub struct App {
    state: AppState,
    page_size: u16,
}

impl App {
    /// Create a new application
    pub fn new(state: AppState, page_size: u16) -> Self {
        Self { state, page_size }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if is_quit(&key) {
            self.quit();
            return true;
        }

        // Input is closed while a turn runs
        if self.state.in_flight {
            return false;
        }

        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.state.input.pop();
            }
            KeyCode::Up => self.state.scroll_up(1),
            KeyCode::Down => self.state.scroll_down(1),
            KeyCode::PageUp => self.state.scroll_up(self.page_size),
            KeyCode::PageDown => self.state.scroll_down(self.page_size),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.input.push(c);
            }
            _ => {}
        }

        false
    }

    /// Append pasted text to the input, flattened to one line
    pub fn handle_paste(&mut self, text: &str) {
        if self.state.in_flight {
            return;
        }
        let flattened: Vec<&str> = text.split_whitespace().collect();
        if !self.state.input.is_empty() && !flattened.is_empty() && !self.state.input.ends_with(' ') {
            self.state.input.push(' ');
        }
        self.state.input.push_str(&flattened.join(" "));
    }

    /// Queue the input as a question; blank input is ignored
    fn submit(&mut self) {
        let question = self.state.input.trim().to_string();
        if question.is_empty() {
            return;
        }
        self.state.input.clear();
        self.state.pending_submit = Some(question);
    }

    /// Request to quit
    pub fn quit(&mut self) {
        self.state.should_quit = true;
    }
}

/// Esc or Ctrl+C
fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
