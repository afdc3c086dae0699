//! TUI Views
//!
//! Single chat screen: header, scrolling transcript, status line, input box.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::colors;
use super::state::AppState;
use crate::llm::Role;
use crate::session::{EntryKind, TranscriptEntry};

/// Shown while a turn is in flight
pub const LOADING_TEXT: &str = "⏳ Processing your question...";

const PLACEHOLDER: &str = "Ask your question:";

/// Draw the whole screen
pub fn render(state: &AppState, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);
    render_transcript(state, frame, chunks[1]);
    render_status(state, frame, chunks[2]);
    render_input(state, frame, chunks[3]);
}

fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(state.header_string())
        .style(Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD));
    frame.render_widget(header, area);
}

fn render_transcript(state: &AppState, frame: &mut Frame, area: Rect) {
    let transcript = Paragraph::new(transcript_lines(&state.transcript)).wrap(Wrap { trim: false });

    // Inside the borders
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    let offset = scroll_offset(wrapped_height(&transcript, inner_width), inner_height, state.scroll);

    let transcript = transcript
        .scroll((offset, 0))
        .block(Block::default().borders(Borders::ALL).title(" Transcript "));
    frame.render_widget(transcript, area);
}

fn render_status(state: &AppState, frame: &mut Frame, area: Rect) {
    let status = if state.in_flight {
        Paragraph::new(LOADING_TEXT).style(Style::default().fg(colors::PENDING))
    } else {
        Paragraph::new("Enter: ask │ ↑/↓ PgUp/PgDn: scroll │ Esc: quit").style(Style::default().fg(colors::DIM))
    };
    frame.render_widget(status, area);
}

fn render_input(state: &AppState, frame: &mut Frame, area: Rect) {
    let input = if state.input.is_empty() {
        Paragraph::new(PLACEHOLDER).style(Style::default().fg(colors::DIM))
    } else {
        Paragraph::new(state.input.as_str())
    };
    frame.render_widget(input.block(Block::default().borders(Borders::ALL).title(" Question ")), area);

    if !state.in_flight {
        let cursor_x = area.x + 1 + (state.input.chars().count() as u16).min(area.width.saturating_sub(3));
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

/// One styled line per transcript line; the role label starts each entry
pub fn transcript_lines(entries: &[TranscriptEntry]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for entry in entries {
        let (label_style, text_style) = entry_styles(entry);
        let label = format!("{}: ", entry.role.label());

        let mut text_lines = entry.text.lines();
        let first = text_lines.next().unwrap_or("");
        lines.push(Line::from(vec![
            Span::styled(label, label_style.add_modifier(Modifier::BOLD)),
            Span::styled(first.to_string(), text_style),
        ]));
        for rest in text_lines {
            lines.push(Line::from(Span::styled(rest.to_string(), text_style)));
        }
        lines.push(Line::default());
    }

    lines
}

fn entry_styles(entry: &TranscriptEntry) -> (Style, Style) {
    match (entry.kind, entry.role) {
        (EntryKind::Error, _) => (Style::default().fg(colors::ERROR), Style::default().fg(colors::ERROR)),
        (EntryKind::Normal, Role::User) => (Style::default().fg(colors::USER), Style::default()),
        (EntryKind::Normal, Role::Assistant) => (Style::default().fg(colors::ASSISTANT), Style::default()),
    }
}

/// Rows the paragraph takes once word-wrapped to `width` columns
pub fn wrapped_height(paragraph: &Paragraph, width: u16) -> u16 {
    u16::try_from(paragraph.line_count(width)).unwrap_or(u16::MAX)
}

/// Top row to show so the newest line sits at the bottom, minus `scroll_back`
pub fn scroll_offset(content_height: u16, view_height: u16, scroll_back: u16) -> u16 {
    content_height.saturating_sub(view_height).saturating_sub(scroll_back)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn entry(role: Role, text: &str, kind: EntryKind) -> TranscriptEntry {
        TranscriptEntry {
            role,
            text: text.to_string(),
            kind,
        }
    }

    fn screen_text(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| render(state, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_transcript_lines_labels() {
        let lines = transcript_lines(&[
            entry(Role::User, "What is the capital of France?", EntryKind::Normal),
            entry(Role::Assistant, "Paris", EntryKind::Normal),
        ]);

        // Each entry is followed by a blank spacer line
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].spans[0].content, "user: ");
        assert_eq!(lines[2].spans[0].content, "assistant: ");
        assert_eq!(lines[2].spans[1].content, "Paris");
    }

    #[test]
    fn test_transcript_lines_multiline_text() {
        let lines = transcript_lines(&[entry(
            Role::Assistant,
            "Published: 2017-06-12\nTitle: Attention Is All You Need",
            EntryKind::Normal,
        )]);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].spans[0].content, "Title: Attention Is All You Need");
    }

    #[test]
    fn test_error_entry_style() {
        let lines = transcript_lines(&[entry(Role::Assistant, "Error processing query: boom", EntryKind::Error)]);
        assert_eq!(lines[0].spans[1].style.fg, Some(colors::ERROR));
    }

    fn wrapped(lines: Vec<Line<'static>>) -> Paragraph<'static> {
        Paragraph::new(lines).wrap(Wrap { trim: false })
    }

    #[test]
    fn test_wrapped_height() {
        let paragraph = wrapped(vec![Line::from("a".repeat(25)), Line::default(), Line::from("short")]);
        assert_eq!(wrapped_height(&paragraph, 10), 3 + 1 + 1);
        assert_eq!(wrapped_height(&paragraph, 0), 0);
    }

    #[test]
    fn test_wrapped_height_breaks_on_words() {
        // 20 chars fit in two 10-column rows, but no word may be split
        let paragraph = wrapped(vec![Line::from("aaaaaa bbbbbb cccccc")]);
        assert_eq!(wrapped_height(&paragraph, 10), 3);
    }

    #[test]
    fn test_scroll_offset() {
        assert_eq!(scroll_offset(5, 10, 0), 0);
        assert_eq!(scroll_offset(30, 10, 0), 20);
        assert_eq!(scroll_offset(30, 10, 5), 15);
        assert_eq!(scroll_offset(30, 10, 100), 0);
    }

    #[test]
    fn test_render_transcript_and_placeholder() {
        let mut state = AppState::new("mock-model", "12:00");
        state.set_transcript(vec![
            entry(Role::User, "What is the capital of France?", EntryKind::Normal),
            entry(Role::Assistant, "Paris", EntryKind::Normal),
        ]);

        let text = screen_text(&state);
        assert!(text.contains("mock-model"));
        assert!(text.contains("user: What is the capital of France?"));
        assert!(text.contains("assistant: Paris"));
        assert!(text.contains(PLACEHOLDER));
        assert!(!text.contains("Processing your question"));
    }

    #[test]
    fn test_long_answer_tail_visible() {
        let mut answer: Vec<String> = (0..60).map(|i| format!("word{:05}", i)).collect();
        answer.push("ENDMARKER".to_string());

        let mut state = AppState::new("mock-model", "12:00");
        state.set_transcript(vec![entry(Role::Assistant, &answer.join(" "), EntryKind::Normal)]);

        let mut terminal = Terminal::new(TestBackend::new(40, 14)).unwrap();
        terminal.draw(|f| render(&state, f)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("ENDMARKER"));
    }

    #[test]
    fn test_render_loading_indicator() {
        let mut state = AppState::new("mock-model", "12:00");
        state.in_flight = true;
        assert!(screen_text(&state).contains("Processing your question..."));
    }
}
