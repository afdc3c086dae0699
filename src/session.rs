//! Session - owns the conversation history for one UI session
//!
//! The session is the only place the history is mutated: the user's
//! question is appended before a turn runs, the turn's messages after it
//! succeeds. A failed turn leaves just the question, plus an error
//! annotation for the transcript.

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::dispatcher::{Dispatcher, NO_RESPONSE, Outcome};
use crate::error::Result;
use crate::llm::{Message, Role};

/// Kind of a rendered transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Normal,
    /// Inline error annotation for a failed turn
    Error,
}

/// One line of the rendered transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub role: Role,
    pub text: String,
    pub kind: EntryKind,
}

impl TranscriptEntry {
    fn normal(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            kind: EntryKind::Normal,
        }
    }
}

/// Error text attached after a history entry
#[derive(Debug, Clone)]
struct Annotation {
    after: usize,
    text: String,
}

/// Ordered history plus UI-session bookkeeping
#[derive(Debug)]
pub struct Session {
    history: Vec<Message>,
    annotations: Vec<Annotation>,
    created_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            annotations: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Run one turn for `text`
    ///
    /// The question stays in the history whatever happens. On failure the
    /// error is recorded for the transcript and returned.
    pub async fn submit(&mut self, dispatcher: &Dispatcher, text: &str) -> Result<Outcome> {
        self.history.push(Message::user(text));
        let question_index = self.history.len() - 1;

        match dispatcher.run(&self.history).await {
            Ok(turn) => {
                info!("Appending {} messages from turn", turn.messages.len());
                self.history.extend(turn.messages);
                Ok(turn.outcome)
            }
            Err(e) => {
                warn!("Turn failed: {}", e);
                self.annotations.push(Annotation {
                    after: question_index,
                    text: format!("Error processing query: {}", e),
                });
                Err(e)
            }
        }
    }

    /// Rendered transcript, in history order with error annotations inline
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        let mut entries = Vec::with_capacity(self.history.len() + self.annotations.len());

        for (index, message) in self.history.iter().enumerate() {
            entries.push(render_message(message));
            entries.extend(
                self.annotations
                    .iter()
                    .filter(|a| a.after == index)
                    .map(|a| TranscriptEntry {
                        role: Role::Assistant,
                        text: a.text.clone(),
                        kind: EntryKind::Error,
                    }),
            );
        }

        entries
    }

    /// Clear everything; for an external reset action
    pub fn reset(&mut self) {
        self.history.clear();
        self.annotations.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn render_message(message: &Message) -> TranscriptEntry {
    match message {
        Message::User(user) => TranscriptEntry::normal(Role::User, user.text.clone()),
        Message::Assistant(reply) if !reply.text.trim().is_empty() => {
            TranscriptEntry::normal(Role::Assistant, reply.text.clone())
        }
        Message::Assistant(reply) => match reply.tool_requests.first() {
            Some(request) => TranscriptEntry::normal(
                Role::Assistant,
                format!("Fetching information from {}...", request.tool_name),
            ),
            None => TranscriptEntry::normal(Role::Assistant, NO_RESPONSE),
        },
        Message::ToolResult(result) => TranscriptEntry::normal(Role::Assistant, result.text.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::llm::{AssistantMessage, ToolRequest};

    #[test]
    fn test_new_session_empty() {
        let session = Session::new();
        assert!(session.is_empty());
        assert!(session.transcript().is_empty());
        assert!(session.created_at() <= Utc::now());
    }

    #[test]
    fn test_render_plain_messages() {
        assert_eq!(
            render_message(&Message::user("hi")),
            TranscriptEntry::normal(Role::User, "hi")
        );
        assert_eq!(
            render_message(&Message::assistant("Paris")),
            TranscriptEntry::normal(Role::Assistant, "Paris")
        );
    }

    #[test]
    fn test_render_tool_request_and_result() {
        let mut args = BTreeMap::new();
        args.insert("query".to_string(), "transformers".to_string());
        let request = ToolRequest::new("c1", "arxiv", args);

        let asked = render_message(&Message::Assistant(AssistantMessage::with_requests(vec![request.clone()])));
        assert_eq!(asked.text, "Fetching information from arxiv...");
        assert_eq!(asked.role, Role::Assistant);

        let result = render_message(&Message::tool_result(&request, "Attention Is All You Need"));
        assert_eq!(result.text, "Attention Is All You Need");
        assert_eq!(result.role, Role::Assistant);
    }

    #[test]
    fn test_render_empty_reply() {
        let entry = render_message(&Message::Assistant(AssistantMessage::default()));
        assert_eq!(entry.text, NO_RESPONSE);
    }

    #[test]
    fn test_annotations_follow_their_question() {
        let mut session = Session::new();
        session.history.push(Message::user("first"));
        session.annotations.push(Annotation {
            after: 0,
            text: "Error processing query: boom".to_string(),
        });
        session.history.push(Message::user("second"));
        session.history.push(Message::assistant("ok"));

        let transcript = session.transcript();
        let texts: Vec<&str> = transcript.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "Error processing query: boom", "second", "ok"]);
        assert_eq!(transcript[1].kind, EntryKind::Error);
        assert_eq!(transcript[3].kind, EntryKind::Normal);
    }

    #[test]
    fn test_reset_clears() {
        let mut session = Session::new();
        session.history.push(Message::user("q"));
        session.annotations.push(Annotation {
            after: 0,
            text: "err".to_string(),
        });
        session.reset();
        assert!(session.is_empty());
        assert!(session.transcript().is_empty());
    }
}
