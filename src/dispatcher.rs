//! Dispatcher - the two-node control graph for one turn
//!
//! A turn starts at `Generate` (ask the model). If the reply requests a
//! tool, the graph moves to `ExecuteTool`, serves exactly one request, and
//! stops. Otherwise it stops right away. There is never a second model call;
//! the tool's output is what the user sees.
//!
//! The dispatcher holds no conversation state. It borrows the history,
//! returns the messages the turn produced, and leaves appending them to
//! the caller.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::error::{AskrError, Result};
use crate::llm::{AssistantMessage, Message, ModelClient, ToolRequest};
use crate::tools::ToolRegistry;

/// Nodes of the control graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Generate,
    ExecuteTool,
    Terminal,
}

/// Pick the node after `current`, given the last message it produced
pub fn next_node(current: Node, last: &Message) -> Node {
    match current {
        Node::Generate => match last.as_assistant() {
            Some(reply) if reply.has_tool_requests() => Node::ExecuteTool,
            _ => Node::Terminal,
        },
        Node::ExecuteTool | Node::Terminal => Node::Terminal,
    }
}

/// What the user gets to see for a finished turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The model answered directly
    Answer(String),
    /// A tool ran; its raw output is the answer
    ToolOutput { tool: String, content: String },
    /// The model returned neither text nor a tool request
    NoResponse,
}

impl Outcome {
    /// Text rendered for this outcome
    pub fn display_text(&self) -> &str {
        match self {
            Outcome::Answer(text) => text,
            Outcome::ToolOutput { content, .. } => content,
            Outcome::NoResponse => NO_RESPONSE,
        }
    }
}

/// Shown when the model produced nothing usable
pub const NO_RESPONSE: &str = "No response generated.";

/// Result of a successful turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// New messages, in order, for the caller to append
    pub messages: Vec<Message>,
    pub outcome: Outcome,
    /// Nodes visited, starting at `Generate` and ending at `Terminal`
    pub path: Vec<Node>,
}

/// Runs one turn against a model and a fixed tool registry
pub struct Dispatcher {
    model: Arc<dyn ModelClient>,
    tools: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(model: Arc<dyn ModelClient>, tools: Arc<ToolRegistry>) -> Self {
        Self { model, tools }
    }

    pub fn model(&self) -> &str {
        self.model.model()
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run the graph from `Generate` to `Terminal` over `history`
    ///
    /// On error nothing is returned; the caller's history stays as it was.
    pub async fn run(&self, history: &[Message]) -> Result<Turn> {
        if !history.iter().any(Message::is_user) {
            return Err(AskrError::InvalidHistory(
                "history must contain at least one user message".to_string(),
            ));
        }

        info!("Turn started ({} messages in history)", history.len());

        let mut produced: Vec<Message> = Vec::new();
        let mut node = Node::Generate;
        let mut path = vec![node];

        while node != Node::Terminal {
            let message = match node {
                Node::Generate => Message::Assistant(keep_first_request(self.generate(history).await?)),
                Node::ExecuteTool => self.execute_tool(&produced).await?,
                Node::Terminal => break,
            };
            node = next_node(node, &message);
            debug!("Transition -> {:?}", node);
            produced.push(message);
            path.push(node);
        }

        let outcome = outcome_of(&produced);
        info!("Turn finished via {:?}", path);
        Ok(Turn {
            messages: produced,
            outcome,
            path,
        })
    }

    async fn generate(&self, history: &[Message]) -> Result<AssistantMessage> {
        self.model.generate(history).await.inspect_err(|e| {
            warn!("Model call failed: {}", e);
        })
    }

    /// Serve the tool request of the reply that precedes this node
    async fn execute_tool(&self, produced: &[Message]) -> Result<Message> {
        let request = produced
            .last()
            .and_then(Message::as_assistant)
            .and_then(|reply| reply.tool_requests.first())
            .ok_or_else(|| AskrError::InvalidHistory("no tool request to execute".to_string()))?;

        let output = self.invoke(request).await?;
        Ok(Message::tool_result(request, output))
    }

    async fn invoke(&self, request: &ToolRequest) -> Result<String> {
        let tool = self.tools.get(&request.tool_name).inspect_err(|_| {
            warn!("Model requested unregistered tool {:?}", request.tool_name);
        })?;

        let query = request.query().ok_or_else(|| {
            AskrError::InvalidToolInput(format!("{} requires a non-empty 'query' argument", request.tool_name))
        })?;

        info!("Invoking tool {} with query {:?}", request.tool_name, query);
        tool.invoke(query).await.inspect_err(|e| {
            warn!("Tool {} failed: {}", request.tool_name, e);
        })
    }
}

/// Drop every tool request but the first
///
/// Only one request is served per turn, and the stored reply must not carry
/// call ids that never get a tool result.
fn keep_first_request(mut reply: AssistantMessage) -> AssistantMessage {
    if reply.tool_requests.len() > 1 {
        debug!(
            "Model asked for {} tools; serving only {}",
            reply.tool_requests.len(),
            reply.tool_requests[0].tool_name
        );
        reply.tool_requests.truncate(1);
    }
    reply
}

/// Derive the displayed outcome from the messages a turn produced
fn outcome_of(produced: &[Message]) -> Outcome {
    match produced.last() {
        Some(Message::ToolResult(result)) => Outcome::ToolOutput {
            tool: result.tool_name.clone(),
            content: result.text.clone(),
        },
        Some(Message::Assistant(reply)) if !reply.is_empty() => Outcome::Answer(reply.text.clone()),
        _ => Outcome::NoResponse,
    }
}
