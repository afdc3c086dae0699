//! Research tools offered to the model
//!
//! Each tool wraps one read-only knowledge source behind `invoke(query)`.
//! Output is capped to a configured number of characters so the payload
//! handed back stays bounded.

mod arxiv;
mod registry;
mod tavily;
mod wikipedia;

pub use arxiv::ArxivTool;
pub use registry::ToolRegistry;
pub use tavily::{TAVILY_API_KEY_ENV, TavilyTool};
pub use wikipedia::WikipediaTool;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{AskrError, Result};
use crate::llm::ToolDefinition;

/// A tool that can be called by the model
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches the function name the model emits)
    fn name(&self) -> &'static str;

    /// Human-readable description shown to the model
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                }
            },
            "required": ["query"]
        })
    }

    /// Human-readable summary of the result caps, for `askr tools`
    fn limits(&self) -> String;

    /// Run the lookup
    async fn invoke(&self, query: &str) -> Result<String>;

    /// Definition bound to the model client
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.input_schema())
    }
}

/// Build the HTTP client shared by a tool's requests
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AskrError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// Cap `text` at `max_chars` characters, cutting on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Turn a non-success HTTP status into a remote error
pub(crate) async fn check_status(service: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    Err(AskrError::Remote(format!("{} API error {}: {}", service, status, error_text)))
}
