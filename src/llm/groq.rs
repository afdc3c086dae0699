//! Groq API client implementation
//!
//! Implements the ModelClient trait against Groq's OpenAI-compatible chat
//! completions endpoint. Tools are bound once at construction.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::{Value, json};

use crate::error::{AskrError, Result};
use crate::llm::client::ModelClient;
use crate::llm::types::{AssistantMessage, Message, ToolDefinition, ToolRequest, Usage};

/// Groq OpenAI-compatible API base URL
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Environment variable holding the API key
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Default model to use
pub const DEFAULT_MODEL: &str = "qwen-qwq-32b";

/// Configuration for the Groq client
#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub model: String,
    pub base_url: String,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: GROQ_API_BASE.to_string(),
            max_tokens: None,
            timeout: Duration::from_secs(120),
        }
    }
}

impl GroqConfig {
    /// Create a new config with a specific model
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Groq API client
pub struct GroqClient {
    client: Client,
    api_key: String,
    config: GroqConfig,
    tools: Vec<ToolDefinition>,
}

impl GroqClient {
    /// Create a new Groq client
    ///
    /// Reads GROQ_API_KEY from environment
    pub fn new(config: GroqConfig) -> Result<Self> {
        let api_key = std::env::var(GROQ_API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AskrError::Configuration(format!("{} not set", GROQ_API_KEY_ENV)))?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: String, config: GroqConfig) -> Result<Self> {
        if api_key.is_empty() {
            return Err(AskrError::Configuration(format!("{} is empty", GROQ_API_KEY_ENV)));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AskrError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            config,
            tools: Vec::new(),
        })
    }

    /// Bind tool definitions; they are offered to the model on every call
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Build the request body for the chat completions API
    ///
    /// Empty assistant replies stay in the history for the transcript but
    /// are not sent; the API rejects an assistant message with no content
    /// and no tool calls.
    pub fn build_request(&self, history: &[Message]) -> Value {
        let messages: Vec<Value> = history
            .iter()
            .filter(|m| !m.as_assistant().is_some_and(AssistantMessage::is_empty))
            .map(message_to_json)
            .collect();

        let mut body = json!({
            "model": self.config.model,
            "messages": messages
        });

        if let Some(max_tokens) = self.config.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        if !self.tools.is_empty() {
            let tools: Vec<Value> = self.tools.iter().map(|t| t.to_function_schema()).collect();
            body["tools"] = json!(tools);
            body["tool_choice"] = json!("auto");
            // One tool is served per turn
            body["parallel_tool_calls"] = json!(false);
        }

        body
    }

    /// Parse the API response into an AssistantMessage
    fn parse_response(&self, body: Value) -> Result<AssistantMessage> {
        if let Some(u) = body.get("usage") {
            let usage = Usage {
                prompt_tokens: u["prompt_tokens"].as_u64().unwrap_or(0),
                completion_tokens: u["completion_tokens"].as_u64().unwrap_or(0),
            };
            debug!(
                "Token usage: {} prompt + {} completion = {}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total()
            );
        }

        let message = body["choices"]
            .get(0)
            .map(|choice| &choice["message"])
            .ok_or_else(|| AskrError::Remote("Invalid response: no choices returned".to_string()))?;

        let text = message["content"].as_str().unwrap_or("").to_string();

        let mut tool_requests = Vec::new();
        if let Some(calls) = message["tool_calls"].as_array() {
            for call in calls {
                let id = call["id"].as_str().unwrap_or("").to_string();
                let name = call["function"]["name"].as_str().unwrap_or("").to_string();
                let input = parse_arguments(&call["function"]["arguments"])?;
                tool_requests.push(ToolRequest::from_json(id, name, &input));
            }
        }

        Ok(AssistantMessage { text, tool_requests })
    }

    /// Send a request to the chat completions API
    async fn send_request(&self, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AskrError::Remote(format!("Request failed: {}", e)))?;

        let status = response.status();
        debug!("Model API responded with {}", status);

        // Rate limits are reported, never retried
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            warn!("Model API rate limited (retry after {}s)", retry_after);
            return Err(AskrError::Remote(format!(
                "Rate limited, retry after {} seconds",
                retry_after
            )));
        }

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AskrError::Remote(format!("API error {}: {}", status, error_body)));
        }

        response
            .json()
            .await
            .map_err(|e| AskrError::Remote(format!("Failed to parse response: {}", e)))
    }
}

/// Convert one history entry to the wire format
fn message_to_json(message: &Message) -> Value {
    match message {
        Message::User(user) => json!({
            "role": "user",
            "content": user.text
        }),
        Message::Assistant(assistant) => {
            let mut value = json!({
                "role": "assistant",
                // Content may only be null alongside tool calls
                "content": if assistant.text.is_empty() && assistant.has_tool_requests() {
                    Value::Null
                } else {
                    json!(assistant.text)
                }
            });
            if assistant.has_tool_requests() {
                let calls: Vec<Value> = assistant
                    .tool_requests
                    .iter()
                    .map(|r| {
                        json!({
                            "id": r.call_id,
                            "type": "function",
                            "function": {
                                "name": r.tool_name,
                                "arguments": r.arguments_json().to_string()
                            }
                        })
                    })
                    .collect();
                value["tool_calls"] = json!(calls);
            }
            value
        }
        Message::ToolResult(result) => json!({
            "role": "tool",
            "tool_call_id": result.call_id,
            "content": result.text
        }),
    }
}

/// Tool arguments arrive as a JSON-encoded string; some providers inline the object
fn parse_arguments(raw: &Value) -> Result<Value> {
    match raw {
        Value::String(s) if s.trim().is_empty() => Ok(json!({})),
        Value::String(s) => serde_json::from_str(s)
            .map_err(|e| AskrError::Remote(format!("Invalid tool arguments from model: {}", e))),
        Value::Null => Ok(json!({})),
        other => Ok(other.clone()),
    }
}

#[async_trait]
impl ModelClient for GroqClient {
    async fn generate(&self, history: &[Message]) -> Result<AssistantMessage> {
        info!("Calling model {} with {} messages", self.config.model, history.len());
        let body = self.build_request(history);
        let response = self.send_request(body).await?;
        self.parse_response(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .field("tools", &self.tools.len())
            .finish()
    }
}
