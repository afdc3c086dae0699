//! Conversation types shared by the model client, dispatcher and session
//!
//! A `Message` is one of three immutable variants. Order matters: a
//! `ToolResult` always directly follows the `Assistant` message that asked for it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display role for a message in the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label shown next to the message
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A question typed by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMessage {
    pub text: String,
}

/// A model reply: final text, or a request to run tools
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_requests: Vec<ToolRequest>,
}

impl AssistantMessage {
    /// A plain text answer
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_requests: Vec::new(),
        }
    }

    /// A reply that only asks for tools
    pub fn with_requests(tool_requests: Vec<ToolRequest>) -> Self {
        Self {
            text: String::new(),
            tool_requests,
        }
    }

    pub fn has_tool_requests(&self) -> bool {
        !self.tool_requests.is_empty()
    }

    /// Neither text nor tool requests ("no response generated")
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.tool_requests.is_empty()
    }
}

/// Output of a tool, paired with the request that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResultMessage {
    pub call_id: String,
    pub tool_name: String,
    pub text: String,
}

/// One entry of the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    User(UserMessage),
    Assistant(AssistantMessage),
    ToolResult(ToolResultMessage),
}

impl Message {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Message::User(UserMessage { text: text.into() })
    }

    /// Create an assistant text message
    pub fn assistant(text: impl Into<String>) -> Self {
        Message::Assistant(AssistantMessage::answer(text))
    }

    /// Create a tool result answering `request`
    pub fn tool_result(request: &ToolRequest, text: impl Into<String>) -> Self {
        Message::ToolResult(ToolResultMessage {
            call_id: request.call_id.clone(),
            tool_name: request.tool_name.clone(),
            text: text.into(),
        })
    }

    /// Transcript role; tool output is shown as coming from the assistant
    pub fn role(&self) -> Role {
        match self {
            Message::User(_) => Role::User,
            Message::Assistant(_) | Message::ToolResult(_) => Role::Assistant,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Message::User(_))
    }

    /// The assistant reply, if this is one
    pub fn as_assistant(&self) -> Option<&AssistantMessage> {
        match self {
            Message::Assistant(msg) => Some(msg),
            _ => None,
        }
    }
}

/// A model-issued instruction to run a registered tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Provider-assigned id, echoed back on the matching tool result
    pub call_id: String,
    pub tool_name: String,
    pub arguments: BTreeMap<String, String>,
}

impl ToolRequest {
    pub fn new(call_id: impl Into<String>, tool_name: impl Into<String>, arguments: BTreeMap<String, String>) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Build the argument map from a JSON object, stringifying non-string values
    pub fn from_json(call_id: impl Into<String>, tool_name: impl Into<String>, input: &Value) -> Self {
        let arguments = input
            .as_object()
            .map(|obj| {
                obj.iter()
                    .map(|(k, v)| {
                        let value = match v {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (k.clone(), value)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self::new(call_id, tool_name, arguments)
    }

    /// The free-text query every research tool takes
    pub fn query(&self) -> Option<&str> {
        self.arguments
            .get("query")
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
    }

    /// Arguments as a JSON object, as sent back to the provider
    pub fn arguments_json(&self) -> Value {
        serde_json::to_value(&self.arguments).unwrap_or(Value::Null)
    }
}

/// Tool definition bound to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Convert to the OpenAI-compatible function schema
    pub fn to_function_schema(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.input_schema
            }
        })
    }
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl Usage {
    /// Calculate total tokens
    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::User.label(), "user");
        assert_eq!(Role::Assistant.label(), "assistant");
    }

    #[test]
    fn test_message_roles() {
        assert_eq!(Message::user("hi").role(), Role::User);
        assert_eq!(Message::assistant("hello").role(), Role::Assistant);

        let request = ToolRequest::new("call_1", "arxiv", BTreeMap::new());
        assert_eq!(Message::tool_result(&request, "paper").role(), Role::Assistant);
    }

    #[test]
    fn test_tool_result_echoes_request() {
        let request = ToolRequest::new("call_9", "wikipedia", BTreeMap::new());
        match Message::tool_result(&request, "Page: Paris") {
            Message::ToolResult(result) => {
                assert_eq!(result.call_id, "call_9");
                assert_eq!(result.tool_name, "wikipedia");
                assert_eq!(result.text, "Page: Paris");
            }
            other => panic!("Expected tool result, got {:?}", other),
        }
    }

    #[test]
    fn test_assistant_message_empty() {
        assert!(AssistantMessage::default().is_empty());
        assert!(AssistantMessage::answer("   ").is_empty());
        assert!(!AssistantMessage::answer("Paris").is_empty());

        let request = ToolRequest::new("c", "arxiv", BTreeMap::new());
        let msg = AssistantMessage::with_requests(vec![request]);
        assert!(!msg.is_empty());
        assert!(msg.has_tool_requests());
    }

    #[test]
    fn test_tool_request_from_json_stringifies_values() {
        let request = ToolRequest::from_json("c1", "arxiv", &json!({"query": "transformers", "limit": 3}));
        assert_eq!(request.arguments.get("query").map(String::as_str), Some("transformers"));
        assert_eq!(request.arguments.get("limit").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_tool_request_from_non_object() {
        let request = ToolRequest::from_json("c1", "arxiv", &json!("transformers"));
        assert!(request.arguments.is_empty());
        assert!(request.query().is_none());
    }

    #[test]
    fn test_tool_request_query_blank() {
        let mut args = BTreeMap::new();
        args.insert("query".to_string(), "   ".to_string());
        let request = ToolRequest::new("c1", "arxiv", args);
        assert!(request.query().is_none());
    }

    #[test]
    fn test_tool_definition_to_function_schema() {
        let def = ToolDefinition::new(
            "arxiv",
            "Query Arxiv for academic papers",
            json!({"type": "object", "properties": {"query": {"type": "string"}}}),
        );
        let schema = def.to_function_schema();
        assert_eq!(schema["type"], "function");
        assert_eq!(schema["function"]["name"], "arxiv");
        assert!(schema["function"]["parameters"].is_object());
    }

    #[test]
    fn test_message_serialization_tag() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(json["kind"], "user");
        assert_eq!(json["text"], "hi");
    }

    #[test]
    fn test_usage_total() {
        let usage = Usage {
            prompt_tokens: 100,
            completion_tokens: 50,
        };
        assert_eq!(usage.total(), 150);
    }
}
