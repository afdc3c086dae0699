//! Model Client Layer - OpenAI-compatible chat completions with tool calling
//!
//! This module provides:
//! - Message types for the conversation
//! - ModelClient trait for API abstraction
//! - GroqClient implementation

pub mod client;
pub mod groq;
pub mod types;

pub use client::ModelClient;
pub use groq::{GroqClient, GroqConfig};
pub use types::{
    AssistantMessage, Message, Role, ToolDefinition, ToolRequest, ToolResultMessage, Usage, UserMessage,
};
