//! Model client trait definition

use async_trait::async_trait;

use crate::error::Result;
use crate::llm::types::{AssistantMessage, Message};

/// Stateless model client - each call sends the whole history
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Produce the next assistant message for `history` (one network call, no retry)
    async fn generate(&self, history: &[Message]) -> Result<AssistantMessage>;

    /// Fixed model identifier
    fn model(&self) -> &str;
}
