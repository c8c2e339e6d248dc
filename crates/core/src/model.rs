//! ChatModel trait — the abstraction over the inference endpoint.
//!
//! The model client is called in two modes: plain completion (forces a
//! text answer) and tool-enabled completion (may return tool invocations
//! instead of, or in addition to, text). Both are blocking round trips
//! with no retry logic of their own; failures propagate to the caller.

use crate::error::ModelError;
use crate::message::{Message, MessageToolCall};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A tool definition sent to the model so it knows what it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The function name
    pub name: String,

    /// Description of what the function does
    pub description: String,

    /// JSON Schema describing the function's parameters
    pub parameters: serde_json::Value,
}

/// Token usage for a single model call.
///
/// Every call consumes billable quota; the orchestrator sums usage across
/// all calls issued in one turn.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The outcome of one chat-completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutcome {
    /// Response id minted by the endpoint
    pub id: String,

    /// Which model actually responded
    pub model: String,

    /// Generated text content (may be empty when only tools were called)
    pub content: String,

    /// Tool invocations requested by the model; empty when it answered
    /// directly
    pub tool_calls: Vec<MessageToolCall>,

    /// Token usage for this call
    pub usage: Usage,
}

/// The inference endpoint contract.
///
/// Generation parameters (temperature, max output length) are process-wide
/// configuration of the implementation, not caller-supplied.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Request a plain text response. Used for the final answer phase and
    /// the follow-up-question phase.
    async fn complete(
        &self,
        messages: &[Message],
        user: Option<&str>,
    ) -> std::result::Result<ChatOutcome, ModelError>;

    /// Request a response that may be pure text, pure tool calls, or both.
    async fn complete_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        user: Option<&str>,
    ) -> std::result::Result<ChatOutcome, ModelError>;

    /// Produce a dense embedding for a retrieval query.
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, ModelError>;
}
