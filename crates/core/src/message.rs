//! Message and Transcript domain types.
//!
//! These are the value objects that flow through one turn: the gateway
//! receives a user prompt → the orchestrator assembles a Transcript →
//! the model client submits it and returns an assistant message.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (assistant persona, phase instruction)
    System,
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// Tool execution result
    Tool,
}

/// A single message in a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content
    #[serde(default)]
    pub content: String,

    /// Tool calls requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<MessageToolCall>,

    /// If this is a tool result, which tool call it responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// If this is a tool result, the name of the function that produced it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Create an assistant message carrying only a tool-call list.
    ///
    /// This is the message that lets the model's own invocation be
    /// referenced by id from the subsequent tool-result message.
    pub fn tool_calls(calls: Vec<MessageToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: String::new(),
            tool_calls: calls,
            tool_call_id: None,
            name: None,
        }
    }

    /// Create a tool-result message. `content` must already be serialized.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        function_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
            name: Some(function_name.into()),
        }
    }
}

/// A tool call embedded in an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageToolCall {
    /// Unique ID for this tool call (minted by the model)
    pub id: String,

    /// Name of the function to invoke
    pub name: String,

    /// Arguments as a JSON string
    pub arguments: String,
}

/// The ordered message sequence submitted to the model for one turn.
///
/// Append-only, except for the single mutable system slot: if a system
/// message is present it is always at index 0, and `set_system` replaces
/// it in place. This lets the orchestrator swap the system instruction
/// between the answer phase and the follow-up phase without duplicating it.
///
/// All operations are in-memory and total; there are no error paths.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create a new empty transcript.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Set the system instruction.
    ///
    /// Replaces the message at index 0 if it is a system message,
    /// otherwise inserts a new system message at position 0. Calling this
    /// twice leaves exactly one system message with the second content.
    pub fn set_system(&mut self, content: impl Into<String>) {
        let msg = Message::system(content);
        match self.messages.first() {
            Some(first) if first.role == Role::System => self.messages[0] = msg,
            _ => self.messages.insert(0, msg),
        }
    }

    /// Append a message to the end of the transcript.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append an assistant message carrying the raw tool-call list.
    pub fn push_tool_calls(&mut self, calls: Vec<MessageToolCall>) {
        self.messages.push(Message::tool_calls(calls));
    }

    /// Append a tool-result message keyed by the originating call.
    pub fn push_tool_result(
        &mut self,
        tool_call_id: impl Into<String>,
        function_name: impl Into<String>,
        content: impl Into<String>,
    ) {
        self.messages
            .push(Message::tool_result(tool_call_id, function_name, content));
    }

    /// The current message sequence, for submission to the model client.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages in the transcript.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
