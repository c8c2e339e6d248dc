//! ToolHandler trait and registry.
//!
//! The model may request function invocations before finalizing its
//! answer. Dispatch goes through a registered mapping from function name
//! to handler, so adding a tool type does not touch the orchestrator's
//! control flow. Invocations naming an unregistered function are skipped
//! silently — that is policy, not an oversight.

use crate::error::ToolError;
use crate::model::ToolDefinition;
use async_trait::async_trait;
use std::collections::HashMap;

/// A handler for one model-invocable function.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The unique function name (e.g. "sample_search").
    fn name(&self) -> &str;

    /// The definition sent to the model.
    fn definition(&self) -> ToolDefinition;

    /// Execute with the raw argument JSON string from the model's
    /// invocation. Returns the result content, already serialized for the
    /// tool-result transcript message.
    async fn invoke(
        &self,
        arguments: &str,
        session_id: &str,
    ) -> std::result::Result<String, ToolError>;
}

/// A registry of available tool handlers.
pub struct ToolRegistry {
    handlers: HashMap<String, Box<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler. Replaces any existing handler with the same name.
    pub fn register(&mut self, handler: Box<dyn ToolHandler>) {
        let name = handler.name().to_string();
        self.handlers.insert(name, handler);
    }

    /// Look up a handler by function name.
    pub fn get(&self, name: &str) -> Option<&dyn ToolHandler> {
        self.handlers.get(name).map(|h| h.as_ref())
    }

    /// All definitions, for sending to the model.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.handlers.values().map(|h| h.definition()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
