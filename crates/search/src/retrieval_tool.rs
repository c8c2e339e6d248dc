//! The retrieval tool handler.
//!
//! Exposes the search index to the model as a single invocable function.
//! Arguments arrive as a raw JSON string; a missing `search_query` key
//! falls back to an empty query, but argument text that is not valid JSON
//! is rejected.

use async_trait::async_trait;
use palaver_core::error::ToolError;
use palaver_core::model::ToolDefinition;
use palaver_core::search::{SearchIndex, SearchRequest};
use palaver_core::tool::ToolHandler;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Results handed back per invocation.
const RESULT_CAP: usize = 5;

pub const TOOL_NAME: &str = "sample_search";

/// Tool handler that answers model search requests from the index.
pub struct RetrievalTool {
    index: Arc<dyn SearchIndex>,
}

#[derive(Debug, Deserialize)]
struct RetrievalArguments {
    #[serde(default)]
    search_query: String,
}

impl RetrievalTool {
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl ToolHandler for RetrievalTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: TOOL_NAME.into(),
            description:
                "Search the knowledge index for documents relevant to the user's question. \
                 Use this whenever the answer may depend on indexed content."
                    .into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "search_query": {
                        "type": "string",
                        "description": "The query to run against the knowledge index"
                    }
                },
                "required": ["search_query"]
            }),
        }
    }

    async fn invoke(
        &self,
        arguments: &str,
        session_id: &str,
    ) -> std::result::Result<String, ToolError> {
        let args: RetrievalArguments = serde_json::from_str(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        debug!(query = %args.search_query, session_id, "Running retrieval tool");

        let request = SearchRequest::new(args.search_query)
            .with_session(session_id)
            .with_max_results(RESULT_CAP);

        let results = self
            .index
            .search(request)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: TOOL_NAME.into(),
                reason: e.to_string(),
            })?;

        serde_json::to_string(&results).map_err(|e| ToolError::InvalidArguments(e.to_string()))
    }
}
