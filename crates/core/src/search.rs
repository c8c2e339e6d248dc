//! SearchIndex trait — the abstraction over the retrieval index.
//!
//! Retrieval is hybrid: combined lexical keyword and vector-similarity
//! ranking. Index errors surface directly; there is no local fallback.

use crate::error::SearchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A request to search the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The query text. Empty text is permitted and yields the index's
    /// default ranking.
    pub query: String,

    /// The session issuing the query (passed through to the index)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Maximum number of results to return
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    5
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            session_id: None,
            max_results: default_max_results(),
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// A single ranked document from the index.
///
/// Field selection is fixed: identifier, title, content, url. Ephemeral —
/// scoped to one tool invocation, never persisted directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: String,
}

/// The retrieval index contract.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Run a hybrid search, returning at most `max_results` documents
    /// ranked by blended relevance.
    async fn search(
        &self,
        request: SearchRequest,
    ) -> std::result::Result<Vec<SearchResult>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_five_results() {
        let req = SearchRequest::new("Kubrick films");
        assert_eq!(req.max_results, 5);
        assert!(req.session_id.is_none());
    }

    #[test]
    fn result_tolerates_missing_optional_fields() {
        let doc: SearchResult = serde_json::from_str(r#"{"id":"doc-1"}"#).unwrap();
        assert_eq!(doc.id, "doc-1");
        assert!(doc.title.is_empty());
        assert!(doc.url.is_empty());
    }
}
