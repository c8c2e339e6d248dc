//! Hybrid search client.
//!
//! Issues one query combining keyword matching, semantic ranking, and
//! vector similarity over the content embedding field. The vector stage
//! runs as a pre-filter before blended scoring. Field selection is fixed:
//! id, title, content, url. Index errors surface directly; there is no
//! local fallback.

use async_trait::async_trait;
use palaver_config::SearchConfig;
use palaver_core::error::SearchError;
use palaver_core::model::ChatModel;
use palaver_core::search::{SearchIndex, SearchRequest, SearchResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// How many nearest neighbours the vector stage considers before blending.
const VECTOR_NEIGHBOURS: u32 = 10;

/// A client for a hybrid lexical + vector search index.
pub struct HybridSearchClient {
    endpoint: String,
    api_key: String,
    index_name: String,
    api_version: String,
    semantic_configuration: String,
    scoring_profile: String,
    vector_field: String,
    model: Arc<dyn ChatModel>,
    client: reqwest::Client,
}

impl HybridSearchClient {
    /// Create a client from configuration plus the model client used for
    /// query embeddings.
    pub fn new(config: &SearchConfig, model: Arc<dyn ChatModel>) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| SearchError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            index_name: config.index_name.clone(),
            api_version: config.api_version.clone(),
            semantic_configuration: config.semantic_configuration.clone(),
            scoring_profile: config.scoring_profile.clone(),
            vector_field: config.vector_field.clone(),
            model,
            client,
        })
    }

    fn query_url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint, self.index_name, self.api_version
        )
    }
}

#[async_trait]
impl SearchIndex for HybridSearchClient {
    async fn search(&self, request: SearchRequest) -> Result<Vec<SearchResult>, SearchError> {
        // Embed first so the vector stage is always part of the query,
        // even for empty text (which yields the index's default ranking).
        let embedding = self
            .model
            .embed(&request.query)
            .await
            .map_err(|e| SearchError::EmbeddingFailed(e.to_string()))?;

        let body = IndexQuery {
            search: request.query.clone(),
            session_id: request.session_id.clone(),
            top: request.max_results,
            select: "id,title,content,url".into(),
            search_fields: "title,content,keyphrases".into(),
            search_mode: "any".into(),
            query_type: "semantic".into(),
            semantic_configuration: self.semantic_configuration.clone(),
            scoring_profile: self.scoring_profile.clone(),
            vector_filter_mode: "preFilter".into(),
            vector_queries: vec![VectorQuery {
                kind: "vector".into(),
                vector: embedding,
                k: VECTOR_NEIGHBOURS,
                fields: self.vector_field.clone(),
            }],
        };

        debug!(
            index = %self.index_name,
            top = request.max_results,
            query_len = request.query.len(),
            "Issuing hybrid search"
        );

        let response = self
            .client
            .post(self.query_url())
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchError::QueryFailed {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: IndexResponse = response.json().await.map_err(|e| {
            SearchError::MalformedResponse(format!("Failed to parse search response: {e}"))
        })?;

        Ok(api_response.value)
    }
}

// --- Index wire types (internal) ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexQuery {
    search: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
    top: usize,
    select: String,
    search_fields: String,
    search_mode: String,
    query_type: String,
    semantic_configuration: String,
    scoring_profile: String,
    vector_filter_mode: String,
    vector_queries: Vec<VectorQuery>,
}

#[derive(Debug, Serialize)]
struct VectorQuery {
    kind: String,
    vector: Vec<f32>,
    k: u32,
    fields: String,
}

#[derive(Debug, Deserialize)]
struct IndexResponse {
    #[serde(default)]
    value: Vec<SearchResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use palaver_core::error::ModelError;
    use palaver_core::message::Message;
    use palaver_core::model::{ChatOutcome, ToolDefinition};

    struct StubModel;

    #[async_trait]
    impl ChatModel for StubModel {
        async fn complete(
            &self,
            _messages: &[Message],
            _user: Option<&str>,
        ) -> Result<ChatOutcome, ModelError> {
            unreachable!("search only embeds")
        }

        async fn complete_with_tools(
            &self,
            _messages: &[Message],
            _tools: &[ToolDefinition],
            _user: Option<&str>,
        ) -> Result<ChatOutcome, ModelError> {
            unreachable!("search only embeds")
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ModelError> {
            Ok(vec![0.1, 0.2])
        }
    }

    fn test_client() -> HybridSearchClient {
        let config = SearchConfig {
            endpoint: "https://search.example.net/".into(),
            api_key: "sk-search".into(),
            index_name: "knowledge".into(),
            ..SearchConfig::default()
        };
        HybridSearchClient::new(&config, Arc::new(StubModel)).unwrap()
    }

    #[test]
    fn query_url_includes_index_and_version() {
        let client = test_client();
        let url = client.query_url();
        assert!(url.contains("/indexes/knowledge/docs/search"));
        assert!(url.contains("api-version=2024-07-01"));
    }

    #[test]
    fn query_body_serializes_camel_case() {
        let body = IndexQuery {
            search: "Kubrick films".into(),
            session_id: Some("s1".into()),
            top: 5,
            select: "id,title,content,url".into(),
            search_fields: "title,content,keyphrases".into(),
            search_mode: "any".into(),
            query_type: "semantic".into(),
            semantic_configuration: "semantic-config".into(),
            scoring_profile: "scoring-profile".into(),
            vector_filter_mode: "preFilter".into(),
            vector_queries: vec![VectorQuery {
                kind: "vector".into(),
                vector: vec![0.1],
                k: 10,
                fields: "content_vector".into(),
            }],
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"searchFields\""));
        assert!(json.contains("\"vectorFilterMode\":\"preFilter\""));
        assert!(json.contains("\"semanticConfiguration\""));
        assert!(json.contains("\"top\":5"));
    }

    #[test]
    fn parse_index_response() {
        let data = r#"{
            "value": [
                {"id": "doc-1", "title": "Kubrick", "content": "Filmography...", "url": "https://example.com/kubrick"},
                {"id": "doc-2", "title": "2001", "content": "A Space Odyssey", "url": "https://example.com/2001"}
            ]
        }"#;
        let parsed: IndexResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.value.len(), 2);
        assert_eq!(parsed.value[0].id, "doc-1");
    }

    #[test]
    fn parse_empty_index_response() {
        let parsed: IndexResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.value.is_empty());
    }
}
