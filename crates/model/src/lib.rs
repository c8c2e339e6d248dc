//! Inference endpoint client for Palaver.
//!
//! Works with OpenAI and OpenAI-compatible chat-completion endpoints.
//! Two completion modes: plain (forces a text answer) and tool-enabled
//! (the model may return tool invocations). Plus embeddings for retrieval
//! queries.
//!
//! Generation parameters are fixed process-wide from configuration. There
//! is no retry logic; remote failures propagate to the caller.

use async_trait::async_trait;
use palaver_config::InferenceConfig;
use palaver_core::error::ModelError;
use palaver_core::message::{Message, MessageToolCall, Role};
use palaver_core::model::{ChatModel, ChatOutcome, ToolDefinition, Usage};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A client for an OpenAI-compatible inference endpoint.
pub struct InferenceClient {
    base_url: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl InferenceClient {
    /// Create a client from the process-wide inference configuration.
    pub fn new(config: &InferenceConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| ModelError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    /// Convert domain messages to the endpoint's wire format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: match m.role {
                    Role::System => "system".into(),
                    Role::User => "user".into(),
                    Role::Assistant => "assistant".into(),
                    Role::Tool => "tool".into(),
                },
                content: Some(m.content.clone()),
                tool_calls: if m.tool_calls.is_empty() {
                    None
                } else {
                    Some(
                        m.tool_calls
                            .iter()
                            .map(|tc| ApiToolCall {
                                id: tc.id.clone(),
                                r#type: "function".into(),
                                function: ApiFunction {
                                    name: tc.name.clone(),
                                    arguments: tc.arguments.clone(),
                                },
                            })
                            .collect(),
                    )
                },
                tool_call_id: m.tool_call_id.clone(),
                name: m.name.clone(),
            })
            .collect()
    }

    /// Convert tool definitions to the endpoint's wire format.
    fn to_api_tools(tools: &[ToolDefinition]) -> Vec<ApiToolDefinition> {
        tools
            .iter()
            .map(|t| ApiToolDefinition {
                r#type: "function".into(),
                function: ApiToolFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                },
            })
            .collect()
    }

    async fn chat_completion(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        user: Option<&str>,
    ) -> Result<ChatOutcome, ModelError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": self.chat_model,
            "messages": Self::to_api_messages(messages),
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
        });

        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            body["tools"] = serde_json::json!(Self::to_api_tools(tools));
            body["tool_choice"] = serde_json::json!("auto");
        }

        if let Some(user) = user {
            body["user"] = serde_json::json!(user);
        }

        debug!(
            model = %self.chat_model,
            messages = messages.len(),
            tools = tools.map_or(0, <[ToolDefinition]>::len),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(ModelError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ModelError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ModelError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::MalformedResponse("No choices in response".into()))?;

        let tool_calls: Vec<MessageToolCall> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| MessageToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let usage = api_response.usage.map_or(Usage::default(), |u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ChatOutcome {
            id: api_response.id,
            model: api_response.model,
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            usage,
        })
    }
}

#[async_trait]
impl ChatModel for InferenceClient {
    async fn complete(
        &self,
        messages: &[Message],
        user: Option<&str>,
    ) -> Result<ChatOutcome, ModelError> {
        self.chat_completion(messages, None, user).await
    }

    async fn complete_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        user: Option<&str>,
    ) -> Result<ChatOutcome, ModelError> {
        self.chat_completion(messages, Some(tools), user).await
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let url = format!("{}/embeddings", self.base_url);

        let body = serde_json::json!({
            "model": self.embedding_model,
            "input": text,
            "encoding_format": "float",
        });

        debug!(model = %self.embedding_model, "Sending embedding request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(ModelError::AuthenticationFailed("Invalid API key".into()));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ModelError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_resp: EmbeddingApiResponse = response.json().await.map_err(|e| {
            ModelError::MalformedResponse(format!("Failed to parse embedding response: {e}"))
        })?;

        api_resp
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ModelError::MalformedResponse("No embedding in response".into()))
    }
}

// --- Endpoint wire types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    r#type: String,
    function: ApiFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize)]
struct ApiToolDefinition {
    r#type: String,
    function: ApiToolFunction,
}

#[derive(Debug, Serialize)]
struct ApiToolFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    id: String,
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct EmbeddingApiResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> InferenceConfig {
        InferenceConfig {
            endpoint: "https://api.example.com/v1/".into(),
            api_key: "sk-test".into(),
            ..InferenceConfig::default()
        }
    }

    #[test]
    fn constructor_trims_trailing_slash() {
        let client = InferenceClient::new(&test_config()).unwrap();
        assert_eq!(client.base_url, "https://api.example.com/v1");
    }

    #[test]
    fn message_conversion() {
        let messages = vec![Message::system("You are helpful"), Message::user("Hello")];
        let api_messages = InferenceClient::to_api_messages(&messages);
        assert_eq!(api_messages.len(), 2);
        assert_eq!(api_messages[0].role, "system");
        assert_eq!(api_messages[1].role, "user");
    }

    #[test]
    fn message_conversion_with_tool_calls() {
        let msg = Message::tool_calls(vec![MessageToolCall {
            id: "call_1".into(),
            name: "sample_search".into(),
            arguments: r#"{"search_query":"ls"}"#.into(),
        }]);
        let api_msgs = InferenceClient::to_api_messages(&[msg]);
        let tc = api_msgs[0].tool_calls.as_ref().unwrap();
        assert_eq!(tc.len(), 1);
        assert_eq!(tc[0].function.name, "sample_search");
        assert_eq!(tc[0].r#type, "function");
    }

    #[test]
    fn message_conversion_tool_response() {
        let msg = Message::tool_result("call_1", "sample_search", "result data");
        let api_msgs = InferenceClient::to_api_messages(&[msg]);
        assert_eq!(api_msgs[0].role, "tool");
        assert_eq!(api_msgs[0].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(api_msgs[0].name.as_deref(), Some("sample_search"));
    }

    #[test]
    fn tool_definition_conversion() {
        let tools = vec![ToolDefinition {
            name: "sample_search".into(),
            description: "Retrieve sources from the search index".into(),
            parameters: serde_json::json!({"type": "object"}),
        }];
        let api_tools = InferenceClient::to_api_tools(&tools);
        assert_eq!(api_tools.len(), 1);
        assert_eq!(api_tools[0].function.name, "sample_search");
    }

    #[test]
    fn parse_completion_with_tool_calls() {
        let data = r#"{
            "id": "chatcmpl-123",
            "model": "gpt-4o",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "sample_search", "arguments": "{\"search_query\": \"Kubrick films\"}"}
                    }]
                }
            }],
            "usage": {"prompt_tokens": 20, "completion_tokens": 12, "total_tokens": 32}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.id, "chatcmpl-123");
        let tc = parsed.choices[0].message.tool_calls.as_ref().unwrap();
        assert_eq!(tc[0].function.name, "sample_search");
        assert_eq!(parsed.usage.unwrap().total_tokens, 32);
    }

    #[test]
    fn parse_plain_completion() {
        let data = r#"{
            "id": "chatcmpl-456",
            "model": "gpt-4o",
            "choices": [{"message": {"role": "assistant", "content": "Paris."}}],
            "usage": {"prompt_tokens": 9, "completion_tokens": 2, "total_tokens": 11}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Paris.")
        );
        assert!(parsed.choices[0].message.tool_calls.is_none());
    }

    #[test]
    fn parse_embedding_response() {
        let data = r#"{"data": [{"embedding": [0.1, 0.2, 0.3], "index": 0}], "model": "text-embedding-3-small"}"#;
        let parsed: EmbeddingApiResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.data[0].embedding, vec![0.1, 0.2, 0.3]);
    }
}
