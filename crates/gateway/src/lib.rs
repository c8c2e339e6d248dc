//! HTTP API gateway for Palaver.
//!
//! Exposes the turn orchestrator over a thin REST surface:
//!
//! - `POST /api/chat`     — run one turn, return the assistant response
//! - `POST /api/feedback` — amend a stored turn with a rating
//! - `GET  /ping`         — plain-text version banner
//!
//! Built on Axum. Every handler failure surfaces as a generic 500 whose
//! body carries a human-readable reason and the request url and method;
//! no partial answer is ever returned.

use axum::{
    Router,
    extract::{Json, OriginalUri, State},
    http::{Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use palaver_agent::TurnRunner;
use palaver_core::history::HistoryStore;
use palaver_core::turn::{FollowupSet, TurnRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub runner: Arc<TurnRunner>,
    pub history: Arc<dyn HistoryStore>,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/feedback", post(feedback_handler))
        .route("/ping", get(ping_handler))
        .layer(middleware::from_fn(process_time_middleware))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(
    state: SharedState,
    host: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ── Error surface ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ErrorSource {
    url: String,
    method: String,
}

/// The generic 500 body: a reason string plus where the request came in.
#[derive(Debug, Serialize)]
struct ErrorBody {
    reason: String,
    source: ErrorSource,
}

struct ApiError {
    reason: String,
    url: String,
    method: Method,
}

impl ApiError {
    fn new(reason: impl ToString, uri: &OriginalUri, method: &Method) -> Self {
        Self {
            reason: reason.to_string(),
            url: uri.to_string(),
            method: method.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(url = %self.url, method = %self.method, reason = %self.reason, "Request failed");
        let body = ErrorBody {
            reason: self.reason,
            source: ErrorSource {
                url: self.url,
                method: self.method.to_string(),
            },
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

// ── Middleware ────────────────────────────────────────────────────────────

/// Stamps every response with the wall-clock handling time in seconds.
async fn process_time_middleware(req: axum::extract::Request, next: Next) -> Response {
    let start = Instant::now();
    let mut response = next.run(req).await;
    let elapsed = start.elapsed().as_secs_f64();
    if let Ok(value) = format!("{elapsed:.6}").parse() {
        response.headers_mut().insert("X-Process-Time", value);
    }
    response
}

// ── Handlers ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatRequest {
    session_id: String,
    user_id: String,
    #[serde(default)]
    user_name: Option<String>,
    user_prompt: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    assistant_response: String,
    response_id: String,
    followup_questions: FollowupSet,
    total_tokens: u32,
    model: String,
}

async fn chat_handler(
    State(state): State<SharedState>,
    uri: OriginalUri,
    method: Method,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let outcome = state
        .runner
        .run(TurnRequest {
            session_id: payload.session_id,
            user_id: payload.user_id,
            user_name: payload.user_name,
            user_prompt: payload.user_prompt,
        })
        .await
        .map_err(|e| ApiError::new(e, &uri, &method))?;

    Ok(Json(ChatResponse {
        assistant_response: outcome.assistant_response,
        response_id: outcome.response_id,
        followup_questions: outcome.followup_questions,
        total_tokens: outcome.total_tokens,
        model: outcome.model,
    }))
}

#[derive(Debug, Deserialize)]
struct FeedbackRequest {
    id: String,
    session_id: String,
    feedback_rating: bool,
}

#[derive(Debug, Serialize)]
struct FeedbackResponse {
    status: String,
}

async fn feedback_handler(
    State(state): State<SharedState>,
    uri: OriginalUri,
    method: Method,
    Json(payload): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    state
        .history
        .amend_feedback(&payload.id, &payload.session_id, payload.feedback_rating)
        .await
        .map_err(|e| ApiError::new(e, &uri, &method))?;

    Ok(Json(FeedbackResponse {
        status: format!("Feedback recorded for turn {}", payload.id),
    }))
}

async fn ping_handler() -> String {
    format!("Palaver v{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use palaver_core::error::ModelError;
    use palaver_core::message::Message;
    use palaver_core::model::{ChatModel, ChatOutcome, ToolDefinition, Usage};
    use palaver_core::tool::ToolRegistry;
    use palaver_core::turn::TurnRecord;
    use palaver_history::InMemoryHistory;
    use tower::ServiceExt;

    /// Answers every completion with the same canned text.
    struct CannedModel {
        content: String,
    }

    #[async_trait]
    impl ChatModel for CannedModel {
        async fn complete(
            &self,
            _messages: &[Message],
            _user: Option<&str>,
        ) -> std::result::Result<ChatOutcome, ModelError> {
            Ok(ChatOutcome {
                id: "resp-1".into(),
                model: "test-model".into(),
                content: self.content.clone(),
                tool_calls: vec![],
                usage: Usage {
                    prompt_tokens: 5,
                    completion_tokens: 5,
                    total_tokens: 10,
                },
            })
        }

        async fn complete_with_tools(
            &self,
            messages: &[Message],
            _tools: &[ToolDefinition],
            user: Option<&str>,
        ) -> std::result::Result<ChatOutcome, ModelError> {
            self.complete(messages, user).await
        }

        async fn embed(&self, _text: &str) -> std::result::Result<Vec<f32>, ModelError> {
            Ok(vec![0.0])
        }
    }

    /// Fails every completion, for exercising the error surface.
    struct FailingModel;

    #[async_trait]
    impl ChatModel for FailingModel {
        async fn complete(
            &self,
            _messages: &[Message],
            _user: Option<&str>,
        ) -> std::result::Result<ChatOutcome, ModelError> {
            Err(ModelError::Network("connection refused".into()))
        }

        async fn complete_with_tools(
            &self,
            messages: &[Message],
            _tools: &[ToolDefinition],
            user: Option<&str>,
        ) -> std::result::Result<ChatOutcome, ModelError> {
            self.complete(messages, user).await
        }

        async fn embed(&self, _text: &str) -> std::result::Result<Vec<f32>, ModelError> {
            Err(ModelError::Network("connection refused".into()))
        }
    }

    fn test_state(model: Arc<dyn ChatModel>, history: Arc<InMemoryHistory>) -> SharedState {
        let runner = Arc::new(TurnRunner::new(
            model,
            history.clone(),
            Arc::new(ToolRegistry::new()),
        ));
        Arc::new(GatewayState { runner, history })
    }

    fn canned_state() -> SharedState {
        test_state(
            Arc::new(CannedModel {
                content: "{}".into(),
            }),
            Arc::new(InMemoryHistory::new()),
        )
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn ping_returns_version_banner() {
        let app = build_router(canned_state());
        let response = app
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("X-Process-Time"));
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("Palaver v"));
    }

    #[tokio::test]
    async fn chat_returns_turn_outcome() {
        let app = build_router(canned_state());
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"session_id":"s1","user_id":"u1","user_prompt":"hi"}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["assistant_response"], "{}");
        assert_eq!(body["response_id"], "resp-1");
        assert_eq!(body["total_tokens"], 20);
        assert_eq!(body["model"], "test-model");
    }

    #[tokio::test]
    async fn chat_failure_is_generic_500_with_source() {
        let state = test_state(Arc::new(FailingModel), Arc::new(InMemoryHistory::new()));
        let app = build_router(state);
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"session_id":"s1","user_id":"u1","user_prompt":"hi"}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert!(body["reason"].as_str().unwrap().contains("connection refused"));
        assert_eq!(body["source"]["url"], "/api/chat");
        assert_eq!(body["source"]["method"], "POST");
    }

    #[tokio::test]
    async fn feedback_amends_stored_turn() {
        let history = Arc::new(InMemoryHistory::new());
        history
            .write(TurnRecord {
                id: "turn-1".into(),
                session_id: "s1".into(),
                user_prompt: "hi".into(),
                assistant_response: "hello".into(),
                total_tokens: 10,
                feedback_rating: None,
            })
            .await
            .unwrap();

        let state = test_state(
            Arc::new(CannedModel {
                content: "{}".into(),
            }),
            history.clone(),
        );
        let app = build_router(state);
        let request = Request::builder()
            .method("POST")
            .uri("/api/feedback")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"id":"turn-1","session_id":"s1","feedback_rating":true}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["status"].as_str().unwrap().contains("turn-1"));

        let record = history.get("turn-1", "s1").await.unwrap().unwrap();
        assert_eq!(record.feedback_rating, Some(true));
    }

    #[tokio::test]
    async fn feedback_for_missing_turn_is_500() {
        let app = build_router(canned_state());
        let request = Request::builder()
            .method("POST")
            .uri("/api/feedback")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"id":"ghost","session_id":"s1","feedback_rating":false}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert!(body["reason"].as_str().unwrap().contains("ghost"));
    }
}
