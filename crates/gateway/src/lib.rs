//! HTTP gateway for the Fugu Protocol chatbot.
//!
//! Two routes: `POST /chat` runs the pipeline and streams the reply as
//! plain text, `GET /health` answers liveness probes.
//!
//! The chat route honors a strict wire contract with the widget: every
//! request that reaches the handler gets a `200` with a readable
//! `text/plain` body. Rejections, configuration problems, and upstream
//! failures all come back as prose, never as an error status the widget
//! would have to special-case.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use fugubot_chat::{ChatPipeline, TopicFilter};
use fugubot_config::AppConfig;
use fugubot_core::{ChatOutcome, ChatRequest, CompletionBackend, Error};
use fugubot_providers::OpenRouterBackend;

/// Shared application state for the gateway.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ChatPipeline>,
}

/// Build the Axum router with all gateway routes.
pub fn build_router(state: AppState) -> Router {
    // The widget is served from a different origin than the API.
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Builds the corpus, backend, and pipeline once and shares them across
/// all connections. A missing API key is not fatal: the server still
/// filters and rejects, and answers everything else with an apology.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let corpus = Arc::new(fugubot_knowledge::load_corpus(&config.knowledge));

    let backend = OpenRouterBackend::from_config(&config)
        .map(|backend| Arc::new(backend) as Arc<dyn CompletionBackend>);
    if backend.is_none() {
        error!("No API key configured; accepted questions will be answered with an apology");
    }

    let pipeline = Arc::new(ChatPipeline::new(
        backend,
        corpus,
        TopicFilter::new(config.filter.clone()),
        config.model.clone(),
        config.temperature,
    ));

    let app = build_router(AppState { pipeline });

    info!(addr = %addr, model = %config.model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ── Handlers ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    timestamp: String,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "fugubot",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    match state.pipeline.process(request).await {
        Ok(ChatOutcome::Rejected { message }) => plain_utf8(message),
        Ok(ChatOutcome::Streaming { deltas }) => {
            // An error after the first byte cannot change the status line;
            // the stream simply ends there.
            let body = ReceiverStream::new(deltas).map_while(|item| match item {
                Ok(delta) => Some(Ok::<_, Infallible>(Bytes::from(delta))),
                Err(e) => {
                    warn!(error = %e, "Completion stream interrupted mid-response");
                    None
                }
            });
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                Body::from_stream(body),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Chat pipeline failed");
            plain_utf8(render_failure(&e))
        }
    }
}

fn plain_utf8(message: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message,
    )
        .into_response()
}

fn render_failure(error: &Error) -> String {
    format!("Xin lỗi, đã có lỗi: {error}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use fugubot_core::{CompletionRequest, DeltaStream, Document, ProviderError};

    /// Backend that replays a fixed script of deltas and errors.
    struct ScriptedBackend {
        script: Vec<Result<String, ProviderError>>,
    }

    impl ScriptedBackend {
        fn ok(deltas: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                script: deltas.iter().map(|d| Ok(d.to_string())).collect(),
            })
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn stream_chat(
            &self,
            _request: CompletionRequest,
        ) -> Result<DeltaStream, ProviderError> {
            let (tx, rx) = tokio::sync::mpsc::channel(self.script.len().max(1));
            for item in self.script.clone() {
                tx.send(item).await.unwrap();
            }
            Ok(rx)
        }
    }

    fn app(backend: Option<Arc<dyn CompletionBackend>>) -> Router {
        let corpus = Arc::new(vec![Document::new(
            "Hướng Dẫn Sử Dụng Fugu App",
            "Nạp tiền qua Transak hoặc Banxa.",
            "guide",
        )]);
        let pipeline = Arc::new(ChatPipeline::new(
            backend,
            corpus,
            TopicFilter::new(fugubot_config::FilterConfig::default()),
            "test-model",
            0.7,
        ));
        build_router(AppState { pipeline })
    }

    fn chat_request(content: &str) -> Request<Body> {
        let body = serde_json::json!({
            "messages": [{"role": "user", "content": content}]
        });
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app(None)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "fugubot");
    }

    #[tokio::test]
    async fn accepted_question_streams_plain_text() {
        let backend = ScriptedBackend::ok(&["Nạp tiền ", "qua Transak."]);
        let response = app(Some(backend))
            .oneshot(chat_request("how to deposit usdc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert_eq!(content_type, "text/plain; charset=utf-8");
        assert_eq!(body_text(response).await, "Nạp tiền qua Transak.");
    }

    #[tokio::test]
    async fn rejection_is_a_200_with_guidance() {
        let backend = ScriptedBackend::ok(&["unused"]);
        let response = app(Some(backend))
            .oneshot(chat_request("what's the weather today"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains("I can help you with:"));
        assert!(text.ends_with("What would you like to ask?"));
    }

    #[tokio::test]
    async fn missing_backend_answers_with_apology() {
        let response = app(None)
            .oneshot(chat_request("how to deposit usdc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.starts_with("Xin lỗi, đã có lỗi:"), "got: {text}");
        assert!(text.contains("missing API key"));
    }

    #[tokio::test]
    async fn empty_conversation_answers_with_apology() {
        let backend = ScriptedBackend::ok(&["unused"]);
        let response = app(Some(backend))
            .oneshot(chat_request("   "))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_text(response).await,
            "Xin lỗi, đã có lỗi: No valid messages received"
        );
    }

    #[tokio::test]
    async fn mid_stream_error_truncates_the_body() {
        let backend = Arc::new(ScriptedBackend {
            script: vec![
                Ok("Trước khi lỗi.".to_string()),
                Err(ProviderError::StreamInterrupted("connection reset".into())),
                Ok("không bao giờ gửi".to_string()),
            ],
        });
        let response = app(Some(backend))
            .oneshot(chat_request("how to deposit usdc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Trước khi lỗi.");
    }

    #[tokio::test]
    async fn malformed_body_is_a_client_error() {
        let response = app(None)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
