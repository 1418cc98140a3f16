//! HTTP surface: status probe and the chat endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::chat::{self, ChatRequest, ChatResponse};
use crate::config::{ServerConfig, ALLOWED_ORIGINS};
use crate::state::AppState;

pub const STATUS_TEXT: &str = "LegalBot Server is running";

#[derive(Debug, Serialize)]
pub struct Status {
    pub status: &'static str,
    pub data_loaded: bool,
    pub constitution_loaded: bool,
}

async fn status(State(state): State<AppState>) -> Json<Status> {
    Json(Status {
        status: STATUS_TEXT,
        data_loaded: state.data.data_loaded(),
        constitution_loaded: state.data.constitution_loaded(),
    })
}

/// The body is read as JSON whatever its `Content-Type`.
async fn handle_chat(State(state): State<AppState>, body: Bytes) -> Json<ChatResponse> {
    let request = match serde_json::from_slice::<ChatRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Unreadable chat body: {}", e);
            ChatRequest::default()
        }
    };

    let response = chat::answer(&state, request.message.as_deref()).await;
    Json(ChatResponse { response })
}

/// Answers every `OPTIONS` request itself with an empty 200.
fn cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = ALLOWED_ORIGINS
        .iter()
        .map(|o| HeaderValue::from_static(*o))
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/chat", post(handle_chat))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

    info!("Test the server at: http://{}/", addr);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::tests::{CannedModel, FailingModel};
    use crate::chat::{CONFIG_ERROR, INVALID_QUESTION, UPSTREAM_APOLOGY};
    use crate::dataset::Dataset;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn send(
        router: Router,
        req: Request<Body>,
    ) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        (status, headers, body)
    }

    fn post_chat(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn chat_reply(state: AppState, body: &str) -> String {
        let (status, _, body) = send(build_router(state), post_chat(body)).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        json["response"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_status_without_data_files() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(Dataset::load(dir.path()), None);

        let req = Request::get("/").body(Body::empty()).unwrap();
        let (status, _, body) = send(build_router(state), req).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], STATUS_TEXT);
        assert_eq!(json["data_loaded"], false);
        assert_eq!(json["constitution_loaded"], false);
    }

    #[tokio::test]
    async fn test_status_with_data_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.csv"), "Heading\nPreamble\n").unwrap();
        std::fs::write(dir.path().join("Constitution Of India.csv"), "Articles\nText\n").unwrap();
        let state = AppState::new(Dataset::load(dir.path()), None);

        let req = Request::get("/").body(Body::empty()).unwrap();
        let (_, _, body) = send(build_router(state), req).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data_loaded"], true);
        assert_eq!(json["constitution_loaded"], true);
    }

    #[tokio::test]
    async fn test_chat_without_message() {
        let state = AppState::new(Dataset::default(), Some(Arc::new(CannedModel::default())));
        assert_eq!(chat_reply(state.clone(), "{}").await, INVALID_QUESTION);
        assert_eq!(chat_reply(state.clone(), r#"{"message": ""}"#).await, INVALID_QUESTION);
        assert_eq!(chat_reply(state, "not json").await, INVALID_QUESTION);
    }

    #[tokio::test]
    async fn test_chat_body_without_json_content_type() {
        let model = CannedModel {
            answer: "Article 19 protects free speech.".to_string(),
            ..Default::default()
        };
        let state = AppState::new(Dataset::default(), Some(Arc::new(model)));
        let req = Request::builder()
            .method(Method::POST)
            .uri("/chat")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(r#"{"message": "hi"}"#))
            .unwrap();
        let (status, _, body) = send(build_router(state), req).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["response"], "Article 19 protects free speech.");
    }

    #[tokio::test]
    async fn test_chat_without_credential() {
        let state = AppState::new(Dataset::default(), None);
        let reply = chat_reply(state, r#"{"message": "What is Article 14?"}"#).await;
        assert_eq!(reply, CONFIG_ERROR);
    }

    #[tokio::test]
    async fn test_chat_upstream_failure() {
        let state = AppState::new(Dataset::default(), Some(Arc::new(FailingModel)));
        let reply = chat_reply(state, r#"{"message": "What is Article 14?"}"#).await;
        assert_eq!(reply, UPSTREAM_APOLOGY);
    }

    #[tokio::test]
    async fn test_chat_success() {
        let model = CannedModel {
            answer: "Article 14 guarantees equality before the law.".to_string(),
            ..Default::default()
        };
        let state = AppState::new(Dataset::default(), Some(Arc::new(model)));
        let reply = chat_reply(state, r#"{"message": "What is Article 14?"}"#).await;
        assert_eq!(reply, "Article 14 guarantees equality before the law.");
    }

    #[tokio::test]
    async fn test_plain_options_is_empty_ok() {
        let state = AppState::new(Dataset::default(), None);
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/chat")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(build_router(state), req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_preflight_from_allowed_origin() {
        let state = AppState::new(Dataset::default(), None);
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/chat")
            .header(header::ORIGIN, "http://localhost:5500")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        let (status, headers, _) = send(build_router(state), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5500"
        );
    }

    #[tokio::test]
    async fn test_foreign_origin_gets_no_cors_header() {
        let state = AppState::new(Dataset::default(), None);
        let req = Request::get("/")
            .header(header::ORIGIN, "https://evil.example")
            .body(Body::empty())
            .unwrap();
        let (status, headers, _) = send(build_router(state), req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
