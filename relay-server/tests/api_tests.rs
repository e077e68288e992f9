use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use relay_server::agent::ChatModel;
use relay_server::routes::{create_router, SharedAgent};
use relay_shared::{ChatReply, ErrorDetail, HealthStatus};
use tower::util::ServiceExt;

/// Deterministic stand-in for the hosted model; counts invocations so
/// tests can prove validation failures never reach it.
#[derive(Default)]
struct CountingAgent {
    calls: AtomicUsize,
}

#[async_trait]
impl ChatModel for CountingAgent {
    async fn complete(&self, prompt: &str, query: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("[{}] {}", prompt, query))
    }
}

struct FailingAgent;

#[async_trait]
impl ChatModel for FailingAgent {
    async fn complete(&self, _prompt: &str, _query: &str) -> Result<String> {
        Err(anyhow!("quota exceeded"))
    }
}

fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn health_reports_ok_without_a_model() {
    // The failing agent proves /health does not depend on the provider.
    let app = create_router().with_state(Arc::new(FailingAgent) as SharedAgent);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health: HealthStatus = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.message, "API is healthy");
}

#[tokio::test]
async fn chat_returns_the_agent_reply() {
    let agent = Arc::new(CountingAgent::default());
    let app = create_router().with_state(agent.clone() as SharedAgent);

    let response = app
        .oneshot(chat_request(
            r#"{"prompt": "You are a botanist.", "query": "What is photosynthesis?"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let reply: ChatReply = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(reply.reply, "[You are a botanist.] What is photosynthesis?");
    assert_eq!(agent.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_fields_are_rejected_before_the_model_is_called() {
    let cases = [
        r#"{"prompt": "", "query": ""}"#,
        r#"{"prompt": "", "query": "What is photosynthesis?"}"#,
        r#"{"prompt": "You are a botanist.", "query": ""}"#,
        r#"{"prompt": "   ", "query": "What is photosynthesis?"}"#,
    ];

    for body in cases {
        let agent = Arc::new(CountingAgent::default());
        let app = create_router().with_state(agent.clone() as SharedAgent);

        let response = app.oneshot(chat_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let detail: ErrorDetail = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(
            detail.detail,
            "The 'prompt' and 'query' fields cannot be empty."
        );
        assert_eq!(agent.calls.load(Ordering::SeqCst), 0, "body: {body}");
    }
}

#[tokio::test]
async fn model_failure_becomes_a_500_with_the_cause() {
    let app = create_router().with_state(Arc::new(FailingAgent) as SharedAgent);

    let response = app
        .oneshot(chat_request(
            r#"{"prompt": "You are a botanist.", "query": "What is photosynthesis?"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let detail: ErrorDetail = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(detail.detail, "Agent failed to respond: quota exceeded");
}

#[tokio::test]
async fn identical_requests_get_identical_replies() {
    let agent = Arc::new(CountingAgent::default());
    let app = create_router().with_state(agent as SharedAgent);

    let body = r#"{"prompt": "You are a botanist.", "query": "What is photosynthesis?"}"#;

    let first = app.clone().oneshot(chat_request(body)).await.unwrap();
    let second = app.oneshot(chat_request(body)).await.unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_bytes(first).await, body_bytes(second).await);
}
