use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use relay_shared::{ChatReply, ChatRequest, HealthStatus};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::{agent::ChatModel, error::ApiError};

/// Built once at startup, read-only afterwards.
pub type SharedAgent = Arc<dyn ChatModel>;

pub fn create_router() -> Router<SharedAgent> {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}

async fn chat(
    State(agent): State<SharedAgent>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    if request.prompt.trim().is_empty() || request.query.trim().is_empty() {
        return Err(ApiError::EmptyFields);
    }

    let reply = agent
        .complete(&request.prompt, &request.query)
        .await
        .map_err(|e| {
            error!("Agent invocation failed: {}", e);
            ApiError::Agent(e.to_string())
        })?;

    Ok(Json(ChatReply { reply }))
}
