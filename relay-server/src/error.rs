use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use relay_shared::ErrorDetail;
use thiserror::Error;

/// Everything `/chat` can fail with. Each variant maps to exactly one
/// status code and one `{"detail": ...}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("The 'prompt' and 'query' fields cannot be empty.")]
    EmptyFields,
    #[error("Agent failed to respond: {0}")]
    Agent(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyFields => StatusCode::BAD_REQUEST,
            ApiError::Agent(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorDetail {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
