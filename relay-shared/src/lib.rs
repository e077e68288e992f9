use serde::{Deserialize, Serialize};

/// One submission from the Client Form to the Relay Service.
///
/// Both fields must be non-empty after trimming; the relay rejects the
/// request before touching the model otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// System-role instruction that conditions the model for this request.
    pub prompt: String,
    /// The user's actual question.
    pub query: String,
}

/// Successful relay response: the agent's final textual answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Wire shape of every relay failure, paired with a non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: "API is healthy".to_string(),
        }
    }
}
