use anyhow::{bail, Context, Result};
use relay_shared::{ChatRequest, ErrorDetail};
use tracing::debug;

/// What a 2xx relay response turned out to contain.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    /// The expected `{"reply": ...}` shape.
    Reply(String),
    /// A 2xx body without a `reply` field, carried raw for diagnosis.
    UnexpectedFormat(String),
}

pub struct RelayClient {
    http: reqwest::Client,
    chat_url: String,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            chat_url: format!("{}/chat", base_url.trim_end_matches('/')),
        }
    }

    /// One POST per submission, no retries. Transport problems and non-2xx
    /// statuses are errors; a 2xx with the wrong shape is a `ChatOutcome`
    /// so the UI can warn about it separately.
    pub async fn send(&self, prompt: String, query: String) -> Result<ChatOutcome> {
        let request = ChatRequest { prompt, query };
        debug!("POST {}", self.chat_url);

        let response = self
            .http
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await
            .context("failed to reach the relay service")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read the relay response")?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorDetail>(&body)
                .map(|e| e.detail)
                .unwrap_or(body);
            bail!("relay returned {}: {}", status, detail);
        }

        interpret_body(&body)
    }
}

fn interpret_body(body: &str) -> Result<ChatOutcome> {
    let value: serde_json::Value =
        serde_json::from_str(body).context("relay returned malformed JSON")?;

    match value.get("reply").and_then(|r| r.as_str()) {
        Some(reply) => Ok(ChatOutcome::Reply(reply.to_string())),
        None => Ok(ChatOutcome::UnexpectedFormat(body.to_string())),
    }
}
