use anyhow::{anyhow, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{info, warn};

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// The relay's single external collaborator: a tool-less agent that turns
/// one (system instruction, user query) pair into one textual reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str, query: &str) -> Result<String>;
}

pub struct OpenAiAgent {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiAgent {
    pub fn new(api_key: String, model: String) -> Self {
        info!("Initializing agent with model: {}", model);
        let config = OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(config);
        Self { client, model }
    }

    /// A missing key is not a startup failure; the provider rejects the
    /// first call instead and the handler surfaces that as a 500.
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
            warn!("OPENAI_API_KEY not set; model calls will fail until it is");
            String::new()
        });
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(api_key, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for OpenAiAgent {
    async fn complete(&self, prompt: &str, query: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(build_conversation(prompt, query)?)
            .build()?;

        let response = self.client.chat().create(request).await?;

        let reply = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("model returned no text content"))?;

        Ok(reply)
    }
}

/// Exactly two entries, system instruction first, user query second, both
/// carried verbatim. The agent gets no tools.
fn build_conversation(prompt: &str, query: &str) -> Result<Vec<ChatCompletionRequestMessage>> {
    let system = ChatCompletionRequestMessage::System(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(prompt.to_string())
            .build()?,
    );
    let user = ChatCompletionRequestMessage::User(
        ChatCompletionRequestUserMessageArgs::default()
            .content(query.to_string())
            .build()?,
    );
    Ok(vec![system, user])
}
