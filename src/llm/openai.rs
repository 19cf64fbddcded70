use crate::domain::ports::ChatModel;
use crate::llm::openai_compat::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::llm::ChatOptions;
use crate::utils::error::{FigCopyError, Result};
use async_trait::async_trait;
use reqwest::Client;

pub const OPENAI_API_BASE: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    options: ChatOptions,
}

impl OpenAiClient {
    pub fn new(api_key: String, options: ChatOptions) -> Self {
        Self::with_base_url(api_key, options, OPENAI_API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, options: ChatOptions, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            options,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn chat(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.options.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: Some(self.options.temperature),
            max_tokens: Some(self.options.max_tokens),
        };

        tracing::debug!("🚀 OpenAI request: model={}", self.options.model);

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FigCopyError::ApiStatusError {
                provider: "OpenAI".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        parsed
            .first_content()
            .ok_or_else(|| FigCopyError::EmptyResponseError {
                provider: "OpenAI".to_string(),
            })
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }

    fn model_name(&self) -> &str {
        &self.options.model
    }
}
