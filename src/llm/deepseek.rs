use crate::domain::ports::ChatModel;
use crate::llm::openai_compat::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::llm::ChatOptions;
use crate::utils::error::{FigCopyError, Result};
use async_trait::async_trait;
use reqwest::Client;

pub const DEEPSEEK_API_BASE: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

#[derive(Debug)]
pub struct DeepSeekClient {
    client: Client,
    api_key: String,
    base_url: String,
    options: ChatOptions,
}

impl DeepSeekClient {
    pub fn new(api_key: String, options: ChatOptions) -> Self {
        Self::with_base_url(api_key, options, DEEPSEEK_API_BASE.to_string())
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
impl ChatModel for DeepSeekClient {
    async fn chat(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.options.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: Some(self.options.temperature),
            max_tokens: Some(self.options.max_tokens),
        };

        tracing::debug!("🚀 DeepSeek request: model={}", self.options.model);

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
                provider: "DeepSeek".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        parsed
            .first_content()
            .ok_or_else(|| FigCopyError::EmptyResponseError {
                provider: "DeepSeek".to_string(),
            })
    }

    fn provider_name(&self) -> &str {
        "DeepSeek"
    }

    fn model_name(&self) -> &str {
        &self.options.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_chat_request_shape_and_content() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("Authorization", "Bearer sk-test")
                .json_body_partial(
                    r#"{"model": "deepseek-chat", "temperature": 0.2, "max_tokens": 2000}"#,
                );
            then.status(200).json_body(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "{\"title\": \"ok\"}"}}]
            }));
        });

        let client = DeepSeekClient::with_base_url(
            "sk-test".to_string(),
            ChatOptions::new(DEFAULT_MODEL),
            server.base_url(),
        );
        let content = client.chat("hello").await.unwrap();

        mock.assert();
        assert_eq!(content, "{\"title\": \"ok\"}");
    }

    #[tokio::test]
    async fn test_chat_empty_content_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": ""}}]
            }));
        });

        let client = DeepSeekClient::with_base_url(
            "sk-test".to_string(),
            ChatOptions::new(DEFAULT_MODEL),
            server.base_url(),
        );
        let err = client.chat("hello").await.unwrap_err();
        assert!(matches!(err, FigCopyError::EmptyResponseError { .. }));
    }

    #[tokio::test]
    async fn test_chat_http_error_surfaces_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429).body("rate limited");
        });

        let client = DeepSeekClient::with_base_url(
            "sk-test".to_string(),
            ChatOptions::new(DEFAULT_MODEL),
            server.base_url(),
        );
        match client.chat("hello").await.unwrap_err() {
            FigCopyError::ApiStatusError { status, .. } => assert_eq!(status, 429),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
