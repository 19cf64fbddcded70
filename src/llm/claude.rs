use crate::domain::ports::ChatModel;
use crate::llm::ChatOptions;
use crate::utils::error::{FigCopyError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const CLAUDE_API_BASE: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<RequestMessage>,
}

#[derive(Debug, Serialize)]
struct RequestMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug)]
pub struct ClaudeClient {
    client: Client,
    api_key: String,
    base_url: String,
    options: ChatOptions,
}

impl ClaudeClient {
    pub fn new(api_key: String, options: ChatOptions) -> Self {
        Self::with_base_url(api_key, options, CLAUDE_API_BASE.to_string())
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
impl ChatModel for ClaudeClient {
    async fn chat(&self, prompt: &str) -> Result<String> {
        let request = MessagesRequest {
            model: self.options.model.clone(),
            max_tokens: self.options.max_tokens,
            messages: vec![RequestMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        tracing::debug!("🚀 Claude request: model={}", self.options.model);

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FigCopyError::ApiStatusError {
                provider: "Claude".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        parsed
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| FigCopyError::EmptyResponseError {
                provider: "Claude".to_string(),
            })
    }

    fn provider_name(&self) -> &str {
        "Claude"
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
    async fn test_chat_sends_anthropic_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/messages")
                .header("x-api-key", "ck-test")
                .header("anthropic-version", "2023-06-01")
                .json_body_partial(r#"{"model": "claude-3-sonnet-20240229", "max_tokens": 2000}"#);
            then.status(200).json_body(serde_json::json!({
                "content": [{"type": "text", "text": "structured output"}]
            }));
        });

        let client = ClaudeClient::with_base_url(
            "ck-test".to_string(),
            ChatOptions::new(DEFAULT_MODEL),
            server.base_url(),
        );
        let content = client.chat("hi").await.unwrap();

        mock.assert();
        assert_eq!(content, "structured output");
    }

    #[tokio::test]
    async fn test_chat_empty_content_blocks() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(200).json_body(serde_json::json!({"content": []}));
        });

        let client = ClaudeClient::with_base_url(
            "ck-test".to_string(),
            ChatOptions::new(DEFAULT_MODEL),
            server.base_url(),
        );
        assert!(matches!(
            client.chat("hi").await.unwrap_err(),
            FigCopyError::EmptyResponseError { .. }
        ));
    }
}
