use crate::domain::ports::ChatModel;
use crate::llm::ChatOptions;
use crate::utils::error::{FigCopyError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const OLLAMA_API_BASE: &str = "http://localhost:11434";

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

/// GET /api/tags 的模型資訊
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaModel {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modified_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

/// 本地 Ollama 服務客戶端，無需認證
#[derive(Debug)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    options: ChatOptions,
}

impl OllamaClient {
    pub fn new(base_url: String, options: ChatOptions) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            options,
        }
    }

    /// 列出本地已安裝的模型
    pub async fn list_models(&self) -> Result<Vec<OllamaModel>> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FigCopyError::ApiStatusError {
                provider: "Ollama".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaTagsResponse = response.json().await?;
        tracing::info!("📋 Ollama has {} local models", parsed.models.len());
        Ok(parsed.models)
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    async fn chat(&self, prompt: &str) -> Result<String> {
        let request = OllamaChatRequest {
            model: self.options.model.clone(),
            messages: vec![OllamaMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
            options: OllamaOptions {
                temperature: self.options.temperature,
                num_predict: self.options.max_tokens,
            },
        };

        tracing::debug!("🚀 Ollama request: model={}", self.options.model);

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FigCopyError::ApiStatusError {
                provider: "Ollama".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaChatResponse = response.json().await?;
        if parsed.message.content.is_empty() {
            return Err(FigCopyError::EmptyResponseError {
                provider: "Ollama".to_string(),
            });
        }
        Ok(parsed.message.content)
    }

    fn provider_name(&self) -> &str {
        "Ollama"
    }

    fn model_name(&self) -> &str {
        &self.options.model
    }
}
