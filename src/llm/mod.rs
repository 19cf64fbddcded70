pub mod claude;
pub mod deepseek;
pub mod ollama;
pub mod openai;
pub mod openai_compat;

use crate::config::settings::Settings;
use crate::domain::ports::ChatModel;
use crate::utils::error::{FigCopyError, Result};
use serde::{Deserialize, Serialize};

/// 所有客戶端共用的推論參數
#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: 2000,
            temperature: 0.2,
        }
    }

    pub fn with_limits(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }
}

/// 支援的 AI 服務提供商
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Deepseek,
    Openai,
    Claude,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Deepseek => "deepseek",
            Provider::Openai => "openai",
            Provider::Claude => "claude",
            Provider::Ollama => "ollama",
        }
    }

    pub fn default_model(&self) -> Option<&'static str> {
        match self {
            Provider::Deepseek => Some(deepseek::DEFAULT_MODEL),
            Provider::Openai => Some(openai::DEFAULT_MODEL),
            Provider::Claude => Some(claude::DEFAULT_MODEL),
            // Ollama 沒有預設模型，必須由使用者選擇
            Provider::Ollama => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 依提供商與設定建立聊天客戶端
///
/// 雲端提供商需要 API 密鑰；Ollama 需要選定模型。
/// 模型解析順序：命令列覆寫 > 設定檔 > 提供商預設值
pub fn build_model(
    provider: Provider,
    settings: &Settings,
    model_override: Option<&str>,
) -> Result<Box<dyn ChatModel>> {
    let resolve_model = |configured: Option<&str>| -> Result<String> {
        model_override
            .map(str::to_string)
            .or_else(|| configured.map(str::to_string))
            .or_else(|| provider.default_model().map(str::to_string))
            .ok_or_else(|| FigCopyError::MissingConfigError {
                field: format!("{}_model", provider),
            })
    };

    let options = |model: String| {
        ChatOptions::new(model).with_limits(settings.max_tokens, settings.temperature)
    };

    match provider {
        Provider::Deepseek => {
            let api_key = settings.require_api_key(provider)?;
            let model = resolve_model(None)?;
            Ok(Box::new(deepseek::DeepSeekClient::new(api_key, options(model))))
        }
        Provider::Openai => {
            let api_key = settings.require_api_key(provider)?;
            let model = resolve_model(None)?;
            Ok(Box::new(openai::OpenAiClient::new(api_key, options(model))))
        }
        Provider::Claude => {
            let api_key = settings.require_api_key(provider)?;
            let model = resolve_model(None)?;
            Ok(Box::new(claude::ClaudeClient::new(api_key, options(model))))
        }
        Provider::Ollama => {
            let model = resolve_model(settings.ollama_model.as_deref())?;
            Ok(Box::new(ollama::OllamaClient::new(
                settings.ollama_endpoint.clone(),
                options(model),
            )))
        }
    }
}
