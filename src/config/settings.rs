use crate::llm::Provider;
use crate::utils::error::{FigCopyError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 使用者設定 (API 密鑰、提供商參數、自訂提示詞、上次使用的模型)
///
/// 對應原系統的 key-value 設定儲存，以 TOML 檔案保存
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub figma_api_token: Option<String>,

    pub deepseek_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub claude_api_key: Option<String>,

    pub ollama_endpoint: String,
    pub ollama_model: Option<String>,

    pub max_tokens: u32,
    pub temperature: f32,

    /// 自訂提示詞模板，取代對應操作的內建模板
    pub custom_prompt: Option<String>,

    /// 成功執行後回寫
    pub last_used_model: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            figma_api_token: None,
            deepseek_api_key: None,
            openai_api_key: None,
            claude_api_key: None,
            ollama_endpoint: crate::llm::ollama::OLLAMA_API_BASE.to_string(),
            ollama_model: None,
            max_tokens: 2000,
            temperature: 0.2,
            custom_prompt: None,
            last_used_model: None,
        }
    }
}

impl Settings {
    /// 從 TOML 檔案載入，檔案不存在時使用預設值
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("Settings file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| FigCopyError::ConfigValidationError {
            field: "settings".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 回寫設定檔 (例如更新 last_used_model)
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| FigCopyError::ConfigError {
            message: format!("Failed to serialize settings: {}", e),
        })?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 只更新檔案裡的 last_used_model，其他內容原樣保留
    ///
    /// 在未經環境變數替換的原文上操作，`${VAR}` 引用不會被展開後寫回
    pub fn persist_last_used_model<P: AsRef<Path>>(path: P, model: &str) -> Result<()> {
        let path = path.as_ref();
        let mut table = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            content
                .parse::<toml::Table>()
                .map_err(|e| FigCopyError::ConfigValidationError {
                    field: "settings".to_string(),
                    message: format!("TOML parsing error: {}", e),
                })?
        } else {
            toml::Table::new()
        };

        table.insert(
            "last_used_model".to_string(),
            toml::Value::String(model.to_string()),
        );

        let content = toml::to_string_pretty(&table).map_err(|e| FigCopyError::ConfigError {
            message: format!("Failed to serialize settings: {}", e),
        })?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn api_key_for(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Deepseek => self.deepseek_api_key.as_deref(),
            Provider::Openai => self.openai_api_key.as_deref(),
            Provider::Claude => self.claude_api_key.as_deref(),
            Provider::Ollama => None,
        }
    }

    /// 雲端提供商必須配置 API 密鑰
    pub fn require_api_key(&self, provider: Provider) -> Result<String> {
        self.api_key_for(provider)
            .filter(|key| !key.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| FigCopyError::MissingConfigError {
                field: format!("{}_api_key", provider),
            })
    }
}

/// 替換 ${VAR_NAME} 格式的環境變數，未定義時保留原樣
fn substitute_env_vars(content: &str) -> String {
    use regex::Regex;
    let re = Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}
