use crate::domain::model::Operation;
use crate::domain::ports::ConfigProvider;
use crate::llm::Provider;
use crate::utils::error::{FigCopyError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "figcopy")]
#[command(about = "Extract UI copy from Figma files and structure it with an LLM")]
pub struct CliConfig {
    /// Figma 檔案 URL (file key 與 node id 會自動解析)
    #[arg(long)]
    pub figma_url: Option<String>,

    /// 直接指定檔案 key，優先於 URL 解析結果
    #[arg(long)]
    pub file_key: Option<String>,

    /// 只擷取指定節點及其子樹
    #[arg(long)]
    pub node_id: Option<String>,

    /// 只擷取指定頁面
    #[arg(long)]
    pub page_id: Option<String>,

    /// 使用本地文件快照 (匯出的節點樹 JSON) 取代 REST API
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "deepseek")]
    pub provider: Provider,

    #[arg(long, value_enum, default_value = "generate-json")]
    pub operation: Operation,

    /// 覆寫模型名稱
    #[arg(long)]
    pub model: Option<String>,

    /// 翻譯目標語言代碼 (zh / en / ja / ...)
    #[arg(long, default_value = "zh")]
    pub target_language: String,

    /// 項目背景描述，放進提示詞
    #[arg(long)]
    pub project_description: Option<String>,

    #[arg(long, default_value = "./figcopy.toml")]
    pub settings_path: PathBuf,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// 列出本地 Ollama 模型後退出
    #[arg(long)]
    pub list_models: bool,

    /// 驗證 Figma API token 後退出
    #[arg(long)]
    pub check_token: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

impl CliConfig {
    /// 是否為不需要文案來源的輔助命令
    pub fn is_auxiliary(&self) -> bool {
        self.list_models || self.check_token
    }
}

impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn operation(&self) -> Operation {
        self.operation
    }

    fn project_description(&self) -> Option<&str> {
        self.project_description.as_deref()
    }

    fn target_language(&self) -> &str {
        &self.target_language
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty_string("target_language", &self.target_language)?;

        if let Some(url) = &self.figma_url {
            validation::validate_url("figma_url", url)?;
        }

        if self.is_auxiliary() {
            return Ok(());
        }

        // 必須指定一種文案來源
        if self.snapshot.is_none() && self.figma_url.is_none() && self.file_key.is_none() {
            return Err(FigCopyError::MissingConfigError {
                field: "figma_url | file_key | snapshot".to_string(),
            });
        }

        if self.snapshot.is_some() && (self.figma_url.is_some() || self.file_key.is_some()) {
            return Err(FigCopyError::InvalidConfigValueError {
                field: "snapshot".to_string(),
                value: self
                    .snapshot
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                reason: "snapshot and figma_url/file_key are mutually exclusive".to_string(),
            });
        }

        Ok(())
    }
}
