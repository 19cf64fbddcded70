use crate::config::settings::Settings;
use crate::core::parser;
use crate::domain::model::{
    CopyReport, ExtractionResult, Operation, TransformOutput,
};
use crate::domain::ports::{ChatModel, ConfigProvider, Pipeline, Storage, TextSource};
use crate::prompts;
use crate::utils::error::Result;
use std::path::PathBuf;

/// 結構化輸出過大的警示門檻 (bytes)
const JSON_SIZE_WARN_THRESHOLD: usize = 5000;
const TRANSLATED_JSON_SIZE_WARN_THRESHOLD: usize = 8000;

/// 文案處理管道：擷取 Figma 文案 → 呼叫模型 → 寫出結果
pub struct CopyPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    source: Box<dyn TextSource>,
    model: Box<dyn ChatModel>,
    settings: Settings,
    settings_path: PathBuf,
}

impl<S: Storage, C: ConfigProvider> CopyPipeline<S, C> {
    pub fn new(
        storage: S,
        config: C,
        source: Box<dyn TextSource>,
        model: Box<dyn ChatModel>,
        settings: Settings,
        settings_path: PathBuf,
    ) -> Self {
        Self {
            storage,
            config,
            source,
            model,
            settings,
            settings_path,
        }
    }

    fn build_report(&self, operation: Operation, raw_response: String) -> CopyReport {
        let timestamp = chrono::Utc::now().to_rfc3339();

        match operation {
            Operation::Translate => {
                let pairs = parser::parse_translation_pairs(&raw_response);
                CopyReport {
                    page_title: "翻译对照".to_string(),
                    description: format!("成功翻译 {} 条文案", pairs.len()),
                    suggestions: vec![
                        "翻译对照完成".to_string(),
                        "可复制用于多语言开发".to_string(),
                    ],
                    timestamp,
                    generated_json: None,
                    pairs,
                    raw_response,
                }
            }
            Operation::GenerateJson => {
                let parsed = parser::parse_structured(&raw_response, "页面标题");
                let mut suggestions = vec![
                    "文案结构已优化".to_string(),
                    "建议检查键名规范性".to_string(),
                    "可用于前端开发".to_string(),
                ];
                if parsed.degraded {
                    suggestions.push("JSON解析失败，已保留原始响应，建议重试".to_string());
                }
                if let Some(warning) =
                    parser::size_warning(&parsed.value, JSON_SIZE_WARN_THRESHOLD)
                {
                    suggestions.push(warning);
                }

                CopyReport {
                    page_title: parser::page_title_of(&parsed.value, "文案结构"),
                    description: "成功生成结构化文案JSON".to_string(),
                    suggestions,
                    timestamp,
                    generated_json: Some(parsed.value),
                    pairs: Vec::new(),
                    raw_response,
                }
            }
            Operation::TranslateAndStructure => {
                let parsed = parser::parse_structured(&raw_response, "翻译结构化页面");
                let mut suggestions = vec![
                    "翻译和结构化完成".to_string(),
                    "建议检查翻译质量".to_string(),
                    "建议检查键名规范性".to_string(),
                    "可用于多语言前端开发".to_string(),
                ];
                if parsed.degraded {
                    suggestions.push("JSON解析失败，已保留原始响应，建议重试".to_string());
                }
                if let Some(warning) =
                    parser::size_warning(&parsed.value, TRANSLATED_JSON_SIZE_WARN_THRESHOLD)
                {
                    suggestions.push(warning);
                }

                CopyReport {
                    page_title: parser::page_title_of(&parsed.value, "翻译结构化文案"),
                    description: "成功翻译并生成结构化文案JSON".to_string(),
                    suggestions,
                    timestamp,
                    generated_json: Some(parsed.value),
                    pairs: Vec::new(),
                    raw_response,
                }
            }
        }
    }

    /// 成功執行後回寫 last_used_model，失敗只警告不中斷
    fn persist_last_used_model(&self) {
        if let Err(e) =
            Settings::persist_last_used_model(&self.settings_path, self.model.model_name())
        {
            tracing::warn!("⚠️ Could not persist last used model: {}", e);
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CopyPipeline<S, C> {
    async fn extract(&self) -> Result<ExtractionResult> {
        tracing::info!("🔍 Extracting texts from {}", self.source.describe());
        let result = self.source.extract().await?;

        let preview: Vec<&str> = result
            .texts
            .iter()
            .take(5)
            .map(|t| t.text.as_str())
            .collect();
        tracing::debug!("📝 First texts: {:?}", preview);

        Ok(result)
    }

    async fn transform(&self, data: ExtractionResult) -> Result<TransformOutput> {
        let operation = self.config.operation();

        // 空擷取不呼叫模型，render_prompt 會回報驗證錯誤
        let prompt = prompts::render_prompt(
            operation,
            &data.texts,
            self.config.project_description(),
            self.config.target_language(),
            self.settings.custom_prompt.as_deref(),
        )?;

        tracing::info!(
            "🤖 Sending {} texts to {} ({})",
            data.total_text_count,
            self.model.provider_name(),
            self.model.model_name()
        );
        tracing::debug!("📤 Prompt length: {} chars", prompt.chars().count());

        let raw_response = self.model.chat(&prompt).await?;
        tracing::debug!("📥 Raw response length: {} chars", raw_response.chars().count());

        Ok(TransformOutput {
            report: self.build_report(operation, raw_response),
            operation,
        })
    }

    async fn load(&self, result: TransformOutput) -> Result<String> {
        let report_json = serde_json::to_string_pretty(&result.report)?;
        self.storage
            .write_file("report.json", report_json.as_bytes())
            .await?;

        match result.operation {
            Operation::Translate => {
                let lines = result
                    .report
                    .pairs
                    .iter()
                    .map(|pair| format!("{}：{}", pair.original, pair.translated))
                    .collect::<Vec<_>>()
                    .join("\n");
                self.storage
                    .write_file("translations.txt", lines.as_bytes())
                    .await?;
            }
            Operation::GenerateJson | Operation::TranslateAndStructure => {
                if let Some(generated) = &result.report.generated_json {
                    let pretty = serde_json::to_string_pretty(generated)?;
                    self.storage
                        .write_file("copy_structure.json", pretty.as_bytes())
                        .await?;
                }
            }
        }

        self.persist_last_used_model();

        Ok(self.config.output_path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::TextInfo;
    use crate::utils::error::FigCopyError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                FigCopyError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        operation: Operation,
    }

    impl ConfigProvider for MockConfig {
        fn output_path(&self) -> &str {
            "test_output"
        }

        fn operation(&self) -> Operation {
            self.operation
        }

        fn project_description(&self) -> Option<&str> {
            None
        }

        fn target_language(&self) -> &str {
            "zh"
        }
    }

    struct MockSource {
        texts: Vec<TextInfo>,
    }

    #[async_trait]
    impl crate::domain::ports::TextSource for MockSource {
        async fn extract(&self) -> Result<ExtractionResult> {
            Ok(ExtractionResult {
                elements: Vec::new(),
                total_text_count: self.texts.len(),
                texts: self.texts.clone(),
                source: "mock".to_string(),
            })
        }

        fn describe(&self) -> String {
            "mock source".to_string()
        }
    }

    #[derive(Debug)]
    struct MockModel {
        response: String,
    }

    #[async_trait]
    impl ChatModel for MockModel {
        async fn chat(&self, _prompt: &str) -> Result<String> {
            Ok(self.response.clone())
        }

        fn provider_name(&self) -> &str {
            "Mock"
        }

        fn model_name(&self) -> &str {
            "mock-model"
        }
    }

    fn text(content: &str) -> TextInfo {
        TextInfo {
            id: "1:1".to_string(),
            name: "t".to_string(),
            text: content.to_string(),
            font_size: 16.0,
            font_family: "Inter".to_string(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    fn pipeline(
        storage: MockStorage,
        operation: Operation,
        texts: Vec<TextInfo>,
        response: &str,
        settings_path: PathBuf,
    ) -> CopyPipeline<MockStorage, MockConfig> {
        CopyPipeline::new(
            storage,
            MockConfig { operation },
            Box::new(MockSource { texts }),
            Box::new(MockModel {
                response: response.to_string(),
            }),
            Settings::default(),
            settings_path,
        )
    }

    fn temp_settings_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("figcopy.toml")
    }

    #[tokio::test]
    async fn test_transform_refuses_empty_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(
            MockStorage::new(),
            Operation::GenerateJson,
            vec![],
            "{}",
            temp_settings_path(&dir),
        );

        let data = p.extract().await.unwrap();
        let err = p.transform(data).await.unwrap_err();
        assert!(matches!(err, FigCopyError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn test_generate_json_roundtrip_writes_structure() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MockStorage::new();
        let p = pipeline(
            storage.clone(),
            Operation::GenerateJson,
            vec![text("Sign in")],
            r#"{"__page_title": "Login", "btn_submit": "Sign in"}"#,
            temp_settings_path(&dir),
        );

        let data = p.extract().await.unwrap();
        let output = p.transform(data).await.unwrap();
        assert_eq!(output.report.page_title, "Login");

        let path = p.load(output).await.unwrap();
        assert_eq!(path, "test_output");

        let structure = storage.get_file("copy_structure.json").await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&structure).unwrap();
        assert_eq!(value["btn_submit"], "Sign in");

        assert!(storage.get_file("report.json").await.is_some());
    }

    #[tokio::test]
    async fn test_translate_writes_pair_lines() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MockStorage::new();
        let p = pipeline(
            storage.clone(),
            Operation::Translate,
            vec![text("Sign in")],
            "Sign in：登录",
            temp_settings_path(&dir),
        );

        let data = p.extract().await.unwrap();
        let output = p.transform(data).await.unwrap();
        assert_eq!(output.report.pairs.len(), 1);

        p.load(output).await.unwrap();

        let lines = storage.get_file("translations.txt").await.unwrap();
        assert_eq!(String::from_utf8(lines).unwrap(), "Sign in：登录");
    }

    #[tokio::test]
    async fn test_malformed_response_still_produces_report() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MockStorage::new();
        let p = pipeline(
            storage.clone(),
            Operation::TranslateAndStructure,
            vec![text("Sign in")],
            "sorry, no json here",
            temp_settings_path(&dir),
        );

        let data = p.extract().await.unwrap();
        let output = p.transform(data).await.unwrap();

        let generated = output.report.generated_json.as_ref().unwrap();
        assert_eq!(generated["error"], "未找到有效的JSON格式");
        assert_eq!(generated["__page_title"], "翻译结构化页面");
        assert!(output
            .report
            .suggestions
            .iter()
            .any(|s| s.contains("JSON解析失败")));

        p.load(output).await.unwrap();
        assert!(storage.get_file("copy_structure.json").await.is_some());
    }

    #[tokio::test]
    async fn test_load_keeps_env_references_in_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = temp_settings_path(&dir);
        std::fs::write(&settings_path, "deepseek_api_key = \"${FIGCOPY_RUN_KEY}\"\n").unwrap();
        std::env::set_var("FIGCOPY_RUN_KEY", "sk-resolved-secret");

        let settings = Settings::load(&settings_path).unwrap();
        assert_eq!(
            settings.deepseek_api_key.as_deref(),
            Some("sk-resolved-secret")
        );

        let p = CopyPipeline::new(
            MockStorage::new(),
            MockConfig {
                operation: Operation::GenerateJson,
            },
            Box::new(MockSource {
                texts: vec![text("Sign in")],
            }),
            Box::new(MockModel {
                response: "{}".to_string(),
            }),
            settings,
            settings_path.clone(),
        );

        let data = p.extract().await.unwrap();
        let output = p.transform(data).await.unwrap();
        p.load(output).await.unwrap();

        // 回寫後 ${VAR} 引用仍在，展開後的密鑰沒有落盤
        let raw = std::fs::read_to_string(&settings_path).unwrap();
        assert!(raw.contains("${FIGCOPY_RUN_KEY}"));
        assert!(!raw.contains("sk-resolved-secret"));
        assert!(raw.contains("last_used_model = \"mock-model\""));

        std::env::remove_var("FIGCOPY_RUN_KEY");
    }

    #[tokio::test]
    async fn test_load_persists_last_used_model() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = temp_settings_path(&dir);
        let p = pipeline(
            MockStorage::new(),
            Operation::GenerateJson,
            vec![text("Sign in")],
            "{}",
            settings_path.clone(),
        );

        let data = p.extract().await.unwrap();
        let output = p.transform(data).await.unwrap();
        p.load(output).await.unwrap();

        let reloaded = Settings::load(&settings_path).unwrap();
        assert_eq!(reloaded.last_used_model.as_deref(), Some("mock-model"));
    }
}
