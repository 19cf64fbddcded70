use serde::{Deserialize, Serialize};

/// 單一文字節點的文案資訊
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextInfo {
    pub id: String,
    pub name: String,
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// 擷取範圍內最上層元素的摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementInfo {
    pub id: String,
    pub name: String,
    pub node_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// 文案擷取結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub elements: Vec<ElementInfo>,
    pub texts: Vec<TextInfo>,
    pub total_text_count: usize,
    /// 哪個範圍產生了這些文案 (node / page / file / snapshot)
    pub source: String,
}

/// 翻譯對照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationPair {
    pub original: String,
    pub translated: String,
}

/// 模型回應解析後的報告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyReport {
    pub page_title: String,
    pub description: String,
    pub suggestions: Vec<String>,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_json: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub pairs: Vec<TranslationPair>,
    pub raw_response: String,
}

/// 交給 load 階段的轉換輸出
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub report: CopyReport,
    pub operation: Operation,
}

/// 對模型的操作類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    /// 將原文組織成結構化 JSON
    GenerateJson,
    /// 逐行翻譯成對照格式
    Translate,
    /// 先翻譯再結構化成 JSON
    TranslateAndStructure,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GenerateJson => "generate-json",
            Operation::Translate => "translate",
            Operation::TranslateAndStructure => "translate-and-structure",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
