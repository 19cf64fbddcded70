//! 模型回應的容錯解析
//!
//! 分層恢復：去除 markdown 圍欄 → 直接解析 JSON → 正則提取大括號區段 → 合成佔位物件

use crate::domain::model::TranslationPair;
use regex::Regex;
use serde_json::Value;

/// 原始回應截斷長度，保留在佔位物件裡供人工檢查
const RAW_RESPONSE_PREVIEW_CHARS: usize = 500;

/// 結構化解析結果
#[derive(Debug, Clone)]
pub struct StructuredParse {
    pub value: Value,
    /// 所有解析層都失敗、退化成佔位物件時為 true
    pub degraded: bool,
}

/// 去除回應開頭的 ```json / ``` 圍欄與結尾圍欄
pub fn strip_markdown_fences(raw: &str) -> String {
    let trimmed = raw.trim();

    let without_open = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed.to_string();
    };

    without_open
        .trim_start()
        .trim_end()
        .trim_end_matches("```")
        .trim_end()
        .to_string()
}

/// 從文字中提取第一個 `{` 到最後一個 `}` 的區段
pub fn extract_json_span(text: &str) -> Option<&str> {
    // 與原始實現相同的貪婪匹配
    let re = Regex::new(r"(?s)\{.*\}").expect("valid json span pattern");
    re.find(text).map(|m| m.as_str())
}

/// UTF-8 安全截斷
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

fn placeholder(raw: &str, title: &str, error: &str) -> Value {
    serde_json::json!({
        "__page_title": title,
        "error": error,
        "raw_response": truncate_chars(raw, RAW_RESPONSE_PREVIEW_CHARS),
    })
}

/// 分層解析結構化 JSON 回應
///
/// `placeholder_title` 是退化成佔位物件時的 __page_title
pub fn parse_structured(raw: &str, placeholder_title: &str) -> StructuredParse {
    let cleaned = strip_markdown_fences(raw);

    if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
        return StructuredParse {
            value,
            degraded: false,
        };
    }

    tracing::warn!("⚠️ Model output is not valid JSON, trying brace-span recovery");

    if let Some(span) = extract_json_span(&cleaned) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            return StructuredParse {
                value,
                degraded: false,
            };
        }
        tracing::warn!("⚠️ Extracted brace span still failed to parse");
        return StructuredParse {
            value: placeholder(raw, placeholder_title, "AI生成的JSON格式有误，请重试"),
            degraded: true,
        };
    }

    tracing::warn!("⚠️ No brace-delimited span found in model output");
    StructuredParse {
        value: placeholder(raw, placeholder_title, "未找到有效的JSON格式"),
        degraded: true,
    }
}

/// 從解析結果取出頁面標題 (__page_title 或 page_title)
pub fn page_title_of(value: &Value, default: &str) -> String {
    value
        .get("__page_title")
        .or_else(|| value.get("page_title"))
        .and_then(|v| v.as_str())
        .unwrap_or(default)
        .to_string()
}

/// 解析「原文：譯文」對照行
///
/// 中文全形冒號優先，其次 ASCII 冒號；若整份輸出一對都解析不出，
/// 退化成逐行處理，每行視為譯文
pub fn parse_translation_pairs(raw: &str) -> Vec<TranslationPair> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut pairs = Vec::new();
    for line in &lines {
        let colon_index = line.find('：').or_else(|| line.find(':'));
        if let Some(idx) = colon_index {
            let sep_len = if line[idx..].starts_with('：') {
                '：'.len_utf8()
            } else {
                1
            };
            let original = line[..idx].trim();
            let translated = line[idx + sep_len..].trim();
            if !original.is_empty() && !translated.is_empty() {
                pairs.push(TranslationPair {
                    original: original.to_string(),
                    translated: translated.to_string(),
                });
            }
        }
    }

    if pairs.is_empty() {
        tracing::warn!("⚠️ No pairs parsed from translation output, keeping raw lines");
        for line in lines {
            pairs.push(TranslationPair {
                original: "原文".to_string(),
                translated: line.to_string(),
            });
        }
    }

    pairs
}

/// 結構化輸出過大時提示模型可能編造了額外內容
pub fn size_warning(value: &Value, threshold: usize) -> Option<String> {
    let serialized = value.to_string();
    if serialized.len() > threshold {
        Some("⚠️ 检测到生成的JSON较大，请确认是否包含额外内容".to_string())
    } else {
        None
    }
}
