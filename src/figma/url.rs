use regex::Regex;

/// 從 Figma URL 中取出檔案 key
///
/// 支援的格式:
/// - https://www.figma.com/file/{key}/{name}
/// - https://www.figma.com/design/{key}/{name}
/// - 無 www 的版本，以及帶查詢參數的版本
pub fn extract_file_key(url: &str) -> Option<String> {
    let patterns = [
        r"(?:www\.)?figma\.com/(?:file|design)/([a-zA-Z0-9_-]+)",
        // 備用模式：更寬鬆的匹配
        r"figma\.com/[^/]+/([a-zA-Z0-9_-]+)",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid figma url pattern");
        if let Some(caps) = re.captures(url) {
            if let Some(m) = caps.get(1) {
                tracing::debug!("✅ Extracted file key: {}", m.as_str());
                return Some(m.as_str().to_string());
            }
        }
    }

    tracing::warn!("❌ Could not extract a file key from URL: {}", url);
    None
}

/// 從 URL 的 node-id 查詢參數取出節點 ID
///
/// Figma 用 `123-456` 或 URL 編碼的 `123%3A456` 表示 `123:456`
pub fn extract_node_id(url: &str) -> Option<String> {
    let re = Regex::new(r"[?&]node-id=([^&]+)").expect("valid node-id pattern");
    let raw = re.captures(url)?.get(1)?.as_str();

    let decoded = raw.replace("%3A", ":").replace("%3a", ":");
    let node_id = decoded.replacen('-', ":", 1);

    tracing::debug!("✅ Extracted node id: {}", node_id);
    Some(node_id)
}
