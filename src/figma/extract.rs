use crate::domain::model::{ElementInfo, ExtractionResult, TextInfo};
use crate::domain::ports::TextSource;
use crate::figma::api::{FigmaClient, FigmaFile, FigmaNode};
use crate::utils::error::{FigCopyError, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// 深度優先尋找指定 ID 的節點
pub fn find_node_by_id<'a>(node: &'a FigmaNode, target_id: &str) -> Option<&'a FigmaNode> {
    if node.id == target_id {
        return Some(node);
    }

    for child in &node.children {
        if let Some(found) = find_node_by_id(child, target_id) {
            return Some(found);
        }
    }

    None
}

/// 遞迴收集節點樹中所有帶文字的節點
pub fn collect_texts(node: &FigmaNode, texts: &mut Vec<TextInfo>) {
    if node.node_type == "TEXT" {
        if let Some(characters) = &node.characters {
            if !characters.is_empty() {
                let (x, y, width, height) = node
                    .absolute_bounding_box
                    .as_ref()
                    .map(|b| (b.x, b.y, b.width, b.height))
                    .unwrap_or((0.0, 0.0, 0.0, 0.0));

                texts.push(TextInfo {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    text: characters.clone(),
                    font_size: node.style.as_ref().and_then(|s| s.font_size).unwrap_or(16.0),
                    font_family: node
                        .style
                        .as_ref()
                        .and_then(|s| s.font_family.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    x,
                    y,
                    width,
                    height,
                });
            }
        }
    }

    for child in &node.children {
        collect_texts(child, texts);
    }
}

fn element_summary(node: &FigmaNode) -> ElementInfo {
    let (x, y, width, height) = node
        .absolute_bounding_box
        .as_ref()
        .map(|b| (b.x, b.y, b.width, b.height))
        .unwrap_or((0.0, 0.0, 0.0, 0.0));

    ElementInfo {
        id: node.id.clone(),
        name: node.name.clone(),
        node_type: node.node_type.clone(),
        x,
        y,
        width,
        height,
    }
}

/// 從 Figma REST API 擷取文案
///
/// 範圍優先級：節點 > 頁面 > 整個文件
pub struct FigmaSource {
    client: FigmaClient,
    file_key: String,
    node_id: Option<String>,
    page_id: Option<String>,
}

impl FigmaSource {
    pub fn new(
        client: FigmaClient,
        file_key: String,
        node_id: Option<String>,
        page_id: Option<String>,
    ) -> Self {
        Self {
            client,
            file_key,
            node_id,
            page_id,
        }
    }

    fn scoped_extraction(&self, file: &FigmaFile) -> Result<ExtractionResult> {
        // 節點級別篩選
        if let Some(node_id) = &self.node_id {
            tracing::info!("🎯 Using node-level scope: {}", node_id);
            let target = find_node_by_id(&file.document, node_id).ok_or_else(|| {
                FigCopyError::ValidationError {
                    message: format!("Node not found in document: {}", node_id),
                }
            })?;
            return Ok(walk(target, format!("node: {}", node_id)));
        }

        // 頁面級別篩選，找不到時退回整個文件
        if let Some(page_id) = &self.page_id {
            if let Some(page) = file.document.children.iter().find(|c| &c.id == page_id) {
                tracing::info!("📄 Using page-level scope: {}", page.name);
                return Ok(walk(page, format!("page: {}", page.name)));
            }
            tracing::warn!("⚠️ Page {} not found, falling back to the whole document", page_id);
            return Ok(walk(&file.document, "file".to_string()));
        }

        // 預設使用第一個頁面
        if let Some(first_page) = file
            .document
            .children
            .iter()
            .find(|c| c.node_type == "CANVAS")
        {
            tracing::info!("📄 Defaulting to first page: {}", first_page.name);
            return Ok(walk(first_page, format!("page: {}", first_page.name)));
        }

        // 文件沒有頁面時走整個文件
        Ok(walk(&file.document, "file".to_string()))
    }
}

fn walk(root: &FigmaNode, source: String) -> ExtractionResult {
    let mut texts = Vec::new();
    collect_texts(root, &mut texts);

    ExtractionResult {
        elements: vec![element_summary(root)],
        total_text_count: texts.len(),
        texts,
        source,
    }
}

#[async_trait]
impl TextSource for FigmaSource {
    async fn extract(&self) -> Result<ExtractionResult> {
        tracing::info!("🔍 Fetching Figma file data...");
        let file = self.client.get_file(&self.file_key).await?;

        let result = self.scoped_extraction(&file)?;
        tracing::info!(
            "📝 Extracted {} texts from {}",
            result.total_text_count,
            result.source
        );
        Ok(result)
    }

    fn describe(&self) -> String {
        format!("figma file {}", self.file_key)
    }
}

/// 從本地快照 (匯出的節點樹 JSON) 擷取文案
///
/// 快照可以是完整的 /v1/files 回應，也可以是單一節點
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load_root(&self) -> Result<FigmaNode> {
        let content = std::fs::read_to_string(&self.path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;

        // 完整檔案回應的話取 document 節點
        let node_value = match value.get("document") {
            Some(doc) => doc.clone(),
            None => value,
        };

        let node: FigmaNode = serde_json::from_value(node_value)?;
        Ok(node)
    }
}

#[async_trait]
impl TextSource for SnapshotSource {
    async fn extract(&self) -> Result<ExtractionResult> {
        tracing::info!("📂 Reading document snapshot: {}", self.path.display());
        let root = self.load_root()?;

        let result = walk(&root, "snapshot".to_string());
        tracing::info!("📝 Extracted {} texts from snapshot", result.total_text_count);
        Ok(result)
    }

    fn describe(&self) -> String {
        format!("snapshot {}", self.path.display())
    }
}
