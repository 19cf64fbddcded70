use crate::utils::error::{FigCopyError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const FIGMA_API_BASE: &str = "https://api.figma.com";

/// Figma 文件節點 (REST API 回傳的樹)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigmaNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FigmaNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<FigmaTypeStyle>,
    #[serde(
        rename = "absoluteBoundingBox",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub absolute_bounding_box: Option<FigmaBoundingBox>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigmaTypeStyle {
    #[serde(rename = "fontFamily", default)]
    pub font_family: Option<String>,
    #[serde(rename = "fontSize", default)]
    pub font_size: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigmaBoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// GET /v1/files/{key} 回應
#[derive(Debug, Clone, Deserialize)]
pub struct FigmaFile {
    pub document: FigmaNode,
    pub name: String,
    #[serde(rename = "lastModified", default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// 文件頁面摘要 (document 下 type == CANVAS 的子節點)
#[derive(Debug, Clone)]
pub struct FigmaPage {
    pub id: String,
    pub name: String,
}

/// Figma REST API 客戶端，X-Figma-Token 認證
#[derive(Debug, Clone)]
pub struct FigmaClient {
    client: Client,
    api_token: String,
    base_url: String,
}

impl FigmaClient {
    pub fn new(api_token: String) -> Self {
        Self::with_base_url(api_token, FIGMA_API_BASE.to_string())
    }

    /// 測試時指向 mock server
    pub fn with_base_url(api_token: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn get_file(&self, file_key: &str) -> Result<FigmaFile> {
        let url = format!("{}/v1/files/{}", self.base_url, file_key);
        tracing::debug!("📡 Fetching Figma file: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Figma-Token", &self.api_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FigCopyError::ApiStatusError {
                provider: "Figma".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let file: FigmaFile = response.json().await?;
        tracing::info!(
            "📁 Fetched file '{}' (version {})",
            file.name,
            file.version.as_deref().unwrap_or("unknown")
        );
        Ok(file)
    }

    /// 取得文件的頁面列表
    pub async fn get_file_pages(&self, file_key: &str) -> Result<Vec<FigmaPage>> {
        let file = self.get_file(file_key).await?;
        let pages = file
            .document
            .children
            .iter()
            .filter(|child| child.node_type == "CANVAS")
            .map(|page| FigmaPage {
                id: page.id.clone(),
                name: page.name.clone(),
            })
            .collect::<Vec<_>>();

        tracing::debug!("📄 File has {} pages", pages.len());
        Ok(pages)
    }

    /// 驗證 API token 是否有效 (GET /v1/me)
    pub async fn validate_token(&self) -> Result<bool> {
        let url = format!("{}/v1/me", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("X-Figma-Token", &self.api_token)
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}
