use crate::domain::model::{ExtractionResult, Operation, TransformOutput};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 文案來源 (Figma REST API 或本地快照)
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn extract(&self) -> Result<ExtractionResult>;

    /// 來源描述，用於日誌
    fn describe(&self) -> String;
}

/// 聊天補全模型
#[async_trait]
pub trait ChatModel: Send + Sync + std::fmt::Debug {
    async fn chat(&self, prompt: &str) -> Result<String>;

    fn provider_name(&self) -> &str;

    fn model_name(&self) -> &str;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn operation(&self) -> Operation;
    fn project_description(&self) -> Option<&str>;
    fn target_language(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractionResult>;
    async fn transform(&self, data: ExtractionResult) -> Result<TransformOutput>;
    async fn load(&self, result: TransformOutput) -> Result<String>;
}
