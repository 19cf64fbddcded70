pub mod engine;
pub mod parser;
pub mod pipeline;

pub use crate::domain::model::{CopyReport, ExtractionResult, Operation, TextInfo, TransformOutput};
pub use crate::domain::ports::{ChatModel, ConfigProvider, Pipeline, Storage, TextSource};
pub use crate::utils::error::Result;
