pub mod config;
pub mod core;
pub mod domain;
pub mod figma;
pub mod llm;
pub mod prompts;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, settings::Settings};

pub use crate::core::{engine::CopyEngine, pipeline::CopyPipeline};
pub use llm::Provider;
pub use utils::error::{FigCopyError, Result};
