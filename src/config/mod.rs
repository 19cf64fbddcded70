// 命令列參數依賴 clap，只在 cli feature 下編譯
#[cfg(feature = "cli")]
mod args;
pub mod cli;
pub mod settings;

#[cfg(feature = "cli")]
pub use args::CliConfig;
