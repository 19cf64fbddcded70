use clap::Parser;
use figcopy::config::settings::Settings;
use figcopy::domain::ports::TextSource;
use figcopy::figma::api::FigmaClient;
use figcopy::figma::extract::{FigmaSource, SnapshotSource};
use figcopy::figma::url as figma_url;
use figcopy::llm::ollama::OllamaClient;
use figcopy::llm::{build_model, ChatOptions};
use figcopy::utils::error::{FigCopyError, Result};
use figcopy::utils::{logger, validation::Validate};
use figcopy::{CliConfig, CopyEngine, CopyPipeline, LocalStorage};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting figcopy CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let settings = match Settings::load(&config.settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Failed to load settings: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 輔助命令不走管道
    if config.is_auxiliary() {
        let result = run_auxiliary(&config, &settings).await;
        if let Err(e) = result {
            tracing::error!("❌ {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
        return Ok(());
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    match run_pipeline(config, settings, monitor_enabled).await {
        Ok(output_path) => {
            tracing::info!("✅ Copy pipeline completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Copy pipeline completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Copy pipeline failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                figcopy::utils::error::ErrorSeverity::Low => 0,
                figcopy::utils::error::ErrorSeverity::Medium => 2,
                figcopy::utils::error::ErrorSeverity::High => 1,
                figcopy::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

/// 處理 --list-models 與 --check-token
async fn run_auxiliary(config: &CliConfig, settings: &Settings) -> Result<()> {
    if config.list_models {
        let client = OllamaClient::new(
            settings.ollama_endpoint.clone(),
            ChatOptions::new(settings.ollama_model.clone().unwrap_or_default()),
        );
        let models = client.list_models().await?;

        if models.is_empty() {
            println!("No local Ollama models found, install one first");
        } else {
            println!("Local Ollama models:");
            for model in models {
                println!("  {} ({} MB)", model.name, model.size / 1024 / 1024);
            }
        }
        return Ok(());
    }

    if config.check_token {
        let token = settings
            .figma_api_token
            .clone()
            .ok_or_else(|| FigCopyError::MissingConfigError {
                field: "figma_api_token".to_string(),
            })?;
        let client = FigmaClient::new(token);

        if client.validate_token().await? {
            println!("✅ Figma API token is valid");
        } else {
            println!("❌ Figma API token was rejected");
        }
    }

    Ok(())
}

async fn run_pipeline(
    config: CliConfig,
    settings: Settings,
    monitor_enabled: bool,
) -> Result<String> {
    let source = build_source(&config, &settings)?;
    let model = build_model(config.provider, &settings, config.model.as_deref())?;

    let storage = LocalStorage::new(config.output_path.clone());
    let settings_path = config.settings_path.clone();
    let pipeline = CopyPipeline::new(storage, config, source, model, settings, settings_path);

    let engine = CopyEngine::new_with_monitoring(pipeline, monitor_enabled);
    engine.run().await
}

/// 決定文案來源：本地快照優先，否則 Figma REST API
fn build_source(config: &CliConfig, settings: &Settings) -> Result<Box<dyn TextSource>> {
    if let Some(snapshot) = &config.snapshot {
        return Ok(Box::new(SnapshotSource::new(snapshot.clone())));
    }

    let file_key = config
        .file_key
        .clone()
        .or_else(|| {
            config
                .figma_url
                .as_deref()
                .and_then(figma_url::extract_file_key)
        })
        .ok_or_else(|| FigCopyError::ValidationError {
            message: "Could not determine a Figma file key from the URL".to_string(),
        })?;

    // 節點 ID：命令列優先，否則從 URL 解析
    let node_id = config.node_id.clone().or_else(|| {
        config
            .figma_url
            .as_deref()
            .and_then(figma_url::extract_node_id)
    });

    let token = settings
        .figma_api_token
        .clone()
        .ok_or_else(|| FigCopyError::MissingConfigError {
            field: "figma_api_token".to_string(),
        })?;

    let client = FigmaClient::new(token);
    Ok(Box::new(FigmaSource::new(
        client,
        file_key,
        node_id,
        config.page_id.clone(),
    )))
}
