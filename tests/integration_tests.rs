use figcopy::config::settings::Settings;
use figcopy::domain::model::Operation;
use figcopy::figma::api::FigmaClient;
use figcopy::figma::extract::FigmaSource;
use figcopy::llm::deepseek::DeepSeekClient;
use figcopy::llm::{ChatOptions, Provider};
use figcopy::utils::error::FigCopyError;
use figcopy::{CliConfig, CopyEngine, CopyPipeline, LocalStorage};
use httpmock::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn figma_file_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Landing",
        "lastModified": "2026-08-01T00:00:00Z",
        "version": "7",
        "document": {
            "id": "0:0",
            "name": "Document",
            "type": "DOCUMENT",
            "children": [{
                "id": "1:0",
                "name": "Page 1",
                "type": "CANVAS",
                "children": [
                    {
                        "id": "1:1",
                        "name": "headline",
                        "type": "TEXT",
                        "characters": "Improve your front-end skills",
                        "style": {"fontFamily": "Inter", "fontSize": 32.0}
                    },
                    {
                        "id": "1:2",
                        "name": "cta",
                        "type": "TEXT",
                        "characters": "Get started"
                    }
                ]
            }]
        }
    })
}

fn cli_config(operation: Operation, output_path: &str, settings_path: PathBuf) -> CliConfig {
    CliConfig {
        figma_url: None,
        file_key: Some("abc123".to_string()),
        node_id: None,
        page_id: None,
        snapshot: None,
        provider: Provider::Deepseek,
        operation,
        model: None,
        target_language: "zh".to_string(),
        project_description: Some("登录页面".to_string()),
        settings_path,
        output_path: output_path.to_string(),
        list_models: false,
        check_token: false,
        verbose: false,
        monitor: false,
    }
}

#[tokio::test]
async fn test_end_to_end_generate_json() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let settings_path = temp_dir.path().join("figcopy.toml");

    let figma_server = MockServer::start();
    let figma_mock = figma_server.mock(|when, then| {
        when.method(GET)
            .path("/v1/files/abc123")
            .header("X-Figma-Token", "fig-token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(figma_file_body());
    });

    let llm_server = MockServer::start();
    let llm_mock = llm_server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(serde_json::json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": "```json\n{\"__page_title\": \"Landing\", \"headline\": \"Improve your front-end skills\", \"btn_start\": \"Get started\"}\n```"
            }}]
        }));
    });

    let source = FigmaSource::new(
        FigmaClient::with_base_url("fig-token".to_string(), figma_server.base_url()),
        "abc123".to_string(),
        None,
        None,
    );
    let model = DeepSeekClient::with_base_url(
        "sk-test".to_string(),
        ChatOptions::new("deepseek-chat"),
        llm_server.base_url(),
    );

    let config = cli_config(Operation::GenerateJson, &output_path, settings_path.clone());
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = CopyPipeline::new(
        storage,
        config,
        Box::new(source),
        Box::new(model),
        Settings::default(),
        settings_path.clone(),
    );

    let engine = CopyEngine::new(pipeline);
    let result = engine.run().await;

    assert!(result.is_ok());
    figma_mock.assert();
    llm_mock.assert();

    // 結構化 JSON 已寫出，圍欄已剝除
    let structure_path = temp_dir.path().join("copy_structure.json");
    let structure: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&structure_path)?)?;
    assert_eq!(structure["__page_title"], "Landing");
    assert_eq!(structure["btn_start"], "Get started");

    // 完整報告
    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join("report.json"))?)?;
    assert_eq!(report["page_title"], "Landing");
    assert!(report["raw_response"].as_str().unwrap().contains("```json"));

    // last_used_model 已回寫
    let settings = Settings::load(&settings_path)?;
    assert_eq!(settings.last_used_model.as_deref(), Some("deepseek-chat"));

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_translate_writes_pairs() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let settings_path = temp_dir.path().join("figcopy.toml");

    let figma_server = MockServer::start();
    figma_server.mock(|when, then| {
        when.method(GET).path("/v1/files/abc123");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(figma_file_body());
    });

    let llm_server = MockServer::start();
    llm_server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(serde_json::json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": "Improve your front-end skills：提升您的前端技能\nGet started：开始使用"
            }}]
        }));
    });

    let source = FigmaSource::new(
        FigmaClient::with_base_url("fig-token".to_string(), figma_server.base_url()),
        "abc123".to_string(),
        None,
        None,
    );
    let model = DeepSeekClient::with_base_url(
        "sk-test".to_string(),
        ChatOptions::new("deepseek-chat"),
        llm_server.base_url(),
    );

    let config = cli_config(Operation::Translate, &output_path, settings_path.clone());
    let pipeline = CopyPipeline::new(
        LocalStorage::new(output_path.clone()),
        config,
        Box::new(source),
        Box::new(model),
        Settings::default(),
        settings_path,
    );

    CopyEngine::new(pipeline).run().await?;

    let translations = std::fs::read_to_string(temp_dir.path().join("translations.txt"))?;
    let lines: Vec<&str> = translations.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Improve your front-end skills：提升您的前端技能");
    assert_eq!(lines[1], "Get started：开始使用");

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_provider_failure_surfaces_error() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let settings_path = temp_dir.path().join("figcopy.toml");

    let figma_server = MockServer::start();
    figma_server.mock(|when, then| {
        when.method(GET).path("/v1/files/abc123");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(figma_file_body());
    });

    let llm_server = MockServer::start();
    let llm_mock = llm_server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(500).body("upstream exploded");
    });

    let source = FigmaSource::new(
        FigmaClient::with_base_url("fig-token".to_string(), figma_server.base_url()),
        "abc123".to_string(),
        None,
        None,
    );
    let model = DeepSeekClient::with_base_url(
        "sk-test".to_string(),
        ChatOptions::new("deepseek-chat"),
        llm_server.base_url(),
    );

    let config = cli_config(Operation::GenerateJson, &output_path, settings_path.clone());
    let pipeline = CopyPipeline::new(
        LocalStorage::new(output_path.clone()),
        config,
        Box::new(source),
        Box::new(model),
        Settings::default(),
        settings_path,
    );

    let err = CopyEngine::new(pipeline).run().await.unwrap_err();
    llm_mock.assert();

    match err {
        FigCopyError::ApiStatusError {
            provider, status, ..
        } => {
            assert_eq!(provider, "DeepSeek");
            assert_eq!(status, 500);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // 失敗時不產生輸出檔
    assert!(!temp_dir.path().join("copy_structure.json").exists());
}

#[tokio::test]
async fn test_end_to_end_empty_document_refuses_model_call() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let settings_path = temp_dir.path().join("figcopy.toml");

    let figma_server = MockServer::start();
    figma_server.mock(|when, then| {
        when.method(GET).path("/v1/files/abc123");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "name": "Empty",
                "document": {
                    "id": "0:0", "name": "Document", "type": "DOCUMENT",
                    "children": [{"id": "1:0", "name": "Page 1", "type": "CANVAS", "children": []}]
                }
            }));
    });

    // 模型端不應收到任何請求
    let llm_server = MockServer::start();
    let llm_mock = llm_server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(serde_json::json!({"choices": []}));
    });

    let source = FigmaSource::new(
        FigmaClient::with_base_url("fig-token".to_string(), figma_server.base_url()),
        "abc123".to_string(),
        None,
        None,
    );
    let model = DeepSeekClient::with_base_url(
        "sk-test".to_string(),
        ChatOptions::new("deepseek-chat"),
        llm_server.base_url(),
    );

    let config = cli_config(Operation::GenerateJson, &output_path, settings_path.clone());
    let pipeline = CopyPipeline::new(
        LocalStorage::new(output_path.clone()),
        config,
        Box::new(source),
        Box::new(model),
        Settings::default(),
        settings_path,
    );

    let err = CopyEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, FigCopyError::ValidationError { .. }));
    llm_mock.assert_hits(0);
}
