use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// 擷取 → 轉換 → 載入 的執行引擎
pub struct CopyEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> CopyEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting copy pipeline...");
        self.monitor.log_stats("Start");

        let extraction = self.pipeline.extract().await?;
        tracing::info!("Extracted {} texts", extraction.total_text_count);
        self.monitor.log_stats("Extract");

        let output = self.pipeline.transform(extraction).await?;
        tracing::info!("Model response parsed: {}", output.report.description);
        self.monitor.log_stats("Transform");

        let output_path = self.pipeline.load(output).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
