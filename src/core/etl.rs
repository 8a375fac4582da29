use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self) -> Result<String> {
        tracing::info!("📥 Loading sheets...");
        let sheets = self.pipeline.extract()?;
        tracing::info!("Loaded {} sheets", sheets.len());

        tracing::info!("🔄 Normalizing and aggregating...");
        let report = self.pipeline.transform(sheets)?;

        tracing::info!("📤 Writing report...");
        let summary = self.pipeline.load(report)?;
        tracing::debug!("Load step finished: {}", summary);

        Ok(summary)
    }
}
