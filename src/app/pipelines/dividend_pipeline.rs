use crate::core::dividend::DividendEstimator;
use crate::core::normalizer::DateColumn;
use crate::core::reporter::render_dividends;
use crate::core::{ChartRenderer, ConfigProvider, Pipeline, RawSheet, SheetSource, Storage};
use crate::domain::model::{DividendReport, GoalChart, OutputFormat, YieldTable};
use crate::utils::error::{ReportError, Result};

/// 股息預估：依固定殖利率表估算每月股息並輸出目標進度圖
pub struct DividendPipeline<Src, S, R, C>
where
    Src: SheetSource,
    S: Storage,
    R: ChartRenderer,
    C: ConfigProvider,
{
    source: Src,
    storage: S,
    renderer: R,
    config: C,
    yields: YieldTable,
}

impl<Src, S, R, C> DividendPipeline<Src, S, R, C>
where
    Src: SheetSource,
    S: Storage,
    R: ChartRenderer,
    C: ConfigProvider,
{
    pub fn new(source: Src, storage: S, renderer: R, config: C, yields: YieldTable) -> Self {
        Self {
            source,
            storage,
            renderer,
            config,
            yields,
        }
    }

    pub fn render(&self, report: &DividendReport) -> Result<String> {
        match self.config.output_format() {
            OutputFormat::Text => Ok(render_dividends(report)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
        }
    }

    /// Renders and stores the goal chart. Returns the file written.
    pub fn write_chart(&self, report: &DividendReport) -> Result<String> {
        let chart = GoalChart::from_report(report);
        let bytes = self.renderer.render(&chart)?;
        let path = self.config.chart_file();
        self.storage.write_file(path, &bytes)?;
        Ok(path.to_string())
    }
}

impl<Src, S, R, C> Pipeline for DividendPipeline<Src, S, R, C>
where
    Src: SheetSource,
    S: Storage,
    R: ChartRenderer,
    C: ConfigProvider,
{
    type Report = DividendReport;

    fn extract(&self) -> Result<Vec<RawSheet>> {
        tracing::info!("📁 Reading workbook: {}", self.config.input_path());
        Ok(self.source.load_sheets()?)
    }

    fn transform(&self, sheets: Vec<RawSheet>) -> Result<DividendReport> {
        let mut summaries = Vec::new();
        let mut skipped = Vec::new();

        for sheet in &sheets {
            // dates play no part in the estimate
            match super::process_sheet(sheet, DateColumn::Ignore) {
                Ok(report) => summaries.extend(report.summaries),
                Err(skip) => skipped.push(skip),
            }
        }

        if self.yields.is_empty() {
            tracing::warn!("⚠️ Yield table is empty, no dividend can be estimated");
        } else {
            tracing::debug!("Yield table holds {} tickers", self.yields.len());
        }

        let estimator = DividendEstimator::new(
            &self.yields,
            self.config.rate_scaling(),
            self.config.monthly_goal(),
        );
        let estimates = estimator.estimate_all(&summaries);
        tracing::info!(
            "💰 {} of {} assets have a dividend estimate",
            estimates.len(),
            summaries.len()
        );

        Ok(DividendReport {
            monthly_goal: self.config.monthly_goal(),
            estimates,
            skipped,
        })
    }

    fn load(&self, report: DividendReport) -> Result<String> {
        print!("{}", self.render(&report)?);

        if report.estimates.is_empty() {
            return Ok("no dividend estimates".to_string());
        }

        // 圖表失敗不影響數值報表
        match self.write_chart(&report) {
            Ok(path) => {
                tracing::info!("✅ Chart saved as '{}'", path);
                Ok(path)
            }
            Err(e @ (ReportError::Render(_) | ReportError::IoError(_))) => {
                tracing::error!("❌ Chart was not saved: {}", e);
                tracing::error!("💡 {}", e.recovery_suggestion());
                eprintln!("❌ Falha ao gerar o gráfico: {}", e);
                Ok("chart not saved".to_string())
            }
            Err(e) => Err(e),
        }
    }
}
