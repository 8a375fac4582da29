use crate::core::normalizer::DateColumn;
use crate::core::reporter::render_holdings;
use crate::core::{ConfigProvider, Pipeline, RawSheet, SheetSource, Storage};
use crate::domain::model::{HoldingsReport, OutputFormat, SheetSection};
use crate::utils::error::{ReportError, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    sheet: &'a str,
    asset: &'a str,
    total_quantity: u64,
    total_invested: String,
    average_price: Option<String>,
}

/// 持倉摘要：每個工作表的資料型別、各資產彙總與完整清單
pub struct HoldingsPipeline<Src: SheetSource, S: Storage, C: ConfigProvider> {
    source: Src,
    storage: S,
    config: C,
}

impl<Src: SheetSource, S: Storage, C: ConfigProvider> HoldingsPipeline<Src, S, C> {
    pub fn new(source: Src, storage: S, config: C) -> Self {
        Self {
            source,
            storage,
            config,
        }
    }

    pub fn render(&self, report: &HoldingsReport) -> Result<String> {
        match self.config.output_format() {
            OutputFormat::Text => Ok(render_holdings(report)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
        }
    }

    pub fn summary_csv(&self, report: &HoldingsReport) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for sheet in report.reported() {
            for summary in &sheet.summaries {
                writer.serialize(SummaryRow {
                    sheet: &sheet.sheet.name,
                    asset: &summary.asset,
                    total_quantity: summary.total_quantity,
                    total_invested: format!("{:.2}", summary.total_invested),
                    average_price: summary.average_price.map(|p| format!("{:.2}", p)),
                })?;
            }
        }
        writer
            .into_inner()
            .map_err(|e| ReportError::IoError(e.into_error()))
    }
}

impl<Src: SheetSource, S: Storage, C: ConfigProvider> Pipeline for HoldingsPipeline<Src, S, C> {
    type Report = HoldingsReport;

    fn extract(&self) -> Result<Vec<RawSheet>> {
        tracing::info!("📁 Reading workbook: {}", self.config.input_path());
        Ok(self.source.load_sheets()?)
    }

    fn transform(&self, sheets: Vec<RawSheet>) -> Result<HoldingsReport> {
        let sheet_names = sheets.iter().map(|s| s.name.clone()).collect();
        let sections = sheets
            .iter()
            .map(|sheet| match super::process_sheet(sheet, DateColumn::Parse) {
                Ok(report) => SheetSection::Reported(report),
                Err(skipped) => SheetSection::Skipped(skipped),
            })
            .collect();

        Ok(HoldingsReport {
            sheet_names,
            sections,
        })
    }

    fn load(&self, report: HoldingsReport) -> Result<String> {
        print!("{}", self.render(&report)?);

        if let Some(path) = self.config.export_csv() {
            let data = self.summary_csv(&report)?;
            self.storage.write_file(path, &data)?;
            tracing::info!("📁 Summary exported to: {}", path);
            return Ok(path.to_string());
        }

        Ok(format!("{} sheets reported", report.reported().count()))
    }
}
