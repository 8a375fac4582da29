use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const COL_ASSET: &str = "ATIVO";
pub const COL_QUANTITY: &str = "QUANTIDADE";
pub const COL_UNIT_VALUE: &str = "VALOR UNIT";
pub const COL_DATE: &str = "DATA";

/// 一列原始儲存格文字
pub type RawRow = Vec<String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<RawRow>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// 1-based row number in the source sheet, header included
    pub row: usize,
    pub asset: String,
    pub quantity: u64,
    pub unit_value: Option<f64>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Integer,
    Decimal,
    Date,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Decimal => "decimal",
            ColumnType::Date => "date",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoercionWarning {
    pub row: usize,
    pub column: String,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSheet {
    pub name: String,
    /// (column, semantic type) in header order
    pub columns: Vec<(String, ColumnType)>,
    pub records: Vec<Record>,
    pub warnings: Vec<CoercionWarning>,
    pub dropped_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSummary {
    pub asset: String,
    pub total_quantity: u64,
    pub total_invested: f64,
    pub average_price: Option<f64>,
    pub record_count: usize,
    pub priced_count: usize,
}

/// Annual dividend yield (percent) per uppercase ticker. Built once, read-only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct YieldTable {
    entries: BTreeMap<String, f64>,
}

impl YieldTable {
    pub fn new<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(ticker, pct)| (ticker.as_ref().trim().to_uppercase(), pct))
                .collect(),
        }
    }

    pub fn default_table() -> Self {
        Self::new([
            ("HGRE11", 9.13),
            ("HGBS11", 9.86),
            ("VILG11", 8.89),
            ("HGRU11", 9.53),
        ])
    }

    pub fn annual_yield(&self, asset: &str) -> Option<f64> {
        self.entries.get(&asset.trim().to_uppercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendEstimate {
    pub asset: String,
    pub total_quantity: u64,
    pub annual_yield_pct: f64,
    pub monthly_rate: f64,
    pub monthly_dividend: f64,
    pub goal_progress_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetReport {
    pub sheet: NormalizedSheet,
    pub summaries: Vec<AssetSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSheet {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SheetSection {
    Reported(SheetReport),
    Skipped(SkippedSheet),
}

/// 持倉報表，工作表依文件順序
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HoldingsReport {
    pub sheet_names: Vec<String>,
    pub sections: Vec<SheetSection>,
}

impl HoldingsReport {
    pub fn reported(&self) -> impl Iterator<Item = &SheetReport> {
        self.sections.iter().filter_map(|section| match section {
            SheetSection::Reported(report) => Some(report),
            SheetSection::Skipped(_) => None,
        })
    }
}

/// 股息預估報表
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DividendReport {
    pub monthly_goal: f64,
    pub estimates: Vec<DividendEstimate>,
    pub skipped: Vec<SkippedSheet>,
}

impl DividendReport {
    pub fn total_monthly(&self) -> f64 {
        self.estimates.iter().map(|e| e.monthly_dividend).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub label: String,
    pub value: f64,
}

/// Proportion chart of monthly dividends against a per-asset goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalChart {
    pub title: String,
    pub goal: f64,
    pub slices: Vec<ChartSlice>,
}

impl GoalChart {
    pub fn from_report(report: &DividendReport) -> Self {
        Self {
            title: "Progresso em Relação à Meta de Dividendos Mensais".to_string(),
            goal: report.monthly_goal,
            slices: report
                .estimates
                .iter()
                .map(|e| ChartSlice {
                    label: e.asset.clone(),
                    value: e.monthly_dividend,
                })
                .collect(),
        }
    }

    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }
}

/// How the annual yield percentage turns into a per-quota monthly amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RateScaling {
    /// `quantity × annual / 12`
    #[default]
    AsRecorded,
    /// `quantity × annual / 12 / 100`
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
