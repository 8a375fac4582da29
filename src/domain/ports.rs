use crate::domain::model::{GoalChart, OutputFormat, RateScaling, RawSheet};
use crate::utils::error::{LoadError, RenderError, Result};

pub trait Storage {
    fn read_file(&self, path: &str) -> std::io::Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> std::io::Result<()>;
}

pub trait ConfigProvider {
    fn input_path(&self) -> &str;
    fn chart_file(&self) -> &str;
    fn export_csv(&self) -> Option<&str>;
    fn output_format(&self) -> OutputFormat;
    fn monthly_goal(&self) -> f64;
    fn rate_scaling(&self) -> RateScaling;
}

/// Spreadsheet access: every sheet as rows of raw cell text, in document order.
pub trait SheetSource {
    fn load_sheets(&self) -> std::result::Result<Vec<RawSheet>, LoadError>;
}

/// Turns a goal chart into encoded image bytes.
pub trait ChartRenderer {
    fn render(&self, chart: &GoalChart) -> std::result::Result<Vec<u8>, RenderError>;
}

pub trait Pipeline {
    type Report;

    fn extract(&self) -> Result<Vec<RawSheet>>;
    fn transform(&self, sheets: Vec<RawSheet>) -> Result<Self::Report>;
    fn load(&self, report: Self::Report) -> Result<String>;
}
