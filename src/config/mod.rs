pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::{OutputFormat, RateScaling};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_path, validate_positive_amount, Validate,
};
use clap::Parser;
use toml_config::TomlConfig;

pub const DEFAULT_INPUT: &str = "Fundos_imobiliarios.ods";
pub const DEFAULT_CHART_FILE: &str = "progresso_dividendos.png";
pub const DEFAULT_MONTHLY_GOAL: f64 = 25.0;

#[derive(Debug, Clone, Parser)]
#[command(name = "fii-report")]
#[command(about = "Real-estate fund holdings and dividend report from a spreadsheet")]
pub struct CliConfig {
    /// Workbook to read (.ods or .csv)
    pub input: Option<String>,

    /// Optional TOML file with a [report] section
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, default_value = ".")]
    pub output_dir: String,

    /// Chart image file, relative to --output-dir
    #[arg(long)]
    pub chart: Option<String>,

    /// Write the per-asset summary as CSV, relative to --output-dir
    #[arg(long)]
    pub export_csv: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Merges command line, TOML file and defaults, in that order of precedence.
    pub fn resolve(&self) -> Result<RunConfig> {
        let file = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        let report = file.report;

        Ok(RunConfig {
            input: self
                .input
                .clone()
                .or(report.input)
                .unwrap_or_else(|| DEFAULT_INPUT.to_string()),
            output_dir: self.output_dir.clone(),
            chart_file: self
                .chart
                .clone()
                .or(report.chart_file)
                .unwrap_or_else(|| DEFAULT_CHART_FILE.to_string()),
            export_csv: self.export_csv.clone().or(report.export_csv),
            format: self.format.or(report.format).unwrap_or_default(),
            monthly_goal: report.monthly_goal.unwrap_or(DEFAULT_MONTHLY_GOAL),
            rate_scaling: report.rate_scaling.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input: String,
    pub output_dir: String,
    pub chart_file: String,
    pub export_csv: Option<String>,
    pub format: OutputFormat,
    pub monthly_goal: f64,
    pub rate_scaling: RateScaling,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: DEFAULT_INPUT.to_string(),
            output_dir: ".".to_string(),
            chart_file: DEFAULT_CHART_FILE.to_string(),
            export_csv: None,
            format: OutputFormat::Text,
            monthly_goal: DEFAULT_MONTHLY_GOAL,
            rate_scaling: RateScaling::AsRecorded,
        }
    }
}

impl ConfigProvider for RunConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn chart_file(&self) -> &str {
        &self.chart_file
    }

    fn export_csv(&self) -> Option<&str> {
        self.export_csv.as_deref()
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }

    fn monthly_goal(&self) -> f64 {
        self.monthly_goal
    }

    fn rate_scaling(&self) -> RateScaling {
        self.rate_scaling
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_file_extension("input", &self.input, &["ods", "csv"])?;
        validate_path("output_dir", &self.output_dir)?;
        validate_path("chart_file", &self.chart_file)?;
        validate_file_extension("chart_file", &self.chart_file, &["png"])?;
        if let Some(export) = &self.export_csv {
            validate_path("export_csv", export)?;
            validate_file_extension("export_csv", export, &["csv"])?;
        }
        validate_positive_amount("monthly_goal", self.monthly_goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let cli = CliConfig::parse_from(["fii-report"]);
        let config = cli.resolve().unwrap();
        assert_eq!(config, RunConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            b"[report]\ninput = \"outra.ods\"\nchart_file = \"toml.png\"\nmonthly_goal = 40.0\nrate_scaling = \"percent\"\n",
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "fii-report",
            "carteira.csv",
            "--config",
            file.path().to_str().unwrap(),
            "--format",
            "json",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.input, "carteira.csv");
        assert_eq!(config.chart_file, "toml.png");
        assert_eq!(config.monthly_goal, 40.0);
        assert_eq!(config.rate_scaling, RateScaling::Percent);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = RunConfig {
            input: "carteira.xlsx".to_string(),
            ..RunConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RunConfig {
            chart_file: "grafico.jpg".to_string(),
            ..RunConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RunConfig {
            monthly_goal: 0.0,
            ..RunConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
