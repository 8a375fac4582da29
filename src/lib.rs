pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{PngDoughnutRenderer, WorkbookReader};
pub use app::pipelines::{dividend_pipeline::DividendPipeline, holdings_pipeline::HoldingsPipeline};
pub use config::{cli::LocalStorage, CliConfig, RunConfig};
pub use core::etl::ReportEngine;
pub use domain::model::YieldTable;
pub use utils::error::{ReportError, Result};
