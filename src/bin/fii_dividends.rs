use clap::Parser;
use fii_report::core::ConfigProvider;
use fii_report::utils::{logger, validation::Validate};
use fii_report::{
    CliConfig, DividendPipeline, LocalStorage, PngDoughnutRenderer, ReportEngine, WorkbookReader,
    YieldTable,
};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting fii-dividends");

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };
    tracing::debug!(
        "Monthly goal {} per asset, rate scaling {:?}",
        config.monthly_goal(),
        config.rate_scaling()
    );

    let source = WorkbookReader::new(LocalStorage::new("."), config.input_path());
    let output = LocalStorage::new(config.output_dir.clone());
    let pipeline = DividendPipeline::new(
        source,
        output,
        PngDoughnutRenderer::default(),
        config,
        YieldTable::default_table(),
    );

    match ReportEngine::new(pipeline).run() {
        Ok(summary) => {
            tracing::info!("✅ Dividend report finished: {}", summary);
        }
        Err(e) => {
            tracing::error!("❌ Dividend report failed: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
