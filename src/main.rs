use clap::Parser;
use fii_report::core::ConfigProvider;
use fii_report::utils::{logger, validation::Validate};
use fii_report::{CliConfig, HoldingsPipeline, LocalStorage, ReportEngine, WorkbookReader};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting fii-report");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 合併並驗證配置
    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    let source = WorkbookReader::new(LocalStorage::new("."), config.input_path());
    let output = LocalStorage::new(config.output_dir.clone());
    let pipeline = HoldingsPipeline::new(source, output, config);

    match ReportEngine::new(pipeline).run() {
        Ok(summary) => {
            tracing::info!("✅ Report finished: {}", summary);
        }
        Err(e) => {
            tracing::error!("❌ Report failed: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
