mod common;

use fii_report::core::Pipeline;
use fii_report::domain::model::RateScaling;
use fii_report::{
    DividendPipeline, HoldingsPipeline, LocalStorage, PngDoughnutRenderer, ReportEngine, RunConfig,
    WorkbookReader, YieldTable,
};
use tempfile::TempDir;

fn dividend_workbook() -> Vec<common::Sheet<'static>> {
    vec![
        (
            "HGRE11",
            vec![
                vec!["ATIVO", "QUANTIDADE", "VALOR UNIT"],
                vec!["HGRE11", "70", "R$ 120,00"],
                vec!["HGRE11", "30", "R$ 125,00"],
            ],
        ),
        (
            "vilg11",
            vec![
                vec!["ATIVO", "QUANTIDADE", "VALOR UNIT"],
                vec!["vilg11", "12", "R$ 90,00"],
            ],
        ),
        (
            "MXRF11",
            vec![
                vec!["ATIVO", "QUANTIDADE", "VALOR UNIT"],
                vec!["MXRF11", "500", "R$ 10,00"],
            ],
        ),
    ]
}

fn setup() -> (TempDir, RunConfig) {
    let dir = TempDir::new().unwrap();
    common::write_ods(
        &dir.path().join("Fundos_imobiliarios.ods"),
        &dividend_workbook(),
    );
    let config = RunConfig {
        output_dir: dir.path().to_str().unwrap().to_string(),
        ..RunConfig::default()
    };
    (dir, config)
}

#[test]
fn test_dividend_report_and_chart() {
    let (dir, config) = setup();
    let storage = LocalStorage::new(dir.path().to_str().unwrap());
    let pipeline = DividendPipeline::new(
        WorkbookReader::new(storage.clone(), "Fundos_imobiliarios.ods"),
        storage,
        PngDoughnutRenderer::default(),
        config,
        YieldTable::default_table(),
    );

    let report = pipeline.transform(pipeline.extract().unwrap()).unwrap();
    let assets: Vec<&str> = report.estimates.iter().map(|e| e.asset.as_str()).collect();
    assert_eq!(assets, vec!["HGRE11", "VILG11"]);

    let text = pipeline.render(&report).unwrap();
    assert!(text.contains("R$ 76.08"));
    assert!(text.contains("R$ 8.89"));
    assert!(text.contains("0.74%"));
    assert!(!text.contains("MXRF11"));

    let output = ReportEngine::new(pipeline).run().unwrap();
    assert_eq!(output, "progresso_dividendos.png");

    let png = image::open(dir.path().join("progresso_dividendos.png")).unwrap();
    assert_eq!((png.width(), png.height()), (1200, 900));
}

#[test]
fn test_no_known_assets_skips_chart() {
    let dir = TempDir::new().unwrap();
    common::write_ods(
        &dir.path().join("Fundos_imobiliarios.ods"),
        &[(
            "MXRF11",
            vec![
                vec!["ATIVO", "QUANTIDADE", "VALOR UNIT"],
                vec!["MXRF11", "500", "R$ 10,00"],
            ],
        )],
    );
    let storage = LocalStorage::new(dir.path().to_str().unwrap());
    let pipeline = DividendPipeline::new(
        WorkbookReader::new(storage.clone(), "Fundos_imobiliarios.ods"),
        storage,
        PngDoughnutRenderer::default(),
        RunConfig {
            output_dir: dir.path().to_str().unwrap().to_string(),
            ..RunConfig::default()
        },
        YieldTable::default_table(),
    );

    let report = pipeline.transform(pipeline.extract().unwrap()).unwrap();
    assert!(report.estimates.is_empty());
    assert_eq!(
        pipeline.render(&report).unwrap(),
        "No valid assets found for dividend calculation.\n"
    );

    ReportEngine::new(pipeline).run().unwrap();
    assert!(!dir.path().join("progresso_dividendos.png").exists());
}

#[test]
fn test_percent_scaling() {
    let (dir, config) = setup();
    let storage = LocalStorage::new(dir.path().to_str().unwrap());
    let pipeline = DividendPipeline::new(
        WorkbookReader::new(storage.clone(), "Fundos_imobiliarios.ods"),
        storage,
        PngDoughnutRenderer::default(),
        RunConfig {
            rate_scaling: RateScaling::Percent,
            ..config
        },
        YieldTable::default_table(),
    );

    let report = pipeline.transform(pipeline.extract().unwrap()).unwrap();
    assert!((report.total_monthly() - (100.0 * 9.13 + 12.0 * 8.89) / 1200.0).abs() < 1e-9);
}

#[test]
fn test_unknown_ticker_in_holdings_but_not_in_dividends() {
    let (dir, config) = setup();
    let storage = LocalStorage::new(dir.path().to_str().unwrap());

    let holdings = HoldingsPipeline::new(
        WorkbookReader::new(storage.clone(), "Fundos_imobiliarios.ods"),
        storage.clone(),
        config.clone(),
    );
    let holdings_report = holdings.transform(holdings.extract().unwrap()).unwrap();
    let held: Vec<(&str, u64)> = holdings_report
        .reported()
        .flat_map(|sheet| sheet.summaries.iter())
        .map(|s| (s.asset.as_str(), s.total_quantity))
        .collect();
    assert!(held.contains(&("MXRF11", 500)));

    let dividends = DividendPipeline::new(
        WorkbookReader::new(storage.clone(), "Fundos_imobiliarios.ods"),
        storage,
        PngDoughnutRenderer::default(),
        config,
        YieldTable::default_table(),
    );
    let dividend_report = dividends.transform(dividends.extract().unwrap()).unwrap();
    assert!(dividend_report.estimates.iter().all(|e| e.asset != "MXRF11"));
    assert_eq!(dividend_report.estimates.len(), 2);
    assert!(dividend_report.skipped.is_empty());
}
