pub mod dividend_pipeline;
pub mod holdings_pipeline;

use crate::core::normalizer::{normalize_sheet, DateColumn};
use crate::core::aggregator::aggregate;
use crate::domain::model::{RawSheet, SheetReport, SkippedSheet};

/// Normalize + aggregate one sheet; a missing required column skips the sheet.
pub(crate) fn process_sheet(
    sheet: &RawSheet,
    dates: DateColumn,
) -> Result<SheetReport, SkippedSheet> {
    match normalize_sheet(sheet, dates) {
        Ok(normalized) => {
            let summaries = aggregate(&normalized.records);
            Ok(SheetReport {
                sheet: normalized,
                summaries,
            })
        }
        Err(err) => {
            tracing::warn!("❌ Skipping sheet '{}': {}", sheet.name, err);
            Err(SkippedSheet {
                name: sheet.name.clone(),
                reason: err.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> RawSheet {
        let rows = [
            vec!["ATIVO", "QUANTIDADE", "VALOR UNIT", "DATA"],
            vec!["HGRE11", "10", "10,50", "sem data"],
        ];
        RawSheet::new(
            "HGRE11",
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_date_warnings_follow_date_column_mode() {
        let parsed = process_sheet(&sheet(), DateColumn::Parse).unwrap();
        assert_eq!(parsed.sheet.warnings.len(), 1);

        let ignored = process_sheet(&sheet(), DateColumn::Ignore).unwrap();
        assert!(ignored.sheet.warnings.is_empty());
        assert_eq!(ignored.summaries[0].total_quantity, 10);
    }

    #[test]
    fn test_missing_column_skips_sheet() {
        let raw = RawSheet::new("Notas", vec![vec!["COMENTÁRIO".to_string()]]);
        let skipped = process_sheet(&raw, DateColumn::Parse).unwrap_err();
        assert_eq!(skipped.name, "Notas");
        assert!(skipped.reason.contains("ATIVO"));
    }
}
