use crate::domain::model::{
    CoercionWarning, ColumnType, NormalizedSheet, RawSheet, Record, COL_ASSET, COL_DATE,
    COL_QUANTITY, COL_UNIT_VALUE,
};
use crate::utils::error::{CoercionError, SheetError};
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%d/%m/%y";

/// Largest quota count accepted in one cell.
pub const MAX_QUANTITY: u64 = 1_000_000_000_000;

/// Whether the `DATA` column is coerced or left out of the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateColumn {
    Parse,
    Ignore,
}

/// Header positions of the columns the report understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub asset: usize,
    pub quantity: usize,
    pub unit_value: usize,
    pub date: Option<usize>,
}

impl ColumnMapping {
    pub fn from_header(sheet: &str, header: &[String]) -> Result<Self, SheetError> {
        let find = |name: &str| header.iter().position(|cell| cell.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| SheetError::MissingColumn {
                sheet: sheet.to_string(),
                column: name.to_string(),
            })
        };

        Ok(Self {
            asset: require(COL_ASSET)?,
            quantity: require(COL_QUANTITY)?,
            unit_value: require(COL_UNIT_VALUE)?,
            date: find(COL_DATE),
        })
    }
}

/// 數量欄位：整數，失敗時由呼叫端補 0
pub fn parse_quantity(raw: &str) -> Result<u64, CoercionError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(CoercionError::Empty);
    }

    let quantity = match text.parse::<i64>() {
        Ok(value) => {
            u64::try_from(value).map_err(|_| CoercionError::Negative(text.to_string()))?
        }
        Err(_) => match text.parse::<f64>() {
            Ok(value) if value.is_finite() && value < 0.0 => {
                return Err(CoercionError::Negative(text.to_string()))
            }
            Ok(value) if value.is_finite() && value <= MAX_QUANTITY as f64 => value.trunc() as u64,
            Ok(value) if value.is_finite() => {
                return Err(CoercionError::OutOfRange(text.to_string(), MAX_QUANTITY))
            }
            _ => return Err(CoercionError::NotNumeric(text.to_string())),
        },
    };

    if quantity > MAX_QUANTITY {
        return Err(CoercionError::OutOfRange(text.to_string(), MAX_QUANTITY));
    }
    Ok(quantity)
}

/// 單價欄位："R$ 1.234,56" → 1234.56；已是乾淨小數 ("12.50") 則直接解析
pub fn parse_unit_value(raw: &str) -> Result<f64, CoercionError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(CoercionError::Empty);
    }

    if is_clean_decimal(text) {
        return text
            .parse::<f64>()
            .map_err(|_| CoercionError::NotNumeric(text.to_string()));
    }

    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Err(CoercionError::NotNumeric(text.to_string()));
    }

    cleaned
        .parse::<f64>()
        .map_err(|_| CoercionError::NotNumeric(text.to_string()))
}

fn is_clean_decimal(text: &str) -> bool {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    all_digits(int_part) && frac_part.map_or(true, all_digits)
}

/// 日期欄位 (dd/mm/yy)。空白儲存格不算錯誤
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>, CoercionError> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(Some)
        .map_err(|_| CoercionError::NotADate(text.to_string()))
}

fn column_type(name: &str) -> ColumnType {
    match name {
        COL_QUANTITY => ColumnType::Integer,
        COL_UNIT_VALUE => ColumnType::Decimal,
        COL_DATE => ColumnType::Date,
        _ => ColumnType::Text,
    }
}

/// Turns one raw sheet into typed records.
///
/// The first row is the header. Rows whose `ATIVO` cell is missing or blank are
/// dropped; every other coercion failure falls back to a default (quantity 0,
/// no unit value, no date) and is kept as a [`CoercionWarning`].
pub fn normalize_sheet(sheet: &RawSheet, dates: DateColumn) -> Result<NormalizedSheet, SheetError> {
    let mut normalized = NormalizedSheet {
        name: sheet.name.clone(),
        columns: Vec::new(),
        records: Vec::new(),
        warnings: Vec::new(),
        dropped_rows: 0,
    };

    let Some((header, rows)) = sheet.rows.split_first() else {
        tracing::debug!("Sheet '{}' is empty", sheet.name);
        return Ok(normalized);
    };

    let mapping = ColumnMapping::from_header(&sheet.name, header)?;

    normalized.columns = header
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| (name.to_string(), column_type(name)))
        .collect();

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 2;
        let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("");

        let asset = cell(mapping.asset).trim();
        if asset.is_empty() {
            normalized.dropped_rows += 1;
            continue;
        }

        let mut warn = |column: &str, value: &str, err: CoercionError| {
            tracing::warn!(
                "⚠️ Sheet '{}' row {} column '{}': {}",
                sheet.name,
                row_number,
                column,
                err
            );
            normalized.warnings.push(CoercionWarning {
                row: row_number,
                column: column.to_string(),
                value: value.to_string(),
                reason: err.to_string(),
            });
        };

        let raw_quantity = cell(mapping.quantity);
        let quantity = parse_quantity(raw_quantity).unwrap_or_else(|err| {
            warn(COL_QUANTITY, raw_quantity, err);
            0
        });

        let raw_unit_value = cell(mapping.unit_value);
        let unit_value = match parse_unit_value(raw_unit_value) {
            Ok(value) => Some(value),
            Err(err) => {
                warn(COL_UNIT_VALUE, raw_unit_value, err);
                None
            }
        };

        let date = match mapping.date.filter(|_| dates == DateColumn::Parse) {
            Some(i) => parse_date(cell(i)).unwrap_or_else(|err| {
                warn(COL_DATE, cell(i), err);
                None
            }),
            None => None,
        };

        normalized.records.push(Record {
            row: row_number,
            asset: asset.to_string(),
            quantity,
            unit_value,
            date,
        });
    }

    tracing::debug!(
        "Sheet '{}': {} records kept, {} rows dropped, {} coercion warnings",
        normalized.name,
        normalized.records.len(),
        normalized.dropped_rows,
        normalized.warnings.len()
    );

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn sheet(rows: Vec<Vec<String>>) -> RawSheet {
        RawSheet::new("HGRE11", rows)
    }

    #[test]
    fn test_parse_quantity_is_total_and_non_negative() {
        assert_eq!(parse_quantity("10"), Ok(10));
        assert_eq!(parse_quantity(" 7 "), Ok(7));
        assert_eq!(parse_quantity("12.9"), Ok(12));
        assert_eq!(parse_quantity(""), Err(CoercionError::Empty));
        assert_eq!(
            parse_quantity("dez"),
            Err(CoercionError::NotNumeric("dez".to_string()))
        );
        assert_eq!(
            parse_quantity("-3"),
            Err(CoercionError::Negative("-3".to_string()))
        );
        assert!(parse_quantity("NaN").is_err());
    }

    #[test]
    fn test_parse_quantity_rejects_huge_values() {
        assert_eq!(parse_quantity("1000000000000"), Ok(MAX_QUANTITY));
        assert_eq!(
            parse_quantity("1e20"),
            Err(CoercionError::OutOfRange("1e20".to_string(), MAX_QUANTITY))
        );
        assert_eq!(
            parse_quantity("18446744073709551616"),
            Err(CoercionError::OutOfRange(
                "18446744073709551616".to_string(),
                MAX_QUANTITY
            ))
        );
        assert!(matches!(
            parse_quantity("1000000000001"),
            Err(CoercionError::OutOfRange(..))
        ));
    }

    #[test]
    fn test_huge_quantity_defaults_to_zero_with_warning() {
        let raw = sheet(vec![
            row(&["ATIVO", "QUANTIDADE", "VALOR UNIT"]),
            row(&["HGRE11", "1e20", "10,00"]),
            row(&["HGRE11", "5", "10,00"]),
        ]);

        let normalized = normalize_sheet(&raw, DateColumn::Parse).unwrap();
        let quantities: Vec<u64> = normalized.records.iter().map(|r| r.quantity).collect();
        assert_eq!(quantities, vec![0, 5]);
        assert_eq!(normalized.warnings.len(), 1);
        assert_eq!(normalized.warnings[0].column, "QUANTIDADE");
    }

    #[test]
    fn test_ignored_dates_are_not_parsed() {
        let raw = sheet(vec![
            row(&["ATIVO", "QUANTIDADE", "VALOR UNIT", "DATA"]),
            row(&["HGRE11", "10", "10,50", "ontem"]),
            row(&["HGRE11", "5", "11,00", "15/03/24"]),
        ]);

        let normalized = normalize_sheet(&raw, DateColumn::Ignore).unwrap();
        assert!(normalized.warnings.is_empty());
        assert!(normalized.records.iter().all(|r| r.date.is_none()));
        assert_eq!(normalized.records.len(), 2);
    }

    #[test]
    fn test_parse_unit_value_formats() {
        assert_eq!(parse_unit_value("12.50"), Ok(12.50));
        assert_eq!(parse_unit_value("R$ 1.234,56"), Ok(1234.56));
        assert_eq!(parse_unit_value("10,50"), Ok(10.50));
        assert_eq!(parse_unit_value("R$ 98"), Ok(98.0));
        assert_eq!(parse_unit_value(""), Err(CoercionError::Empty));
        assert!(parse_unit_value("R$ -").is_err());
        assert!(parse_unit_value("1,2,3").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("15/03/24"),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 15))
        );
        assert_eq!(parse_date("  "), Ok(None));
        assert!(parse_date("2024-03-15").is_err());
        assert!(parse_date("31/02/24").is_err());
    }

    #[test]
    fn test_column_mapping_requires_columns() {
        let header = row(&["DATA", "ATIVO", "QUANTIDADE", "VALOR UNIT"]);
        let mapping = ColumnMapping::from_header("X", &header).unwrap();
        assert_eq!(mapping.asset, 1);
        assert_eq!(mapping.date, Some(0));

        let err = ColumnMapping::from_header("X", &row(&["ATIVO", "QUANTIDADE"])).unwrap_err();
        assert_eq!(
            err,
            SheetError::MissingColumn {
                sheet: "X".to_string(),
                column: "VALOR UNIT".to_string(),
            }
        );
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let header = row(&["ativo", "QUANTIDADE", "VALOR UNIT"]);
        assert!(ColumnMapping::from_header("X", &header).is_err());
    }

    #[test]
    fn test_blank_assets_are_dropped() {
        let raw = sheet(vec![
            row(&["ATIVO", "QUANTIDADE", "VALOR UNIT"]),
            row(&["HGRE11", "10", "10,50"]),
            row(&["HGRE11", "5", "11,00"]),
            row(&["", "0", ""]),
            row(&["   "]),
            row(&[]),
        ]);

        let normalized = normalize_sheet(&raw, DateColumn::Parse).unwrap();
        assert_eq!(normalized.records.len(), 2);
        assert_eq!(normalized.dropped_rows, 3);
        assert!(normalized.warnings.is_empty());
        assert_eq!(normalized.records[1].row, 3);
    }

    #[test]
    fn test_bad_cells_fall_back_to_defaults() {
        let raw = sheet(vec![
            row(&["ATIVO", "QUANTIDADE", "VALOR UNIT", "DATA"]),
            row(&[" HGRE11 ", "muitas", "sem preço", "ontem"]),
        ]);

        let normalized = normalize_sheet(&raw, DateColumn::Parse).unwrap();
        let record = &normalized.records[0];
        assert_eq!(record.asset, "HGRE11");
        assert_eq!(record.quantity, 0);
        assert_eq!(record.unit_value, None);
        assert_eq!(record.date, None);

        let columns: Vec<&str> = normalized.warnings.iter().map(|w| w.column.as_str()).collect();
        assert_eq!(columns, vec!["QUANTIDADE", "VALOR UNIT", "DATA"]);
    }

    #[test]
    fn test_column_profile() {
        let raw = sheet(vec![row(&["ATIVO", "QUANTIDADE", "VALOR UNIT", "DATA", "OBS", ""])]);
        let normalized = normalize_sheet(&raw, DateColumn::Parse).unwrap();
        assert_eq!(
            normalized.columns,
            vec![
                ("ATIVO".to_string(), ColumnType::Text),
                ("QUANTIDADE".to_string(), ColumnType::Integer),
                ("VALOR UNIT".to_string(), ColumnType::Decimal),
                ("DATA".to_string(), ColumnType::Date),
                ("OBS".to_string(), ColumnType::Text),
            ]
        );
        assert!(normalized.records.is_empty());
    }

    #[test]
    fn test_empty_sheet_is_not_an_error() {
        let normalized = normalize_sheet(&sheet(vec![]), DateColumn::Parse).unwrap();
        assert!(normalized.records.is_empty());
        assert!(normalized.columns.is_empty());
    }
}
