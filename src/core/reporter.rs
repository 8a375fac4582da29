use crate::domain::model::{DividendReport, HoldingsReport, SheetReport, SheetSection};
use std::fmt::Write;

const SEPARATOR_WIDTH: usize = 50;
const MISSING: &str = "n/a";

/// "R$ 1,234.56"
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}R$ {}.{}", sign, grouped, frac_part)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

fn format_optional_currency(value: Option<f64>) -> String {
    value.map(format_currency).unwrap_or_else(|| MISSING.to_string())
}

/// Right-aligned plain text table, one space between columns.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &widths, headers.iter().copied());
    for row in rows {
        push_line(&mut out, &widths, row.iter().map(String::as_str));
    }
    out
}

fn push_line<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
        .collect();
    out.push_str(line.join(" ").trim_end());
    out.push('\n');
}

fn render_sheet(out: &mut String, report: &SheetReport) {
    let sheet = &report.sheet;
    let _ = writeln!(out, "\n=== ABA: '{}' ===", sheet.name);

    out.push_str("\nTipos de dados:\n");
    for (column, kind) in &sheet.columns {
        let _ = writeln!(out, "{:<16}{}", column, kind);
    }

    if !sheet.warnings.is_empty() {
        let _ = writeln!(out, "\n⚠️ {} valores não convertidos:", sheet.warnings.len());
        for warning in &sheet.warnings {
            let _ = writeln!(
                out,
                "  linha {} {}: '{}' ({})",
                warning.row, warning.column, warning.value, warning.reason
            );
        }
    }

    if !report.summaries.is_empty() {
        let rows: Vec<Vec<String>> = report
            .summaries
            .iter()
            .map(|s| {
                vec![
                    s.asset.clone(),
                    s.total_quantity.to_string(),
                    format_currency(s.total_invested),
                    format_optional_currency(s.average_price),
                ]
            })
            .collect();
        out.push_str("\n📊 RESUMO POR ATIVO:\n");
        out.push_str(&render_table(
            &["ATIVO", "Quantidade_Total", "Valor_Total_Investido", "Preço_Medio"],
            &rows,
        ));
    }

    let rows: Vec<Vec<String>> = sheet
        .records
        .iter()
        .map(|r| {
            vec![
                r.row.to_string(),
                r.asset.clone(),
                r.quantity.to_string(),
                r.unit_value
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_else(|| MISSING.to_string()),
                r.date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| MISSING.to_string()),
            ]
        })
        .collect();
    out.push_str("\nConteúdo da aba:\n");
    out.push_str(&render_table(
        &["LINHA", "ATIVO", "QUANTIDADE", "VALOR UNIT", "DATA"],
        &rows,
    ));

    let _ = writeln!(out, "\n{}", "=".repeat(SEPARATOR_WIDTH));
}

pub fn render_holdings(report: &HoldingsReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Abas disponíveis: {:?}", report.sheet_names);

    for section in &report.sections {
        match section {
            SheetSection::Reported(sheet) => render_sheet(&mut out, sheet),
            SheetSection::Skipped(skipped) => {
                let _ = writeln!(out, "\n=== ABA: '{}' ===", skipped.name);
                let _ = writeln!(out, "❌ Aba ignorada: {}", skipped.reason);
                let _ = writeln!(out, "\n{}", "=".repeat(SEPARATOR_WIDTH));
            }
        }
    }

    out
}

pub fn render_dividends(report: &DividendReport) -> String {
    if report.estimates.is_empty() {
        return "No valid assets found for dividend calculation.\n".to_string();
    }

    let rows: Vec<Vec<String>> = report
        .estimates
        .iter()
        .map(|e| {
            vec![
                e.asset.clone(),
                e.total_quantity.to_string(),
                format_percent(e.annual_yield_pct / 12.0),
                format_currency(e.monthly_dividend),
                format!("{:.1}%", e.goal_progress_pct),
            ]
        })
        .collect();

    let mut out = String::from("\n💰 RESUMO DE DIVIDENDOS POR ATIVO 💰\n");
    out.push_str(&render_table(
        &["Ativo", "Total de Cotas", "DY Mensal", "Dividendo Mensal", "Meta"],
        &rows,
    ));
    let _ = writeln!(
        out,
        "\nTotal Mensal: {} (meta: {} por ativo)",
        format_currency(report.total_monthly()),
        format_currency(report.monthly_goal)
    );
    out
}
