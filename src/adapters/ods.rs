use crate::domain::model::{RawRow, RawSheet};
use crate::utils::error::LoadError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

// LibreOffice Calc limits
const MAX_COLUMNS: usize = 16_384;
const MAX_ROWS: usize = 1_048_576;
/// Cells (empty rows count as one) a single sheet may expand to.
pub const MAX_SHEET_CELLS: usize = 5_000_000;

/// 讀取 .ods：ZIP 內的 content.xml
pub fn read_ods(bytes: &[u8]) -> Result<Vec<RawSheet>, LoadError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut content = String::new();
    archive
        .by_name("content.xml")?
        .read_to_string(&mut content)
        .map_err(|e| LoadError::Xml(format!("content.xml: {}", e)))?;

    parse_content_xml(&content)
}

pub fn parse_content_xml(xml: &str) -> Result<Vec<RawSheet>, LoadError> {
    let mut reader = Reader::from_str(xml);
    let mut parser = ContentParser::default();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => parser.start(&e, false)?,
            Event::Empty(e) => parser.start(&e, true)?,
            Event::End(e) => parser.end(e.name().as_ref())?,
            Event::Text(t) => parser.text(&t.unescape().map_err(xml_error)?),
            Event::Eof => break,
            _ => {}
        }
    }

    tracing::debug!("content.xml holds {} sheets", parser.sheets.len());
    Ok(parser.sheets)
}

fn xml_error(err: impl std::fmt::Display) -> LoadError {
    LoadError::Xml(err.to_string())
}

fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>, LoadError> {
    match e.try_get_attribute(name).map_err(xml_error)? {
        Some(attr) => Ok(Some(attr.unescape_value().map_err(xml_error)?.into_owned())),
        None => Ok(None),
    }
}

fn repeat_count(e: &BytesStart, name: &[u8], max: usize) -> Result<usize, LoadError> {
    Ok(attribute(e, name)?
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, max))
}

struct RowState {
    repeat: usize,
    cells: RawRow,
    empty_cells: usize,
}

#[derive(Default)]
struct CellState {
    repeat: usize,
    text: String,
    paragraph_depth: usize,
    annotation_depth: usize,
}

impl CellState {
    fn accepts_text(&self) -> bool {
        self.paragraph_depth > 0 && self.annotation_depth == 0
    }
}

/// Trailing empty cells and rows are only materialized once something
/// non-empty follows them, so repeated filler never reaches the output.
#[derive(Default)]
struct ContentParser {
    sheets: Vec<RawSheet>,
    sheet: Option<RawSheet>,
    sheet_cells: usize,
    empty_rows: usize,
    row: Option<RowState>,
    cell: Option<CellState>,
}

impl ContentParser {
    fn start(&mut self, e: &BytesStart, is_empty: bool) -> Result<(), LoadError> {
        match e.name().as_ref() {
            b"table:table" => {
                let name = attribute(e, b"table:name")?.unwrap_or_default();
                self.sheet = Some(RawSheet::new(name, Vec::new()));
                self.sheet_cells = 0;
                self.empty_rows = 0;
                if is_empty {
                    self.finish_sheet();
                }
            }
            b"table:table-row" if self.sheet.is_some() => {
                self.row = Some(RowState {
                    repeat: repeat_count(e, b"table:number-rows-repeated", MAX_ROWS)?,
                    cells: Vec::new(),
                    empty_cells: 0,
                });
                if is_empty {
                    self.finish_row()?;
                }
            }
            b"table:table-cell" | b"table:covered-table-cell" if self.row.is_some() => {
                self.cell = Some(CellState {
                    repeat: repeat_count(e, b"table:number-columns-repeated", MAX_COLUMNS)?,
                    ..CellState::default()
                });
                if is_empty {
                    self.finish_cell()?;
                }
            }
            name => {
                let Some(cell) = self.cell.as_mut() else {
                    return Ok(());
                };
                match name {
                    b"office:annotation" if !is_empty => cell.annotation_depth += 1,
                    _ if cell.annotation_depth > 0 => {}
                    b"text:p" | b"text:h" if !is_empty => {
                        if !cell.text.is_empty() {
                            cell.text.push(' ');
                        }
                        cell.paragraph_depth += 1;
                    }
                    b"text:s" if cell.accepts_text() => {
                        let count = attribute(e, b"text:c")?
                            .and_then(|v| v.parse::<usize>().ok())
                            .unwrap_or(1);
                        cell.text.extend(std::iter::repeat(' ').take(count.min(MAX_COLUMNS)));
                    }
                    b"text:tab" if cell.accepts_text() => cell.text.push('\t'),
                    b"text:line-break" if cell.accepts_text() => cell.text.push(' '),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8]) -> Result<(), LoadError> {
        match name {
            b"table:table" => self.finish_sheet(),
            b"table:table-row" => self.finish_row()?,
            b"table:table-cell" | b"table:covered-table-cell" => self.finish_cell()?,
            b"office:annotation" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.annotation_depth = cell.annotation_depth.saturating_sub(1);
                }
            }
            b"text:p" | b"text:h" => {
                if let Some(cell) = self.cell.as_mut() {
                    if cell.annotation_depth == 0 {
                        cell.paragraph_depth = cell.paragraph_depth.saturating_sub(1);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if let Some(cell) = self.cell.as_mut() {
            if cell.accepts_text() {
                cell.text.push_str(text);
            }
        }
    }

    fn too_large(&self) -> LoadError {
        LoadError::TooLarge {
            sheet: self
                .sheet
                .as_ref()
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            limit: MAX_SHEET_CELLS,
        }
    }

    fn finish_cell(&mut self) -> Result<(), LoadError> {
        let Some(cell) = self.cell.take() else {
            return Ok(());
        };
        let sheet_cells = self.sheet_cells;
        let Some(row) = self.row.as_mut() else {
            return Ok(());
        };

        if cell.text.is_empty() {
            row.empty_cells = row.empty_cells.saturating_add(cell.repeat);
            return Ok(());
        }

        let width = row
            .cells
            .len()
            .saturating_add(row.empty_cells)
            .saturating_add(cell.repeat);
        if sheet_cells.saturating_add(width) > MAX_SHEET_CELLS {
            return Err(self.too_large());
        }

        row.cells
            .extend(std::iter::repeat(String::new()).take(row.empty_cells));
        row.empty_cells = 0;
        row.cells.extend(std::iter::repeat(cell.text).take(cell.repeat));
        Ok(())
    }

    fn finish_row(&mut self) -> Result<(), LoadError> {
        let Some(row) = self.row.take() else {
            return Ok(());
        };
        if self.sheet.is_none() {
            return Ok(());
        }

        if row.cells.is_empty() {
            self.empty_rows = self.empty_rows.saturating_add(row.repeat);
            return Ok(());
        }

        let added = row
            .cells
            .len()
            .checked_mul(row.repeat)
            .and_then(|cells| cells.checked_add(self.empty_rows))
            .and_then(|cells| cells.checked_add(self.sheet_cells))
            .filter(|total| *total <= MAX_SHEET_CELLS);
        let Some(total) = added else {
            return Err(self.too_large());
        };
        self.sheet_cells = total;

        let Some(sheet) = self.sheet.as_mut() else {
            return Ok(());
        };
        sheet
            .rows
            .extend(std::iter::repeat(RawRow::new()).take(self.empty_rows));
        self.empty_rows = 0;
        sheet
            .rows
            .extend(std::iter::repeat(row.cells).take(row.repeat));
        Ok(())
    }

    fn finish_sheet(&mut self) {
        if let Some(sheet) = self.sheet.take() {
            tracing::debug!("Sheet '{}': {} rows", sheet.name, sheet.rows.len());
            self.sheets.push(sheet);
        }
        self.row = None;
        self.cell = None;
        self.sheet_cells = 0;
        self.empty_rows = 0;
    }
}
