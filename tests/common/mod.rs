#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// (sheet name, rows of cells)
pub type Sheet<'a> = (&'a str, Vec<Vec<&'a str>>);

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn content_xml(sheets: &[Sheet]) -> String {
    let mut body = String::new();
    for (name, rows) in sheets {
        body.push_str(&format!(r#"<table:table table:name="{}">"#, escape(name)));
        for row in rows {
            body.push_str("<table:table-row>");
            for cell in row {
                if cell.is_empty() {
                    body.push_str("<table:table-cell/>");
                } else {
                    body.push_str(&format!(
                        r#"<table:table-cell office:value-type="string"><text:p>{}</text:p></table:table-cell>"#,
                        escape(cell)
                    ));
                }
            }
            // LibreOffice pads every row up to the last used column
            body.push_str(r#"<table:table-cell table:number-columns-repeated="1019"/>"#);
            body.push_str("</table:table-row>");
        }
        body.push_str(
            r#"<table:table-row table:number-rows-repeated="1048000"><table:table-cell table:number-columns-repeated="1024"/></table:table-row>"#,
        );
        body.push_str("</table:table>");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" office:version="1.3"><office:body><office:spreadsheet>{}</office:spreadsheet></office:body></office:document-content>"#,
        body
    )
}

pub fn write_ods(path: &Path, sheets: &[Sheet]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    zip.start_file("mimetype", options).unwrap();
    zip.write_all(b"application/vnd.oasis.opendocument.spreadsheet")
        .unwrap();
    zip.start_file("content.xml", options).unwrap();
    zip.write_all(content_xml(sheets).as_bytes()).unwrap();
    zip.finish().unwrap();
}

pub fn holdings_workbook() -> Vec<Sheet<'static>> {
    vec![
        (
            "HGRE11",
            vec![
                vec!["ATIVO", "QUANTIDADE", "VALOR UNIT", "DATA"],
                vec!["HGRE11", "10", "R$ 10,50", "10/01/24"],
                vec!["HGRE11", "5", "R$ 11,00", "12/02/24"],
                vec!["", "0", "", ""],
            ],
        ),
        (
            "HGBS11",
            vec![
                vec!["ATIVO", "QUANTIDADE", "VALOR UNIT"],
                vec!["HGBS11", "8", "R$ 1.234,56"],
                vec!["HGBS11", "2", "sem preço"],
            ],
        ),
        ("Notas", vec![vec!["COMENTÁRIO"], vec!["rever carteira"]]),
    ]
}
