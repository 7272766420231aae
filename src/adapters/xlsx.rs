//! Spreadsheet text extraction via calamine.
//!
//! Each sheet becomes a banner-titled section of tab-separated rows. The
//! goal is readable text on a small page, not a faithful grid: column
//! alignment is left to the monospace-free re-flow downstream, so cells are
//! simply joined in order.

use super::ParsedDocument;
use crate::error::{Error, Result};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;

/// Extract text from XLSX/XLS bytes, one section per sheet.
pub fn parse(data: &[u8]) -> Result<ParsedDocument> {
    let cursor = Cursor::new(data);
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| Error::InvalidDocument(format!("Failed to open workbook: {e}")))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(Error::InvalidDocument(
            "No sheets found in workbook".to_string(),
        ));
    }

    let mut sections: Vec<String> = Vec::new();
    for name in &sheet_names {
        if let Ok(range) = workbook.worksheet_range(name) {
            sections.push(render_sheet(name, &range));
        }
    }

    log::debug!("xlsx: extracted {} sheets", sections.len());
    Ok(ParsedDocument {
        content_text: sections.join("\n\n").trim().to_string(),
        images: Vec::new(),
        page_count: None,
    })
}

fn render_sheet(name: &str, range: &Range<Data>) -> String {
    let mut lines: Vec<String> = vec![format!("=== {name} ===")];
    for row in range.rows() {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        // Skip fully empty rows so blank grid regions don't inflate output.
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        lines.push(cells.join("\t"));
    }
    lines.join("\n")
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{f:.0}")
            } else {
                format!("{f:.2}")
            }
        },
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => format!("{dt}"),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{e:?}"),
    }
}
