//! CSV text extraction.
//!
//! Rows are rendered as a pipe-delimited text table with a separator rule
//! under the header row. Quoting, embedded delimiters, and ragged rows are
//! the csv crate's problem; this adapter only shapes the parsed records.

use super::ParsedDocument;
use crate::error::{Error, Result};

/// Render CSV bytes as a pipe-delimited text table.
pub fn parse(data: &[u8]) -> Result<ParsedDocument> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut lines: Vec<String> = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| Error::InvalidDocument(format!("CSV parse error: {e}")))?;
        let cells: Vec<&str> = record.iter().map(str::trim).collect();
        lines.push(cells.join(" | "));

        // Separator rule under the first row so the header reads as one.
        if index == 0 {
            let rule: Vec<String> = cells.iter().map(|c| "-".repeat(c.len().max(3))).collect();
            lines.push(rule.join(" | "));
        }
    }

    if lines.is_empty() {
        return Err(Error::InvalidDocument("CSV contains no records".to_string()));
    }

    log::debug!("csv: extracted {} rows", lines.len().saturating_sub(1));
    Ok(ParsedDocument {
        content_text: lines.join("\n"),
        images: Vec::new(),
        page_count: None,
    })
}
