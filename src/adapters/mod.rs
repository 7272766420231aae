//! Format adapters: turning non-PDF inputs into plain document text.
//!
//! Each adapter parses one input format from raw bytes into a
//! [`ParsedDocument`]. Adapters deliberately produce *text*, not layout:
//! everything downstream of parsing (normalization, re-flow, pagination)
//! is format-agnostic and shared with the PDF path.
//!
//! Format selection is by file extension only. Sniffing content to guess a
//! format masks user mistakes; a wrong extension should fail loudly as
//! unsupported or invalid, not silently half-parse.

mod csv;
mod docx;
mod markdown;
mod xlsx;

use crate::error::{Error, Result};
use crate::images::ExtractedImage;

/// The text-and-images result of parsing a non-PDF input.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Extracted document text with paragraph breaks
    pub content_text: String,
    /// Embedded images, in document order
    pub images: Vec<ExtractedImage>,
    /// Source page count when the format has a page notion, else `None`
    pub page_count: Option<usize>,
}

/// Parse `data` according to the file extension (lowercased, without dot).
///
/// Empty input is rejected before any parser runs; a zero-byte file is a
/// user error, not a format error. Formats with a known extension but no
/// adapter (presentations, EPUB re-packing) return
/// [`Error::UnsupportedFormat`] naming the extension so the caller can
/// report it precisely.
pub fn parse_bytes(data: &[u8], extension: &str) -> Result<ParsedDocument> {
    if data.is_empty() || data.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(Error::EmptyInput);
    }

    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    log::debug!("parsing {} bytes as .{ext}", data.len());
    match ext.as_str() {
        "docx" => docx::parse(data),
        "md" | "markdown" => markdown::parse(data),
        "csv" => csv::parse(data),
        "xlsx" | "xls" | "xlsm" => xlsx::parse(data),
        "pptx" | "ppt" | "epub" => Err(Error::UnsupportedFormat(ext)),
        other => Err(Error::UnsupportedFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_rejected_before_parsing() {
        assert!(matches!(parse_bytes(b"", "md"), Err(Error::EmptyInput)));
        assert!(matches!(
            parse_bytes(b"   \n\t ", "csv"),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_unknown_extension_is_typed_error() {
        let err = parse_bytes(b"data", "xyz").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref e) if e == "xyz"));
    }

    #[test]
    fn test_presentation_formats_named_in_error() {
        let err = parse_bytes(b"data", "pptx").unwrap_err();
        assert!(format!("{err}").contains("pptx"));
        let err = parse_bytes(b"data", ".EPUB").unwrap_err();
        assert!(format!("{err}").contains("epub"));
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        // Reaches the markdown adapter rather than the unsupported branch.
        let doc = parse_bytes(b"# Title\n\nbody", "MD").unwrap();
        assert!(doc.content_text.contains("Title"));
    }
}
