//! DOCX text extraction.
//!
//! DOCX files are ZIP archives containing Open XML; the main content lives
//! in `word/document.xml`. Only the text stream matters here: paragraphs
//! (`w:p`) become paragraph breaks, runs of text (`w:t`) concatenate, and
//! explicit breaks (`w:br`, `w:tab`) map to their plain-text equivalents.
//! Styling is discarded — the output is re-flowed for an E Ink page, so
//! source fonts and alignment carry no meaning downstream.

use super::ParsedDocument;
use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Extract plain text from DOCX bytes.
pub fn parse(data: &[u8]) -> Result<ParsedDocument> {
    let cursor = Cursor::new(data);
    let mut archive = ZipArchive::new(cursor)
        .map_err(|e| Error::InvalidDocument(format!("Failed to open DOCX archive: {e}")))?;

    let xml_content = {
        let mut file = archive
            .by_name("word/document.xml")
            .map_err(|_| Error::InvalidDocument("DOCX missing word/document.xml".to_string()))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::InvalidDocument(format!("Failed to read document.xml: {e}")))?;
        content
    };

    let mut reader = Reader::from_str(&xml_content);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => current.clear(),
                b"t" => in_text = true,
                _ => {},
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    // Empty paragraphs are kept as paragraph breaks; the
                    // normalizer clamps runs of them later.
                    paragraphs.push(std::mem::take(&mut current));
                },
                b"t" => in_text = false,
                _ => {},
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"br" => current.push('\n'),
                b"tab" => current.push('\t'),
                _ => {},
            },
            Ok(Event::Text(ref t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| Error::InvalidDocument(format!("Bad XML text: {e}")))?;
                current.push_str(&text);
            },
            Ok(Event::Eof) => break,
            Ok(_) => {},
            Err(e) => {
                return Err(Error::InvalidDocument(format!(
                    "XML parse error in document.xml: {e}"
                )))
            },
        }
        buf.clear();
    }

    let content_text = paragraphs
        .iter()
        .map(|p| p.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string();

    log::debug!(
        "docx: extracted {} paragraphs, {} chars",
        paragraphs.len(),
        content_text.len()
    );

    Ok(ParsedDocument {
        content_text,
        images: Vec::new(),
        page_count: None,
    })
}
