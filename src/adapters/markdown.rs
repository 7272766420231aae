//! Markdown text extraction via pulldown-cmark.
//!
//! Markdown is rendered down to plain paragraphs: heading text survives as
//! its own line, list items keep a bullet marker, code blocks stay
//! verbatim, and inline emphasis is dropped. The re-flow stage handles all
//! presentation, so the adapter's only job is a faithful text skeleton.

use super::ParsedDocument;
use crate::error::{Error, Result};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Extract plain text from Markdown bytes.
pub fn parse(data: &[u8]) -> Result<ParsedDocument> {
    let source = std::str::from_utf8(data)
        .map_err(|e| Error::InvalidDocument(format!("Markdown is not valid UTF-8: {e}")))?;

    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(source, options);

    let mut blocks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut list_depth = 0usize;
    let mut in_item = false;

    let mut flush = |current: &mut String, blocks: &mut Vec<String>| {
        let block = current.trim_end().to_string();
        if !block.is_empty() {
            blocks.push(block);
        }
        current.clear();
    };

    for event in parser {
        match event {
            Event::Start(Tag::Heading { .. }) => flush(&mut current, &mut blocks),
            Event::End(TagEnd::Heading(_)) => flush(&mut current, &mut blocks),
            Event::Start(Tag::Paragraph) => {
                if !in_item {
                    flush(&mut current, &mut blocks);
                }
            },
            Event::End(TagEnd::Paragraph) => {
                if !in_item {
                    flush(&mut current, &mut blocks);
                }
            },
            Event::Start(Tag::List(_)) => {
                if list_depth == 0 {
                    flush(&mut current, &mut blocks);
                }
                list_depth += 1;
            },
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    flush(&mut current, &mut blocks);
                }
            },
            Event::Start(Tag::Item) => {
                in_item = true;
                if !current.is_empty() && !current.ends_with('\n') {
                    current.push('\n');
                }
                current.push_str("- ");
            },
            Event::End(TagEnd::Item) => in_item = false,
            Event::Start(Tag::CodeBlock(_)) => flush(&mut current, &mut blocks),
            Event::End(TagEnd::CodeBlock) => flush(&mut current, &mut blocks),
            Event::Start(Tag::BlockQuote { .. }) | Event::End(TagEnd::BlockQuote { .. }) => {
                flush(&mut current, &mut blocks)
            },
            Event::Text(text) => current.push_str(&text),
            Event::Code(code) => current.push_str(&code),
            Event::SoftBreak => current.push(' '),
            Event::HardBreak => current.push('\n'),
            Event::Rule => flush(&mut current, &mut blocks),
            _ => {},
        }
    }
    flush(&mut current, &mut blocks);

    log::debug!("markdown: extracted {} blocks", blocks.len());
    Ok(ParsedDocument {
        content_text: blocks.join("\n\n"),
        images: Vec::new(),
        page_count: None,
    })
}
