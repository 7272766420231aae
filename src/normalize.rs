//! Text normalization: repair known extraction artifacts without
//! destroying intentional structure.
//!
//! Passes run in a fixed order because later passes assume earlier
//! artifacts are gone:
//!
//! 1. Strip control characters (keeping newline/tab), normalize line
//!    endings, strip zero-width characters.
//! 2. Ligature-split repair — a narrow, explicitly-enumerated fix. General
//!    single-letter merging is deliberately NOT implemented: it corrupts
//!    legitimate short words and initials.
//! 3. Structural preservation: list markers and heading-like lines get a
//!    preceding blank line so re-flow keeps them visually isolated.
//! 4. Blank-line clamping: 4+ consecutive blank lines collapse to 2.
//!
//! Normalization is idempotent: `normalize(normalize(x)) == normalize(x)`.
//! Pipelines re-apply cleanup defensively and must be able to do so safely.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Ligature glyphs split into spaced letters inside a word, longest
    /// patterns first so "f f i" is not half-repaired by the "f f" rule.
    static ref LIGATURE_SPLITS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"([A-Za-z]) f f i([A-Za-z])").unwrap(), "${1}ffi${2}"),
        (Regex::new(r"([A-Za-z]) f f l([A-Za-z])").unwrap(), "${1}ffl${2}"),
        (Regex::new(r"([A-Za-z]) f f([A-Za-z])").unwrap(), "${1}ff${2}"),
        (Regex::new(r"([A-Za-z]) f i([A-Za-z])").unwrap(), "${1}fi${2}"),
        (Regex::new(r"([A-Za-z]) f l([A-Za-z])").unwrap(), "${1}fl${2}"),
    ];

    /// Numbered-list or bullet marker at the start of a line.
    static ref LIST_MARKER: Regex = Regex::new(r"^\s*(\d{1,3}[.)]\s+|[-•*]\s+)").unwrap();

    /// Four or more blank lines (five or more newlines).
    static ref EXCESS_BLANKS: Regex = Regex::new(r"\n{5,}").unwrap();
}

/// Fixes known corruption patterns in extracted document text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// Create a normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Run all normalization passes in order.
    pub fn normalize(&self, text: &str) -> String {
        let text = strip_control_and_invisible(text);
        let text = repair_ligatures(&text);
        let text = preserve_structure(&text);
        let text = clamp_blank_lines(&text);
        text.trim().to_string()
    }
}

/// Pass 1: line-ending normalization, control-character strip (newline and
/// tab survive), zero-width/invisible strip, per-line trailing-space trim.
fn strip_control_and_invisible(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let cleaned: String = unified
        .chars()
        .filter(|&c| {
            if c == '\n' || c == '\t' {
                return true;
            }
            if c.is_control() {
                return false;
            }
            // Zero-width space/joiner/non-joiner, word joiner, BOM.
            !matches!(c, '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}')
        })
        .collect();
    cleaned
        .split('\n')
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pass 2: reconstitute split ligatures.
///
/// Two artifact shapes are repaired: Unicode ligature codepoints that
/// survived extraction (expanded to their letter sequences), and ligature
/// glyphs reported as isolated spaced letters inside a word
/// ("de f ined" -> "defined"). Only the enumerated fi/ff/fl/ffi/ffl forms
/// are touched; merging arbitrary single letters is rejected as too
/// aggressive.
fn repair_ligatures(text: &str) -> String {
    let mut out = text
        .replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl");
    // Adjacent artifacts can expose a further match once repaired, so
    // iterate to a fixed point. Each repair removes characters, which
    // bounds the loop.
    loop {
        let mut changed = false;
        for (pattern, replacement) in LIGATURE_SPLITS.iter() {
            if let std::borrow::Cow::Owned(next) = pattern.replace_all(&out, *replacement) {
                out = next;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    out
}

/// Pass 3: make sure list items and heading-like lines are preceded by a
/// blank line, without altering the lines themselves. Consecutive list
/// items stay adjacent.
fn preserve_structure(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    for line in text.split('\n') {
        let marker = is_list_item(line);
        let heading = !marker && is_heading_like(line);
        if marker || heading {
            if let Some(prev) = out.last() {
                let prev_blank = prev.trim().is_empty();
                let adjacent_item = marker && is_list_item(prev);
                if !prev_blank && !adjacent_item {
                    out.push(String::new());
                }
            }
        }
        out.push(line.to_string());
    }
    out.join("\n")
}

fn is_list_item(line: &str) -> bool {
    LIST_MARKER.is_match(line)
}

/// Heading heuristic: a short ALL-CAPS line with at least two letters and
/// no lowercase. Conservative on purpose; a false negative costs nothing.
fn is_heading_like(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.len() < 3 || trimmed.len() > 60 {
        return false;
    }
    let letters = trimmed.chars().filter(|c| c.is_alphabetic()).count();
    letters >= 2 && !trimmed.chars().any(|c| c.is_lowercase())
}

/// Pass 4: collapse 4+ consecutive blank lines to 2, preserving paragraph
/// separation while bounding vertical waste.
fn clamp_blank_lines(text: &str) -> String {
    EXCESS_BLANKS.replace_all(text, "\n\n\n").into_owned()
}
