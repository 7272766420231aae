//! Line assembly: unordered glyph runs to a single reading-order string.
//!
//! PDF text layers report glyph runs in paint order, which has no relation
//! to reading order. This module reconstructs the top-to-bottom,
//! left-to-right sequence a human would read:
//!
//! 1. Cluster runs into lines by Y-band, with a tolerance that scales with
//!    font height (a fixed pixel tolerance merges distinct small-font lines
//!    and splits large-font ones).
//! 2. Sort lines top-to-bottom. Y is inverted in PDF coordinates, so larger
//!    Y means higher on the page.
//! 3. Sort runs left-to-right within each line.
//! 4. Concatenate, inferring inter-word spaces from X-gaps and from
//!    character adjacency (many producers omit explicit space glyphs).
//! 5. Join lines with a newline, or a blank line when the vertical gap
//!    relative to the local font size signals a paragraph break.

use crate::source::GlyphRun;

/// Groups positioned glyph runs from one page into ordered lines and
/// paragraphs, producing a single reading-order string for the page.
///
/// The thresholds are tunable: the line/paragraph tie-breaks vary between
/// document classes, and the defaults here were validated against
/// representative book and report samples.
#[derive(Debug, Clone)]
pub struct LineAssembler {
    /// Y-band tolerance as a fraction of font height. Two runs whose
    /// baselines differ by less than this fraction of the larger font
    /// height belong to the same line.
    pub y_tolerance_factor: f32,

    /// X-gap (in text-space units) above which a space is inserted between
    /// adjacent runs on a line.
    pub gap_space_threshold: f32,

    /// Vertical gap, as a multiple of the local font size, above which a
    /// line break is promoted to a paragraph break.
    pub paragraph_gap_factor: f32,
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self {
            y_tolerance_factor: 0.4,
            gap_space_threshold: 2.0,
            paragraph_gap_factor: 1.8,
        }
    }
}

/// One inferred line: a representative baseline, the dominant font size,
/// and the member runs. Discarded after the page is flattened.
struct Line {
    y: f32,
    font_size: f32,
    runs: Vec<GlyphRun>,
}

impl LineAssembler {
    /// Create an assembler with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble one page's glyph runs into a reading-order string.
    ///
    /// A page with zero runs yields an empty string, not an error.
    pub fn assemble_page(&self, runs: &[GlyphRun]) -> String {
        let mut lines = self.cluster_into_lines(runs);
        if lines.is_empty() {
            return String::new();
        }

        // Top-to-bottom: larger Y first (inverted coordinate convention).
        lines.sort_by(|a, b| crate::utils::safe_float_cmp(b.y, a.y));
        for line in &mut lines {
            line.runs
                .sort_by(|a, b| crate::utils::safe_float_cmp(a.x, b.x));
        }

        let mut out = String::new();
        let mut prev: Option<&Line> = None;
        for line in &lines {
            if let Some(prev_line) = prev {
                let gap = prev_line.y - line.y;
                let local_font = prev_line.font_size.max(line.font_size).max(1.0);
                if gap > self.paragraph_gap_factor * local_font {
                    out.push_str("\n\n");
                } else {
                    out.push('\n');
                }
            }
            out.push_str(&self.flatten_line(line));
            prev = Some(line);
        }
        out.trim().to_string()
    }

    /// Cluster runs into Y-bands. Runs are sorted by Y first so the result
    /// does not depend on the input paint order.
    fn cluster_into_lines(&self, runs: &[GlyphRun]) -> Vec<Line> {
        let mut sorted: Vec<&GlyphRun> = runs.iter().filter(|r| !r.text.trim().is_empty()).collect();
        sorted.sort_by(|a, b| crate::utils::safe_float_cmp(b.y, a.y));

        let mut lines: Vec<Line> = Vec::new();
        for run in sorted {
            let tolerance = self.y_tolerance_factor
                * run
                    .font_size
                    .max(lines.last().map(|l| l.font_size).unwrap_or(0.0))
                    .max(1.0);
            match lines.last_mut() {
                Some(line) if (run.y - line.y).abs() < tolerance => {
                    line.font_size = line.font_size.max(run.font_size);
                    line.runs.push(run.clone());
                },
                _ => lines.push(Line {
                    y: run.y,
                    font_size: run.font_size,
                    runs: vec![run.clone()],
                }),
            }
        }
        lines
    }

    /// Concatenate one line's runs, inferring inter-word spacing.
    fn flatten_line(&self, line: &Line) -> String {
        let mut text = String::new();
        let mut prev_end: Option<f32> = None;

        for run in &line.runs {
            let fragment = run.text.as_str();
            if let Some(end) = prev_end {
                if self.needs_space(&text, fragment, run.x - end) {
                    text.push(' ');
                }
            }
            text.push_str(fragment);
            prev_end = Some(run.end_x());
        }
        text.trim_end().to_string()
    }

    /// Decide whether a space separates the accumulated text from the next
    /// fragment. Three independent triggers, any of which suffices:
    ///
    /// - the X-gap exceeds the threshold (explicit positioning gap);
    /// - both boundary characters are alphanumeric (producers that omit
    ///   space glyphs would otherwise fuse words);
    /// - sentence punctuation is followed directly by an alphanumeric.
    fn needs_space(&self, text: &str, next: &str, gap: f32) -> bool {
        if text.is_empty() || next.is_empty() {
            return false;
        }
        let last = match text.chars().last() {
            Some(c) => c,
            None => return false,
        };
        let first = match next.chars().next() {
            Some(c) => c,
            None => return false,
        };
        // Never stack separators.
        if last.is_whitespace() || first.is_whitespace() {
            return false;
        }

        if gap > self.gap_space_threshold {
            return true;
        }
        if last.is_alphanumeric() && first.is_alphanumeric() {
            return true;
        }
        matches!(last, ',' | ';' | ':' | '.' | '!' | '?' | ')' | ']' | '}')
            && first.is_alphanumeric()
    }
}
