//! Extraction-quality scoring and the OCR fallback decision.
//!
//! Native text extraction is fast but fails in characteristic ways: scanned
//! pages have no text layer, broken encodings shower the text with
//! replacement characters, shattered ligatures produce clouds of
//! single-letter "words", and font-substitution garbage drags the average
//! word length toward one. Each failure mode gets its own independent
//! signal; any one of them is enough to trigger the image-based fallback.

/// Overall verdict on extraction quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Native extraction is trustworthy
    Good,
    /// Extraction is degraded; OCR fallback is warranted
    Poor,
}

/// Quality metrics for a whole document's extracted text.
///
/// Derived and read-only; discarded once the fallback decision is made.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    /// Mean extracted characters per page
    pub avg_chars_per_page: f32,
    /// Mean length of whitespace-delimited tokens
    pub avg_word_length: f32,
    /// Fraction of characters that are known-corrupt or replacement characters
    pub suspicious_char_ratio: f32,
    /// Fraction of tokens that are a single character
    pub single_char_word_ratio: f32,
    /// Whether image-based recognition should replace native extraction
    pub should_fallback: bool,
    /// Overall verdict
    pub verdict: Verdict,
}

/// Scores assembled text to decide whether extraction is trustworthy or
/// must fall back to image-based recognition.
#[derive(Debug, Clone)]
pub struct QualityAssessor {
    /// Below this many characters per page the document reads as scanned
    pub min_chars_per_page: f32,
    /// Above this corrupt-character ratio the encoding is considered broken
    pub max_suspicious_ratio: f32,
    /// Above this single-character-token ratio ligatures are considered shattered
    pub max_single_char_ratio: f32,
    /// Below this average token length the font mapping is considered garbage
    pub min_avg_word_length: f32,
}

impl Default for QualityAssessor {
    fn default() -> Self {
        Self {
            min_chars_per_page: 50.0,
            max_suspicious_ratio: 0.05,
            max_single_char_ratio: 0.3,
            min_avg_word_length: 2.0,
        }
    }
}

impl QualityAssessor {
    /// Create an assessor with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Score `text` extracted from a `page_count`-page document.
    ///
    /// The four decision rules are independent OR-conditions, not a
    /// weighted score: each represents a qualitatively different failure
    /// mode, and any one is sufficient.
    pub fn assess(&self, text: &str, page_count: usize) -> QualityReport {
        let pages = page_count.max(1) as f32;
        let char_count = text.chars().count();
        let avg_chars_per_page = char_count as f32 / pages;

        let suspicious = text.chars().filter(|&c| is_suspicious_char(c)).count();
        let suspicious_char_ratio = if char_count == 0 {
            0.0
        } else {
            suspicious as f32 / char_count as f32
        };

        let mut word_count = 0usize;
        let mut word_char_total = 0usize;
        let mut single_char_words = 0usize;
        for word in text.split_whitespace() {
            word_count += 1;
            let len = word.chars().count();
            word_char_total += len;
            if len == 1 {
                single_char_words += 1;
            }
        }
        let avg_word_length = if word_count == 0 {
            0.0
        } else {
            word_char_total as f32 / word_count as f32
        };
        let single_char_word_ratio = if word_count == 0 {
            0.0
        } else {
            single_char_words as f32 / word_count as f32
        };

        let should_fallback = avg_chars_per_page < self.min_chars_per_page
            || suspicious_char_ratio > self.max_suspicious_ratio
            || single_char_word_ratio > self.max_single_char_ratio
            || avg_word_length < self.min_avg_word_length;

        QualityReport {
            avg_chars_per_page,
            avg_word_length,
            suspicious_char_ratio,
            single_char_word_ratio,
            should_fallback,
            verdict: if should_fallback {
                Verdict::Poor
            } else {
                Verdict::Good
            },
        }
    }
}

/// Known-corrupt characters: the Unicode replacement character, Private
/// Use Area codepoints (unmapped embedded-font glyphs land here), and
/// control characters other than newline/tab.
fn is_suspicious_char(c: char) -> bool {
    c == '\u{FFFD}'
        || ('\u{E000}'..='\u{F8FF}').contains(&c)
        || (c.is_control() && c != '\n' && c != '\t' && c != '\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_document_triggers_fallback() {
        // 10 chars/page over 5 pages: clearly a scanned document.
        let assessor = QualityAssessor::new();
        let text = "page text page text page text page text tt"; // ~50 chars total
        let report = assessor.assess(text, 5);
        assert!(report.avg_chars_per_page < 50.0);
        assert!(report.should_fallback);
        assert_eq!(report.verdict, Verdict::Poor);
    }

    #[test]
    fn test_dense_clean_document_passes() {
        let assessor = QualityAssessor::new();
        let sentence = "The quick brown fox jumps over the lazy dog. ";
        let text = sentence.repeat(45); // ~2000 chars on one page
        let report = assessor.assess(&text, 1);
        assert!(report.avg_chars_per_page > 1000.0);
        assert!(!report.should_fallback);
        assert_eq!(report.verdict, Verdict::Good);
    }

    #[test]
    fn test_replacement_characters_trigger_fallback() {
        let assessor = QualityAssessor::new();
        // Plenty of text per page, but 10% replacement characters.
        let text = format!(
            "{}{}",
            "clean words here ".repeat(20),
            "\u{FFFD}".repeat(40)
        );
        let report = assessor.assess(&text, 1);
        assert!(report.suspicious_char_ratio > 0.05);
        assert!(report.should_fallback);
    }

    #[test]
    fn test_shattered_ligatures_trigger_fallback() {
        let assessor = QualityAssessor::new();
        // Half the tokens are single letters: ligature shattering.
        let text = "t h e q u i c k b r o w n f o x words words words ".repeat(10);
        let report = assessor.assess(&text, 1);
        assert!(report.single_char_word_ratio > 0.3);
        assert!(report.should_fallback);
    }

    #[test]
    fn test_short_average_word_length_triggers_fallback() {
        let assessor = QualityAssessor::new();
        let text = "ab a b ab a b ab a b ".repeat(40);
        let report = assessor.assess(&text, 1);
        assert!(report.avg_word_length < 2.0);
        assert!(report.should_fallback);
    }

    #[test]
    fn test_empty_text_is_poor_not_panic() {
        let assessor = QualityAssessor::new();
        let report = assessor.assess("", 3);
        assert_eq!(report.avg_chars_per_page, 0.0);
        assert!(report.should_fallback);
    }
}
