//! Page flow: re-flowing normalized text and images into fixed-size
//! output pages.
//!
//! Text is wrapped greedily against the *measured* rendered width of each
//! candidate line, never against character counts: whether a word fits
//! depends on the active font and size, and the measurement seam
//! ([`TextMeasure`]) keeps that knowledge with the rendering collaborator.

use crate::config::{Margins, OutputConfig, PT_TO_MM};
use crate::error::{Error, Result};
use crate::images::ExtractedImage;

/// Measures rendered text width for the active font.
///
/// The PDF-serialization collaborator supplies an exact implementation;
/// [`AverageCharMetrics`] is a serviceable default for proportional body
/// fonts.
pub trait TextMeasure {
    /// Width in millimetres of `text` rendered at `font_size_pt`.
    fn text_width_mm(&self, text: &str, font_size_pt: f32) -> f32;
}

/// Width estimation from an average per-character em fraction.
#[derive(Debug, Clone, Copy)]
pub struct AverageCharMetrics {
    /// Average glyph advance as a fraction of the em size
    pub em_fraction: f32,
}

impl Default for AverageCharMetrics {
    fn default() -> Self {
        Self { em_fraction: 0.5 }
    }
}

impl TextMeasure for AverageCharMetrics {
    fn text_width_mm(&self, text: &str, font_size_pt: f32) -> f32 {
        text.chars().count() as f32 * font_size_pt * PT_TO_MM * self.em_fraction
    }
}

/// One wrapped line ready for placement.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    /// Line text; empty for blank lines
    pub content: String,
    /// Blank lines become paragraph-spacing gaps, not rendered lines
    pub is_blank: bool,
}

impl LayoutLine {
    fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_blank: false,
        }
    }

    fn blank() -> Self {
        Self {
            content: String::new(),
            is_blank: true,
        }
    }
}

/// A text line placed at a concrete vertical position on an output page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// Baseline Y from the top of the page, in millimetres
    pub y_mm: f32,
    /// Line text
    pub content: String,
}

/// An image placed on an output page, scaled to its render size.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    /// Index into the conversion's image list
    pub image_index: usize,
    /// Left edge X in millimetres
    pub x_mm: f32,
    /// Top edge Y in millimetres
    pub y_mm: f32,
    /// Rendered width in millimetres
    pub width_mm: f32,
    /// Rendered height in millimetres
    pub height_mm: f32,
}

/// One output page: target geometry plus the lines and images assigned to
/// it. Terminal once rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPage {
    /// Page width in millimetres
    pub width_mm: f32,
    /// Page height in millimetres
    pub height_mm: f32,
    /// Page margins
    pub margins: Margins,
    /// Placed text lines, top to bottom
    pub lines: Vec<PlacedLine>,
    /// Placed images
    pub images: Vec<PlacedImage>,
}

/// Re-flows normalized document text and extracted images into fixed-size
/// output pages.
#[derive(Debug, Clone)]
pub struct PageFlowEngine {
    config: OutputConfig,
    /// Fraction of line height used as the vertical gap for a blank line
    pub paragraph_gap_fraction: f32,
    /// Vertical budget reserved per interleaved image, in millimetres
    pub image_footprint_mm: f32,
    /// Maximum rendered image height in millimetres
    pub image_max_height_mm: f32,
    /// Vertical gap after an appended image, in millimetres
    pub image_gap_mm: f32,
}

impl PageFlowEngine {
    /// Create a flow engine for the given output configuration.
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            paragraph_gap_fraction: 0.8,
            image_footprint_mm: 80.0,
            image_max_height_mm: 80.0,
            image_gap_mm: 10.0,
        }
    }

    /// The output configuration this engine flows against.
    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Flow `text` and `images` into output pages.
    ///
    /// Fails fast with [`Error::NoContentExtracted`] when the text is empty
    /// after all prior stages: silently emitting a blank document would
    /// mask an upstream failure.
    pub fn flow(
        &self,
        text: &str,
        images: &[ExtractedImage],
        measure: &dyn TextMeasure,
    ) -> Result<Vec<OutputPage>> {
        if text.trim().is_empty() {
            return Err(Error::NoContentExtracted);
        }

        let lines = self.wrap_text(text, measure);
        Ok(self.paginate(&lines, images))
    }

    /// Split text into paragraphs and source lines, then greedily word-wrap
    /// each source line against the measured content width.
    pub fn wrap_text(&self, text: &str, measure: &dyn TextMeasure) -> Vec<LayoutLine> {
        let content_width = self.config.content_width_mm();
        let font_size = self.config.font_size_pt;
        let mut out: Vec<LayoutLine> = Vec::new();

        let paragraphs: Vec<&str> = text.split("\n\n").collect();
        for (p_index, paragraph) in paragraphs.iter().enumerate() {
            if paragraph.trim().is_empty() {
                out.push(LayoutLine::blank());
                continue;
            }

            for line in paragraph.split('\n') {
                if line.trim().is_empty() {
                    out.push(LayoutLine::blank());
                    continue;
                }
                self.wrap_line(line, content_width, font_size, measure, &mut out);
            }

            if p_index + 1 < paragraphs.len() {
                out.push(LayoutLine::blank());
            }
        }
        out
    }

    fn wrap_line(
        &self,
        line: &str,
        content_width: f32,
        font_size: f32,
        measure: &dyn TextMeasure,
        out: &mut Vec<LayoutLine>,
    ) {
        let mut current = String::new();
        for word in line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if measure.text_width_mm(&candidate, font_size) <= content_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                out.push(LayoutLine::text(std::mem::take(&mut current)));
            }
            // The overflowing word starts the next line; it is only broken
            // if its own rendered width exceeds the full content width.
            if measure.text_width_mm(word, font_size) <= content_width {
                current = word.to_string();
            } else {
                let mut parts = break_long_word(word, content_width, font_size, measure);
                current = parts.pop().unwrap_or_default();
                for part in parts {
                    out.push(LayoutLine::text(part));
                }
            }
        }
        if !current.is_empty() {
            out.push(LayoutLine::text(current));
        }
    }

    /// Pack wrapped lines into pages with a vertical cursor, interleaving
    /// images near page boundaries and appending leftovers at the end.
    fn paginate(&self, lines: &[LayoutLine], images: &[ExtractedImage]) -> Vec<OutputPage> {
        let (page_w, page_h) = self.config.page_profile.dimensions_mm();
        let margins = self.config.margins_mm;
        let content_width = self.config.content_width_mm();
        let content_height = self.config.content_height_mm();
        let line_height = self.config.line_height_mm();
        let bottom_limit = margins.top + content_height;

        let images_per_page = (content_height / self.image_footprint_mm).floor() as usize;

        let mut pages: Vec<OutputPage> = Vec::new();
        let mut page = self.blank_page(page_w, page_h, margins);
        let mut cursor = margins.top;
        let mut image_index = 0usize;

        for line in lines {
            if line.is_blank {
                cursor += line_height * self.paragraph_gap_fraction;
                continue;
            }
            if cursor + line_height > bottom_limit {
                // Page is full: drop in pending images before starting the
                // next page, bottom-up so they sit under the text block.
                image_index = self.place_boundary_images(
                    &mut page,
                    images,
                    image_index,
                    images_per_page,
                    content_width,
                    bottom_limit,
                );
                pages.push(std::mem::replace(
                    &mut page,
                    self.blank_page(page_w, page_h, margins),
                ));
                cursor = margins.top;
            }
            page.lines.push(PlacedLine {
                y_mm: cursor,
                content: line.content.clone(),
            });
            cursor += line_height;
        }

        // Remaining images go at the end, each on the current page if it
        // still fits, otherwise forcing a new page.
        while image_index < images.len() {
            if cursor + self.image_footprint_mm > bottom_limit {
                pages.push(std::mem::replace(
                    &mut page,
                    self.blank_page(page_w, page_h, margins),
                ));
                cursor = margins.top;
            }
            let (w, h) = self.render_size(&images[image_index], content_width);
            page.images.push(PlacedImage {
                image_index,
                x_mm: margins.left,
                y_mm: cursor,
                width_mm: w,
                height_mm: h,
            });
            cursor += h + self.image_gap_mm;
            image_index += 1;
        }

        if !page.lines.is_empty() || !page.images.is_empty() || pages.is_empty() {
            pages.push(page);
        }
        pages
    }

    fn blank_page(&self, width_mm: f32, height_mm: f32, margins: Margins) -> OutputPage {
        OutputPage {
            width_mm,
            height_mm,
            margins,
            lines: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Place up to `capacity` images at the bottom of a filled page.
    /// Returns the next unplaced image index.
    fn place_boundary_images(
        &self,
        page: &mut OutputPage,
        images: &[ExtractedImage],
        start: usize,
        capacity: usize,
        content_width: f32,
        bottom_limit: f32,
    ) -> usize {
        let mut index = start;
        let mut y = bottom_limit - self.image_footprint_mm;
        while index < images.len() && index - start < capacity {
            let (w, h) = self.render_size(&images[index], content_width);
            page.images.push(PlacedImage {
                image_index: index,
                x_mm: page.margins.left,
                y_mm: y,
                width_mm: w,
                height_mm: h,
            });
            y -= self.image_footprint_mm + self.image_gap_mm;
            index += 1;
            if y < page.margins.top {
                break;
            }
        }
        index
    }

    /// Scale an image to fit the content width, capped at the maximum
    /// rendered height, preserving aspect ratio.
    fn render_size(&self, image: &ExtractedImage, content_width: f32) -> (f32, f32) {
        let aspect = image.aspect_ratio();
        // Source pixels map to roughly quarter-millimetres at device DPI.
        let mut width = content_width.min(image.width as f32 / 4.0).max(1.0);
        let mut height = width / aspect;
        if height > self.image_max_height_mm {
            height = self.image_max_height_mm;
            width = (height * aspect).min(content_width);
        }
        (width, height)
    }
}

/// Break a word wider than the content width character-by-character,
/// hyphenating each full part.
fn break_long_word(
    word: &str,
    content_width: f32,
    font_size: f32,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        let mut candidate = current.clone();
        candidate.push(ch);
        if measure.text_width_mm(&candidate, font_size) <= content_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                parts.push(format!("{current}-"));
            }
            current = ch.to_string();
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    if parts.is_empty() {
        parts.push(word.to_string());
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageProfile;

    /// 1 mm per character regardless of font: makes wrap boundaries exact.
    struct UnitMeasure;

    impl TextMeasure for UnitMeasure {
        fn text_width_mm(&self, text: &str, _font_size_pt: f32) -> f32 {
            text.chars().count() as f32
        }
    }

    fn engine() -> PageFlowEngine {
        PageFlowEngine::new(OutputConfig::default())
    }

    fn a4_engine() -> PageFlowEngine {
        PageFlowEngine::new(OutputConfig {
            page_profile: PageProfile::A4,
            ..Default::default()
        })
    }

    fn test_image(page: usize, width: u32, height: u32) -> ExtractedImage {
        ExtractedImage {
            page_number: page,
            data: vec![0u8; 8],
            width,
            height,
            name: None,
        }
    }

    #[test]
    fn test_empty_text_fails_fast() {
        let result = engine().flow("   \n\n  ", &[], &UnitMeasure);
        assert!(matches!(result, Err(Error::NoContentExtracted)));
    }

    #[test]
    fn test_wrap_boundary_never_splits_fitting_word() {
        // Device content width is 87.8 mm; with 1 mm per char, "alpha beta"
        // (10) fits but adding " gamma" (16) does not: the boundary falls
        // before "gamma", which starts the next line whole.
        let config = OutputConfig {
            margins_mm: Margins::uniform(48.0), // content width 11.8 mm
            ..Default::default()
        };
        let eng = PageFlowEngine::new(config);
        let lines = eng.wrap_text("alpha beta gamma", &UnitMeasure);
        let texts: Vec<&str> = lines.iter().map(|l| l.content.as_str()).collect();
        assert_eq!(texts, vec!["alpha beta", "gamma"]);
    }

    #[test]
    fn test_wrap_exact_fit_is_kept() {
        // Content width 10: "12345 7890" is exactly 10 chars and must not wrap.
        let config = OutputConfig {
            margins_mm: Margins::uniform(48.9), // content 10.0 mm on device
            ..Default::default()
        };
        let eng = PageFlowEngine::new(config);
        let lines = eng.wrap_text("12345 7890", &UnitMeasure);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].content, "12345 7890");
    }

    #[test]
    fn test_long_word_broken_with_hyphen_only_when_too_wide() {
        let config = OutputConfig {
            margins_mm: Margins::uniform(48.9), // content 10.0 mm
            ..Default::default()
        };
        let eng = PageFlowEngine::new(config);
        let lines = eng.wrap_text("extraordinarily", &UnitMeasure);
        assert!(lines.len() > 1);
        assert!(lines[0].content.ends_with('-'));
        let reassembled: String = lines
            .iter()
            .map(|l| l.content.trim_end_matches('-'))
            .collect();
        assert_eq!(reassembled, "extraordinarily");
    }

    #[test]
    fn test_fitting_long_word_never_broken() {
        // A4 content width 190 mm: a 34-char word fits easily and must
        // stay whole no matter how long it looks.
        let lines = a4_engine().wrap_text("supercalifragilisticexpialidocious", &UnitMeasure);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].content, "supercalifragilisticexpialidocious");
        assert!(!lines[0].content.contains('-'));
    }

    #[test]
    fn test_blank_lines_become_gaps_not_rendered_lines() {
        let eng = a4_engine();
        let pages = eng.flow("para one\n\npara two", &[], &UnitMeasure).unwrap();
        assert_eq!(pages.len(), 1);
        let page = &pages[0];
        assert_eq!(page.lines.len(), 2);
        let gap = page.lines[1].y_mm - page.lines[0].y_mm;
        let line_height = eng.config().line_height_mm();
        let expected = line_height + line_height * eng.paragraph_gap_fraction;
        assert!((gap - expected).abs() < 0.01);
    }

    #[test]
    fn test_pagination_starts_new_page_when_full() {
        let eng = a4_engine();
        let line_height = eng.config().line_height_mm();
        let per_page = (eng.config().content_height_mm() / line_height).floor() as usize;
        let text = (0..per_page + 5)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let pages = eng.flow(&text, &[], &UnitMeasure).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines.len(), per_page);
        assert_eq!(pages[1].lines.len(), 5);
        // Cursor resets to the top margin on the new page.
        assert!((pages[1].lines[0].y_mm - eng.config().margins_mm.top).abs() < 0.01);
    }

    #[test]
    fn test_image_deferred_when_it_would_not_fit() {
        // Fill the page so that less than one image footprint (80 mm)
        // remains, then append one image: it must land on a new page,
        // not be clipped into the remainder.
        let eng = a4_engine();
        let line_height = eng.config().line_height_mm();
        let content_height = eng.config().content_height_mm();
        let lines_to_leave_60mm = ((content_height - 60.0) / line_height).ceil() as usize;
        let text = (0..lines_to_leave_60mm)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let images = vec![test_image(1, 400, 400)];
        let pages = eng.flow(&text, &images, &UnitMeasure).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].images.is_empty());
        assert_eq!(pages[1].images.len(), 1);
        assert!((pages[1].images[0].y_mm - eng.config().margins_mm.top).abs() < 0.01);
    }

    #[test]
    fn test_image_scaled_to_fit_and_capped() {
        let eng = a4_engine();
        // Very wide image: width clamps to content width.
        let (w, _h) = eng.render_size(&test_image(1, 4000, 400), 190.0);
        assert!(w <= 190.0);
        // Very tall image: height capped at the maximum.
        let (_w2, h2) = eng.render_size(&test_image(1, 400, 4000), 190.0);
        assert!(h2 <= eng.image_max_height_mm);
    }

    #[test]
    fn test_trailing_images_appended_sequentially() {
        let eng = a4_engine();
        let images = vec![test_image(1, 400, 400), test_image(2, 400, 400)];
        let pages = eng.flow("short text", &images, &UnitMeasure).unwrap();
        let placed: Vec<usize> = pages
            .iter()
            .flat_map(|p| p.images.iter().map(|i| i.image_index))
            .collect();
        assert_eq!(placed, vec![0, 1]);
    }
}
