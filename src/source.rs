//! Page source collaborator traits — the PDF-library boundary.
//!
//! The core pipeline never talks to a concrete PDF library. It consumes a
//! page abstraction that exposes positioned glyph runs for native text
//! extraction, discovered images, and page rasterization for the OCR
//! fallback path. Any backend that can produce these three views can drive
//! the pipeline.

use crate::error::Result;
use crate::images::ExtractedImage;
use image::GrayImage;

/// One positioned string fragment from a page's text layer.
///
/// Coordinates follow the PDF convention: `x`/`y` is the baseline origin
/// and Y grows upward, so a *larger* Y is *higher* on the page. Runs arrive
/// in arbitrary paint order; reconstruction into reading order is the
/// assembler's job.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    /// The text fragment as reported by the text layer
    pub text: String,
    /// Baseline X position
    pub x: f32,
    /// Baseline Y position (inverted: larger = higher on page)
    pub y: f32,
    /// Advance width of the fragment
    pub width: f32,
    /// Font size (glyph height) of the fragment
    pub font_size: f32,
}

impl GlyphRun {
    /// Create a glyph run.
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            font_size,
        }
    }

    /// X position of the right edge of this run.
    pub fn end_x(&self) -> f32 {
        self.x + self.width
    }
}

/// A single page of the source document.
pub trait PageSource {
    /// Positioned text fragments for this page, in arbitrary order.
    fn glyph_runs(&self) -> Result<Vec<GlyphRun>>;

    /// Images painted on this page.
    ///
    /// Backends that cannot enumerate images may return an empty vector.
    fn images(&self) -> Result<Vec<ExtractedImage>>;

    /// Rasterize the page to a grayscale bitmap at `scale` times the
    /// nominal page resolution. Used only by the OCR fallback path, which
    /// requires `scale >= 2.0` for reliable recognition.
    fn render_raster(&self, scale: f32) -> Result<GrayImage>;
}

/// A multi-page source document.
pub trait DocumentSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Borrow the page at `index` (0-based).
    fn page(&self, index: usize) -> Result<&dyn PageSource>;
}
