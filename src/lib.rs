//! # inkflow
//!
//! Re-flow documents (PDF, DOCX, Markdown, CSV, XLSX) into page layouts
//! optimized for E Ink readers.
//!
//! ## Pipeline
//!
//! - **Native extraction**: positioned glyph runs are reconstructed into
//!   reading-order text with inferred spaces and paragraph breaks
//! - **Quality triage**: characteristic extraction failures (scanned pages,
//!   broken encodings, shattered ligatures) trigger the OCR fallback
//! - **OCR fallback**: pages re-rendered and recognized by an injected
//!   engine, replacing the native text wholesale
//! - **Normalization**: idempotent repair of control characters, split
//!   ligatures, and structural spacing
//! - **Page flow**: greedy measured word-wrap, pagination, and image
//!   interleaving against a device page profile
//!
//! ## Quick Start
//!
//! ```ignore
//! use inkflow::config::OutputConfig;
//! use inkflow::flow::AverageCharMetrics;
//! use inkflow::pipeline::{CancelFlag, Converter};
//!
//! # fn main() -> inkflow::Result<()> {
//! let parsed = inkflow::adapters::parse_bytes(&std::fs::read("notes.md")?, "md")?;
//! let mut converter = Converter::new(OutputConfig::default());
//! let conversion = converter.convert_parsed(
//!     parsed,
//!     &AverageCharMetrics::default(),
//!     &mut |_event| {},
//!     &CancelFlag::new(),
//! )?;
//! println!("{} output pages", conversion.pages.len());
//! # Ok(())
//! # }
//! ```
//!
//! Rendering (PDF serialization, EPUB packaging) is an external
//! collaborator's job: it consumes [`output::PaginatedDocument`] and
//! supplies the [`flow::TextMeasure`] font metrics.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Output geometry and rendering configuration
pub mod config;

// Source-document abstraction (the PDF-library boundary)
pub mod source;

// Extraction and repair stages
pub mod layout;
pub mod normalize;
pub mod ocr;
pub mod quality;

// Page flow and images
pub mod flow;
pub mod images;

// Input format adapters
pub mod adapters;

// Orchestration
pub mod batch;
pub mod pipeline;

// Output handoff
pub mod output;

// Re-exports
pub use config::OutputConfig;
pub use error::{Error, Result};
pub use pipeline::{CancelFlag, Conversion, Converter, ExtractionMethod, ProgressEvent};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as equal to each other and greater than all
    /// other values, so sorting operations never panic on NaN.
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.partial_cmp(&b).unwrap(),
        }
    }

}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
