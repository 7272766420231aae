//! Error types for the document re-flow pipeline.
//!
//! Per-page failures (extraction, recognition) are non-fatal: the pipeline
//! logs them and continues with a degraded result. Whole-document failures
//! (unsupported format, empty input, no extractable content) propagate to
//! the caller as typed errors.

/// Result type alias for re-flow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document conversion.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File extension does not map to a known format adapter
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Zero-byte or whitespace-only input
    #[error("Empty input: document contains no data")]
    EmptyInput,

    /// A single page's text/image extraction failed (non-fatal at pipeline level)
    #[error("Extraction failed on page {page}: {reason}")]
    Extraction {
        /// 1-based page number where extraction failed
        page: usize,
        /// Reason for the failure
        reason: String,
    },

    /// The recognition engine errored on a page (non-fatal at pipeline level)
    #[error("Recognition failed on page {page}: {reason}")]
    Recognition {
        /// 1-based page number where recognition failed
        page: usize,
        /// Reason for the failure
        reason: String,
    },

    /// After all fallbacks, the document text is still empty
    #[error("No extractable content: document produced no text after all fallbacks")]
    NoContentExtracted,

    /// Structurally corrupt input for an otherwise supported format
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Conversion was cancelled cooperatively
    #[error("Conversion cancelled")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or processing error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_message() {
        let err = Error::UnsupportedFormat("pptx".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Unsupported format"));
        assert!(msg.contains("pptx"));
    }

    #[test]
    fn test_extraction_error_carries_page() {
        let err = Error::Extraction {
            page: 7,
            reason: "bad content stream".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("page 7"));
        assert!(msg.contains("bad content stream"));
    }

    #[test]
    fn test_no_content_message_is_actionable() {
        let msg = format!("{}", Error::NoContentExtracted);
        assert!(msg.contains("No extractable content"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
