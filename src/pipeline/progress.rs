//! Progress reporting and cooperative cancellation.
//!
//! Long-running stages (OCR in particular) can take multiple seconds per
//! page, so the pipeline reports incremental progress through a callback
//! rather than blocking silently. Cancellation is cooperative: the flag is
//! checked between page iterations and recognition invocations, never
//! mid-line.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A progress event emitted by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// The source document is being parsed
    Parsing,
    /// Native text extraction advanced to a page
    Extracting {
        /// 1-based page currently being extracted
        current_page: usize,
        /// Total pages in the document
        total_pages: usize,
    },
    /// Image-based recognition advanced on a page
    Recognizing {
        /// 1-based page currently being recognized
        current_page: usize,
        /// Total pages in the document
        total_pages: usize,
        /// Within-page progress in 0.0..=1.0, when the engine exposes it
        engine_progress: Option<f32>,
    },
    /// Text normalization is running
    Normalizing,
    /// Page flow/layout is running
    Flowing,
}

/// Callback receiving progress events.
pub type ProgressSink<'a> = dyn FnMut(ProgressEvent) + 'a;

/// Shared cooperative-cancellation flag.
///
/// Cloning shares the underlying flag; any clone can request cancellation.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a new, unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
