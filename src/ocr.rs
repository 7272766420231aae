//! OCR fallback coordination.
//!
//! When native extraction quality is poor, the document is re-read page by
//! page: each page is rasterized at high resolution and submitted to an
//! external recognition engine. The engine is an injected collaborator —
//! this module only decides how and when to drive it, never how characters
//! are recognized.
//!
//! Recognition engines are CPU-heavy and typically support a single
//! concurrent job, so pages are processed strictly sequentially and one
//! engine instance is reused for the whole run, then released.

use crate::error::{Error, Result};
use crate::pipeline::{CancelFlag, ProgressEvent, ProgressSink};
use crate::source::DocumentSource;
use image::GrayImage;

/// Result of recognizing one page image.
#[derive(Debug, Clone)]
pub struct Recognition {
    /// Recognized text
    pub text: String,
    /// Engine confidence in 0.0..=100.0
    pub confidence: f32,
}

/// Speed/accuracy trade-off requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecognitionProfile {
    /// Fastest settings, lowest accuracy
    Fast,
    /// Default trade-off
    #[default]
    Balanced,
    /// Highest accuracy, slowest
    Accurate,
}

/// External text-recognition engine collaborator.
///
/// Implementations wrap whatever OCR backend is available. The coordinator
/// calls `recognize` once per page and `shutdown` once per run; engines
/// should hold their models loaded between calls and release them on
/// shutdown to bound memory.
pub trait RecognitionEngine {
    /// Recognize text in a rasterized page.
    ///
    /// `progress` receives within-page completion in 0.0..=1.0 when the
    /// backend exposes it; engines without sub-progress may ignore it.
    fn recognize(
        &mut self,
        raster: &GrayImage,
        language: &str,
        profile: RecognitionProfile,
        progress: &mut dyn FnMut(f32),
    ) -> Result<Recognition>;

    /// Release engine resources. Called at the end of a run and on
    /// teardown; must be safe to call more than once.
    fn shutdown(&mut self) {}
}

/// Re-renders pages to images and invokes the recognition engine
/// page-by-page, producing a replacement document text.
pub struct FallbackCoordinator {
    engine: Box<dyn RecognitionEngine>,
    language: String,
    profile: RecognitionProfile,
    /// Rasterization scale relative to nominal page resolution. Values
    /// below 2.0 measurably hurt recognition accuracy.
    raster_scale: f32,
}

impl FallbackCoordinator {
    /// Create a coordinator owning the given engine for one run.
    pub fn new(engine: Box<dyn RecognitionEngine>, language: &str) -> Self {
        Self {
            engine,
            language: language.to_string(),
            profile: RecognitionProfile::default(),
            raster_scale: 2.0,
        }
    }

    /// Set the recognition quality profile.
    pub fn with_profile(mut self, profile: RecognitionProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set the rasterization scale (clamped to at least 2.0).
    pub fn with_raster_scale(mut self, scale: f32) -> Self {
        self.raster_scale = scale.max(2.0);
        self
    }

    /// Recognize every page of `source` in order and return the combined
    /// document text, pages separated by paragraph breaks.
    ///
    /// Failure on one page is non-fatal: the page contributes an empty
    /// string and processing continues — a partially recognized document is
    /// more useful than none. Cancellation is honored between pages.
    pub fn run(
        &mut self,
        source: &dyn DocumentSource,
        progress: &mut ProgressSink<'_>,
        cancel: &CancelFlag,
    ) -> Result<String> {
        let total_pages = source.page_count();
        let mut pages: Vec<String> = Vec::with_capacity(total_pages);

        for index in 0..total_pages {
            if cancel.is_cancelled() {
                self.engine.shutdown();
                return Err(Error::Cancelled);
            }
            let page_number = index + 1;
            progress(ProgressEvent::Recognizing {
                current_page: page_number,
                total_pages,
                engine_progress: None,
            });

            let text = match self.recognize_page(source, index, total_pages, progress) {
                Ok(recognition) => {
                    log::debug!(
                        "recognized page {page_number}/{total_pages}: {} chars, confidence {:.1}",
                        recognition.text.len(),
                        recognition.confidence
                    );
                    recognition.text
                },
                Err(err) => {
                    log::warn!("recognition failed on page {page_number}: {err}");
                    String::new()
                },
            };
            pages.push(text);
        }

        self.engine.shutdown();
        Ok(pages.join("\n\n").trim().to_string())
    }

    fn recognize_page(
        &mut self,
        source: &dyn DocumentSource,
        index: usize,
        total_pages: usize,
        progress: &mut ProgressSink<'_>,
    ) -> Result<Recognition> {
        let page_number = index + 1;
        let raster = source
            .page(index)?
            .render_raster(self.raster_scale)
            .map_err(|e| Error::Recognition {
                page: page_number,
                reason: format!("rasterization failed: {e}"),
            })?;

        let mut forward = |fraction: f32| {
            progress(ProgressEvent::Recognizing {
                current_page: page_number,
                total_pages,
                engine_progress: Some(fraction),
            });
        };
        self.engine
            .recognize(&raster, &self.language, self.profile, &mut forward)
            .map_err(|e| Error::Recognition {
                page: page_number,
                reason: e.to_string(),
            })
    }
}

impl Drop for FallbackCoordinator {
    fn drop(&mut self) {
        // Engines hold large models; release promptly even on early exits.
        self.engine.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::ExtractedImage;
    use crate::source::{GlyphRun, PageSource};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct StubPage;

    impl PageSource for StubPage {
        fn glyph_runs(&self) -> Result<Vec<GlyphRun>> {
            Ok(vec![])
        }
        fn images(&self) -> Result<Vec<ExtractedImage>> {
            Ok(vec![])
        }
        fn render_raster(&self, scale: f32) -> Result<GrayImage> {
            assert!(scale >= 2.0);
            Ok(GrayImage::new(10, 10))
        }
    }

    struct StubDocument {
        pages: Vec<StubPage>,
    }

    impl DocumentSource for StubDocument {
        fn page_count(&self) -> usize {
            self.pages.len()
        }
        fn page(&self, index: usize) -> Result<&dyn PageSource> {
            Ok(&self.pages[index])
        }
    }

    struct ScriptedEngine {
        responses: Vec<Result<Recognition>>,
        calls: Rc<RefCell<usize>>,
        shutdowns: Rc<RefCell<usize>>,
    }

    impl RecognitionEngine for ScriptedEngine {
        fn recognize(
            &mut self,
            _raster: &GrayImage,
            _language: &str,
            _profile: RecognitionProfile,
            progress: &mut dyn FnMut(f32),
        ) -> Result<Recognition> {
            progress(0.5);
            progress(1.0);
            *self.calls.borrow_mut() += 1;
            self.responses.remove(0)
        }

        fn shutdown(&mut self) {
            *self.shutdowns.borrow_mut() += 1;
        }
    }

    fn ok(text: &str) -> Result<Recognition> {
        Ok(Recognition {
            text: text.to_string(),
            confidence: 90.0,
        })
    }

    #[test]
    fn test_pages_recognized_in_order_and_joined() {
        let calls = Rc::new(RefCell::new(0));
        let shutdowns = Rc::new(RefCell::new(0));
        let engine = ScriptedEngine {
            responses: vec![ok("page one"), ok("page two")],
            calls: calls.clone(),
            shutdowns: shutdowns.clone(),
        };
        let doc = StubDocument {
            pages: vec![StubPage, StubPage],
        };
        let mut coordinator = FallbackCoordinator::new(Box::new(engine), "eng");
        let text = coordinator
            .run(&doc, &mut |_| {}, &CancelFlag::new())
            .unwrap();
        assert_eq!(text, "page one\n\npage two");
        assert_eq!(*calls.borrow(), 2);
        // Once at end of run; Drop fires a second, harmless shutdown later.
        assert!(*shutdowns.borrow() >= 1);
    }

    #[test]
    fn test_page_failure_degrades_not_aborts() {
        let calls = Rc::new(RefCell::new(0));
        let shutdowns = Rc::new(RefCell::new(0));
        let engine = ScriptedEngine {
            responses: vec![
                ok("first"),
                Err(Error::InvalidDocument("engine crash".to_string())),
                ok("third"),
            ],
            calls: calls.clone(),
            shutdowns,
        };
        let doc = StubDocument {
            pages: vec![StubPage, StubPage, StubPage],
        };
        let mut coordinator = FallbackCoordinator::new(Box::new(engine), "eng");
        let text = coordinator
            .run(&doc, &mut |_| {}, &CancelFlag::new())
            .unwrap();
        // Failed page contributes an empty string; the join collapses it
        // into the surrounding separators.
        assert!(text.starts_with("first"));
        assert!(text.ends_with("third"));
        assert_eq!(*calls.borrow(), 3);
    }

    #[test]
    fn test_cancellation_checked_between_pages() {
        let engine = ScriptedEngine {
            responses: vec![ok("never used")],
            calls: Rc::new(RefCell::new(0)),
            shutdowns: Rc::new(RefCell::new(0)),
        };
        let doc = StubDocument {
            pages: vec![StubPage],
        };
        let cancel = CancelFlag::new();
        cancel.cancel();
        let mut coordinator = FallbackCoordinator::new(Box::new(engine), "eng");
        let result = coordinator.run(&doc, &mut |_| {}, &cancel);
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn test_engine_sub_progress_forwarded() {
        let engine = ScriptedEngine {
            responses: vec![ok("text")],
            calls: Rc::new(RefCell::new(0)),
            shutdowns: Rc::new(RefCell::new(0)),
        };
        let doc = StubDocument {
            pages: vec![StubPage],
        };
        let mut seen = Vec::new();
        let mut coordinator = FallbackCoordinator::new(Box::new(engine), "eng");
        coordinator
            .run(
                &doc,
                &mut |event| {
                    if let ProgressEvent::Recognizing {
                        engine_progress: Some(f),
                        ..
                    } = event
                    {
                        seen.push(f);
                    }
                },
                &CancelFlag::new(),
            )
            .unwrap();
        assert_eq!(seen, vec![0.5, 1.0]);
    }
}
