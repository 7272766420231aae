//! Batch conversion of multiple input files.
//!
//! Items are processed strictly serially: conversions are CPU- and
//! memory-heavy (OCR in particular), and E Ink workflows favor predictable
//! progress over throughput. One failing item never halts its siblings;
//! every item gets its own terminal outcome.
//!
//! The batch path covers the adapter formats. Paged PDF sources carry a
//! backend-specific [`crate::source::DocumentSource`] and go through
//! [`Converter::convert_source`] individually.

use crate::adapters;
use crate::error::{Error, Result};
use crate::flow::TextMeasure;
use crate::pipeline::{CancelFlag, Conversion, Converter, ProgressEvent};

/// One input file queued for conversion.
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// Display name, usually the file name
    pub name: String,
    /// Raw file bytes
    pub data: Vec<u8>,
    /// File extension used for format routing
    pub extension: String,
}

/// The terminal outcome of one batch item.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Display name of the item
    pub name: String,
    /// The item's conversion result
    pub result: Result<Conversion>,
}

/// Progress callback for batch runs: item index (0-based), item count,
/// and the inner pipeline event.
pub type BatchProgressSink<'a> = dyn FnMut(usize, usize, ProgressEvent) + 'a;

/// Convert every item in order, one outcome per item.
///
/// Cancellation is honored between items and inside each conversion;
/// items not yet started when cancellation lands are reported as
/// [`Error::Cancelled`] rather than silently dropped.
pub fn convert_all(
    converter: &mut Converter,
    items: &[BatchItem],
    measure: &dyn TextMeasure,
    progress: &mut BatchProgressSink<'_>,
    cancel: &CancelFlag,
) -> Vec<BatchOutcome> {
    let total = items.len();
    let mut outcomes: Vec<BatchOutcome> = Vec::with_capacity(total);

    for (index, item) in items.iter().enumerate() {
        if cancel.is_cancelled() {
            outcomes.push(BatchOutcome {
                name: item.name.clone(),
                result: Err(Error::Cancelled),
            });
            continue;
        }

        log::info!("converting {} ({}/{})", item.name, index + 1, total);
        let mut forward = |event: ProgressEvent| progress(index, total, event);
        let result = adapters::parse_bytes(&item.data, &item.extension).and_then(|parsed| {
            converter.convert_parsed(parsed, measure, &mut forward, cancel)
        });
        if let Err(ref err) = result {
            log::warn!("conversion of {} failed: {err}", item.name);
        }
        outcomes.push(BatchOutcome {
            name: item.name.clone(),
            result,
        });
    }
    outcomes
}
