//! Post-processing for a digitized 1930s travel logbook.
//!
//! Two stages share this crate: [`cleaner`] repairs OCR text and backfills
//! dates and places, [`combiner`] stitches consecutive pages into documents.

pub mod cleaner;
pub mod combiner;
pub mod error;
pub mod logbook;
pub mod record;
pub mod settings;
pub mod stats;

pub use cleaner::LogbookCleaner;
pub use combiner::DocumentCombiner;
pub use error::{LogbookError, Result};
pub use record::{CombinedRecord, Logbook, PageRecord};
pub use settings::Settings;
