pub mod itinerary;
pub mod text;

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::{debug, info};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::record::{iso_timestamp, Logbook, PageRecord};

pub use itinerary::{extract_location_from_content, infer_date_from_content};
pub use text::clean_text;

/// Stage one of the pipeline: normalizes OCR text and fills in missing
/// locations and dates from the travel itinerary.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogbookCleaner;

impl LogbookCleaner {
    pub fn new() -> Self {
        LogbookCleaner
    }

    /// Cleaned copy of one page. An explicit `date_entry` is kept as-is and
    /// marked not inferred; a missing one is inferred when possible.
    pub fn clean_entry(&self, record: &PageRecord) -> PageRecord {
        let mut cleaned = record.clone();
        cleaned.content = clean_text(&record.content);
        cleaned.raw_ocr_text = clean_text(&record.raw_ocr_text);
        cleaned.page_number = record.derived_page_number();

        cleaned.location = match record.location() {
            Some(location) => Some(clean_text(location)),
            None => extract_location_from_content(&cleaned.content),
        };

        if record.date().is_some() {
            cleaned.date_inferred = false;
        } else {
            let inferred = infer_date_from_content(&cleaned.content, cleaned.location());
            if let Some(ref date) = inferred {
                debug!(filename = %record.filename, date = %date, "inferred date");
            }
            cleaned.date_inferred = inferred.is_some();
            cleaned.date_entry = inferred;
        }

        cleaned
    }

    /// Clean every entry, in order, and stamp `cleaned_date` / `cleaned_entries`.
    pub fn clean_logbook(
        &self,
        logbook: Logbook<PageRecord>,
        cleaned_at: NaiveDateTime,
    ) -> Logbook<PageRecord> {
        let mut cleaned = logbook;
        let entries = std::mem::take(&mut cleaned.entries);
        cleaned.entries = self.clean_all(entries);

        cleaned.metadata.insert(
            "cleaned_date".to_string(),
            Value::String(iso_timestamp(cleaned_at)),
        );
        cleaned
            .metadata
            .insert("cleaned_entries".to_string(), Value::from(cleaned.entries.len()));

        info!(entries = cleaned.entries.len(), "cleaned logbook");
        cleaned
    }

    #[cfg(feature = "rayon")]
    fn clean_all(&self, entries: Vec<PageRecord>) -> Vec<PageRecord> {
        entries.par_iter().map(|e| self.clean_entry(e)).collect()
    }

    #[cfg(not(feature = "rayon"))]
    fn clean_all(&self, entries: Vec<PageRecord>) -> Vec<PageRecord> {
        entries.iter().map(|e| self.clean_entry(e)).collect()
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn page(filename: &str, content: &str) -> PageRecord {
        PageRecord {
            filename: filename.to_string(),
            content: content.to_string(),
            raw_ocr_text: content.to_string(),
            confidence_score: 0.9,
            processing_method: "tesseract".to_string(),
            ..Default::default()
        }
    }

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn explicit_date_is_kept_and_not_inferred() {
        let mut record = page("IMG_0001.png", "Arrived in Tokyo by train.");
        record.date_entry = Some("1933-07-02".to_string());
        record.date_inferred = true;
        let cleaned = LogbookCleaner.clean_entry(&record);
        assert_eq!(cleaned.date_entry.as_deref(), Some("1933-07-02"));
        assert!(!cleaned.date_inferred);
    }

    #[test]
    fn missing_date_and_location_are_backfilled() {
        let record = page("IMG_0042.png", "Today I arrived in Shanghai with the crew.");
        let cleaned = LogbookCleaner.clean_entry(&record);
        assert_eq!(cleaned.location.as_deref(), Some("Shanghai"));
        assert_eq!(cleaned.date_entry.as_deref(), Some("1933-06"));
        assert!(cleaned.date_inferred);
        assert_eq!(cleaned.page_number, Some(42));
    }

    #[test]
    fn uninferable_date_stays_missing() {
        let record = page("IMG_0043.png", "A quiet day at sea.");
        let cleaned = LogbookCleaner.clean_entry(&record);
        assert_eq!(cleaned.date_entry, None);
        assert!(!cleaned.date_inferred);
        assert_eq!(cleaned.location, None);
    }

    #[test]
    fn given_location_is_cleaned_not_replaced() {
        let mut record = page("IMG_0044.png", "We reached Cairo at dusk.");
        record.location = Some("  Tokio ".to_string());
        let cleaned = LogbookCleaner.clean_entry(&record);
        assert_eq!(cleaned.location.as_deref(), Some("Tokyo"));
        assert_eq!(cleaned.date_entry.as_deref(), Some("1933-07"));
    }

    #[test]
    fn repaired_place_names_are_found() {
        let record = page("IMG_0130.png", "I arrived in Tokio on a hot afternoon.");
        let cleaned = LogbookCleaner.clean_entry(&record);
        assert_eq!(cleaned.location.as_deref(), Some("Tokyo"));
        assert_eq!(cleaned.date_entry.as_deref(), Some("1933-07"));
        assert!(cleaned.date_inferred);

        let again = LogbookCleaner.clean_entry(&cleaned);
        assert_eq!(again.location, cleaned.location);
        assert_eq!(again.date_entry, cleaned.date_entry);
    }

    #[test]
    fn clean_logbook_preserves_order_and_stamps_metadata() {
        let book = Logbook::new(vec![
            page("IMG_0003.png", "third page text"),
            page("IMG_0001.png", "first page text"),
        ]);
        let cleaned = LogbookCleaner.clean_logbook(book, fixed_time());
        let names: Vec<&str> = cleaned.entries.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, vec!["IMG_0003.png", "IMG_0001.png"]);
        assert_eq!(cleaned.metadata["cleaned_entries"], 2);
        assert_eq!(cleaned.metadata["cleaned_date"], "2024-03-01T12:00:00");
    }
}
