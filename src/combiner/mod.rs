pub mod continuation;
pub mod grouping;
pub mod merge;
pub mod patterns;
pub mod title;

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::{info, warn};

use crate::record::{iso_timestamp, CombinedRecord, Logbook, PageRecord};
use crate::settings::Settings;
use grouping::{build_group, plan_groups, GroupRules};
use patterns::round_score;

pub use continuation::is_continuation;
pub use grouping::DocumentGroup;
pub use merge::combine_entries;
pub use patterns::{identify_document_type, DocumentType};
pub use title::{create_document_title, is_document_complete};

pub const DEFAULT_LOOKAHEAD: usize = 10;
pub const DEFAULT_MIN_CONTENT_LEN: usize = 20;

/// Stage two of the pipeline: stitches cleaned pages back into documents.
#[derive(Debug, Clone)]
pub struct DocumentCombiner {
    /// How many records after a group's first page may join it.
    pub lookahead: usize,
    /// Shortest trimmed content that may open a group.
    pub min_content_len: usize,
    /// Emit short records no group absorbed as single-page documents.
    pub keep_short_fragments: bool,
}

impl Default for DocumentCombiner {
    fn default() -> Self {
        DocumentCombiner {
            lookahead: DEFAULT_LOOKAHEAD,
            min_content_len: DEFAULT_MIN_CONTENT_LEN,
            keep_short_fragments: false,
        }
    }
}

/// Groups ready for output plus the filenames of records left out.
struct Assembly {
    groups: Vec<DocumentGroup>,
    dropped: Vec<String>,
}

impl DocumentCombiner {
    pub fn from_settings(settings: &Settings) -> Self {
        DocumentCombiner {
            lookahead: settings.lookahead,
            min_content_len: settings.min_content_len,
            keep_short_fragments: settings.keep_short_fragments,
        }
    }

    /// Group `records` (any order) into documents, in page order.
    pub fn create_document_groups(&self, records: &[PageRecord]) -> Vec<DocumentGroup> {
        self.assemble(records).groups
    }

    /// Replace page entries with combined documents and stamp the run metadata.
    pub fn process_logbook(
        &self,
        logbook: Logbook<PageRecord>,
        combined_at: NaiveDateTime,
    ) -> Logbook<CombinedRecord> {
        let original_entries = logbook.entries.len();
        let Assembly { groups, dropped } = self.assemble(&logbook.entries);
        let timestamp = iso_timestamp(combined_at);

        let records: Vec<CombinedRecord> = groups
            .into_iter()
            .map(|group| to_combined_record(group, &timestamp))
            .collect();
        let documents_combined = records.iter().filter(|r| r.is_combined).count();

        let mut combined = logbook.with_entries(records);
        let metadata = &mut combined.metadata;
        metadata.insert("combined_date".to_string(), Value::String(timestamp));
        metadata.insert("original_entries".to_string(), Value::from(original_entries));
        metadata.insert(
            "combined_entries".to_string(),
            Value::from(combined.entries.len()),
        );
        metadata.insert(
            "documents_combined".to_string(),
            Value::from(documents_combined),
        );
        metadata.insert("unassigned_entries".to_string(), Value::from(dropped.len()));

        info!(
            original = original_entries,
            documents = combined.entries.len(),
            multi_page = documents_combined,
            unassigned = dropped.len(),
            "combined logbook"
        );
        combined
    }

    fn rules(&self) -> GroupRules {
        GroupRules {
            lookahead: self.lookahead,
            min_content_len: self.min_content_len,
        }
    }

    fn assemble(&self, records: &[PageRecord]) -> Assembly {
        let mut sorted: Vec<&PageRecord> = records.iter().collect();
        sorted.sort_by_key(|r| r.page_number.unwrap_or(0));

        let plan = plan_groups(&sorted, &self.rules());
        let mut members = plan.groups;
        let mut dropped = Vec::new();

        for &i in &plan.unassigned {
            let record = sorted[i];
            if self.keep_short_fragments && !record.content.trim().is_empty() {
                members.push(vec![i]);
            } else {
                warn!(
                    filename = %record.filename,
                    chars = record.content.trim().chars().count(),
                    "short record not part of any document; leaving it out"
                );
                dropped.push(record.filename.clone());
            }
        }
        members.sort_by_key(|m| m[0]);

        let groups = members.iter().map(|m| build_group(&sorted, m)).collect();
        Assembly { groups, dropped }
    }
}

fn to_combined_record(group: DocumentGroup, timestamp: &str) -> CombinedRecord {
    let first = &group.entries[0];
    let page_number = first.page_number.unwrap_or(0);
    let mean_confidence = group
        .entries
        .iter()
        .map(|e| e.confidence_score)
        .sum::<f64>()
        / group.entry_count() as f64;

    CombinedRecord {
        filename: format!("combined_{}", group.id),
        page_number,
        date_entry: group.date_entry.clone(),
        location: group.location.clone(),
        raw_ocr_text: String::new(),
        confidence_score: round_score(mean_confidence),
        type_confidence: group.type_confidence,
        processing_method: "ai_combined".to_string(),
        timestamp: timestamp.to_string(),
        date_inferred: group.date_inferred,
        document_type: group.document_type.to_string(),
        document_title: group.title.clone(),
        is_combined: group.is_combined(),
        is_complete: group.is_complete,
        source_entries: group.entries.iter().map(|e| e.filename.clone()).collect(),
        entry_count: group.entry_count(),
        content: group.combined_content,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn page(n: i64, content: &str, confidence: f64) -> PageRecord {
        PageRecord {
            filename: format!("IMG_{:04}.png", n),
            page_number: Some(n),
            content: content.to_string(),
            raw_ocr_text: content.to_string(),
            confidence_score: confidence,
            processing_method: "tesseract".to_string(),
            ..Default::default()
        }
    }

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn letter_pages() -> Vec<PageRecord> {
        vec![
            page(
                12,
                "Dear Mr Harris, we reached Southampton on the morning tide and",
                0.9,
            ),
            page(13, "the crossing was rougher than any of us expected,", 0.8),
            page(14, "but the cameras survived. Yours sincerely, E. K. Gann", 0.7),
        ]
    }

    #[test]
    fn three_page_letter_becomes_one_document() {
        let groups = DocumentCombiner::default().create_document_groups(&letter_pages());
        assert_eq!(groups.len(), 1);
        let letter = &groups[0];
        assert_eq!(letter.document_type, DocumentType::Letter);
        assert_eq!(letter.entry_count(), 3);
        assert!(letter.is_complete);
        assert_eq!(letter.title, "Letter to Mr Harris");
        assert_eq!(letter.id, "doc_12_letter");
    }

    #[test]
    fn records_are_grouped_in_page_order() {
        let mut pages = letter_pages();
        pages.reverse();
        let groups = DocumentCombiner::default().create_document_groups(&pages);
        let sources: Vec<&str> = groups[0].entries.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(sources, vec!["IMG_0012.png", "IMG_0013.png", "IMG_0014.png"]);
    }

    #[test]
    fn process_logbook_shapes_output_and_metadata() {
        let mut pages = letter_pages();
        pages.push(page(90, "Page 9", 0.5));
        let book = Logbook::new(pages);
        let out = DocumentCombiner::default().process_logbook(book, fixed_time());

        assert_eq!(out.entries.len(), 1);
        let doc = &out.entries[0];
        assert_eq!(doc.filename, "combined_doc_12_letter");
        assert_eq!(doc.page_number, 12);
        assert_eq!(doc.processing_method, "ai_combined");
        assert_eq!(doc.raw_ocr_text, "");
        assert_eq!(doc.confidence_score, 0.8);
        assert_eq!(doc.document_type, "letter");
        assert!(doc.is_combined);
        assert_eq!(doc.entry_count, 3);
        assert_eq!(doc.timestamp, "2024-03-02T09:30:00");

        assert_eq!(out.metadata["original_entries"], 4);
        assert_eq!(out.metadata["combined_entries"], 1);
        assert_eq!(out.metadata["documents_combined"], 1);
        assert_eq!(out.metadata["unassigned_entries"], 1);
        assert_eq!(out.metadata["combined_date"], "2024-03-02T09:30:00");
    }

    #[test]
    fn short_fragments_can_be_kept() {
        let mut pages = letter_pages();
        pages.push(page(90, "Page 9", 0.5));
        let combiner = DocumentCombiner {
            keep_short_fragments: true,
            ..Default::default()
        };
        let out = combiner.process_logbook(Logbook::new(pages), fixed_time());
        assert_eq!(out.entries.len(), 2);
        assert_eq!(out.entries[1].source_entries, vec!["IMG_0090.png"]);
        assert!(!out.entries[1].is_combined);
        assert_eq!(out.metadata["unassigned_entries"], 0);
    }

    #[test]
    fn empty_logbook_produces_no_documents() {
        let out = DocumentCombiner::default().process_logbook(Logbook::new(vec![]), fixed_time());
        assert!(out.entries.is_empty());
        assert_eq!(out.metadata["original_entries"], 0);
        assert_eq!(out.metadata["documents_combined"], 0);
    }

    #[test]
    fn combining_is_deterministic() {
        let combiner = DocumentCombiner::default();
        let first = combiner.process_logbook(Logbook::new(letter_pages()), fixed_time());
        let second = combiner.process_logbook(Logbook::new(letter_pages()), fixed_time());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
