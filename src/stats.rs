use itertools::Itertools;

use crate::record::{CombinedRecord, Logbook, PageRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct CleanSummary {
    pub entries: usize,
    pub dated: usize,
    pub dates_inferred: usize,
    pub with_location: usize,
    pub with_page_number: usize,
}

impl CleanSummary {
    pub fn from_entries(entries: &[PageRecord]) -> Self {
        CleanSummary {
            entries: entries.len(),
            dated: entries.iter().filter(|e| e.date().is_some()).count(),
            dates_inferred: entries.iter().filter(|e| e.date_inferred).count(),
            with_location: entries.iter().filter(|e| e.location().is_some()).count(),
            with_page_number: entries.iter().filter(|e| e.page_number.is_some()).count(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("## Cleaning\n");
        out.push_str(&format!("- Entries: {}\n", self.entries));
        out.push_str(&format!(
            "- Dated: {} ({:.1}%), inferred: {}\n",
            self.dated,
            percent(self.dated, self.entries),
            self.dates_inferred
        ));
        out.push_str(&format!(
            "- With location: {} ({:.1}%)\n",
            self.with_location,
            percent(self.with_location, self.entries)
        ));
        out.push_str(&format!("- With page number: {}\n", self.with_page_number));
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombineSummary {
    pub original_entries: usize,
    pub documents: usize,
    pub multi_page: usize,
    pub complete: usize,
    pub unassigned: usize,
    /// (type, count), most common first.
    pub by_type: Vec<(String, usize)>,
}

impl CombineSummary {
    pub fn from_logbook(logbook: &Logbook<CombinedRecord>) -> Self {
        let docs = &logbook.entries;
        let meta_count = |key: &str| {
            logbook
                .metadata
                .get(key)
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as usize
        };
        let by_type = docs
            .iter()
            .map(|d| d.document_type.as_str())
            .counts()
            .into_iter()
            .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)))
            .map(|(t, n)| (t.to_string(), n))
            .collect();

        CombineSummary {
            original_entries: meta_count("original_entries"),
            documents: docs.len(),
            multi_page: docs.iter().filter(|d| d.is_combined).count(),
            complete: docs.iter().filter(|d| d.is_complete).count(),
            unassigned: meta_count("unassigned_entries"),
            by_type,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("## Combining\n");
        out.push_str(&format!(
            "- Entries in: {}\n- Documents out: {}\n",
            self.original_entries, self.documents
        ));
        out.push_str(&format!(
            "- Multi-page documents: {}\n- Complete documents: {} ({:.1}%)\n",
            self.multi_page,
            self.complete,
            percent(self.complete, self.documents)
        ));
        out.push_str(&format!("- Unassigned short records: {}\n", self.unassigned));

        out.push_str("\n### Documents by type\n");
        let lines = self
            .by_type
            .iter()
            .map(|(t, n)| format!("- {}: {}", t, n))
            .join("\n");
        out.push_str(&lines);
        out.push('\n');
        out
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn doc(doc_type: &str, pages: usize, complete: bool) -> CombinedRecord {
        CombinedRecord {
            filename: format!("combined_doc_1_{}", doc_type),
            page_number: 1,
            date_entry: None,
            location: None,
            content: String::new(),
            raw_ocr_text: String::new(),
            confidence_score: 0.9,
            type_confidence: 0.7,
            processing_method: "ai_combined".into(),
            timestamp: "2024-03-02T09:30:00".into(),
            date_inferred: false,
            document_type: doc_type.into(),
            document_title: "Logbook Entry".into(),
            is_combined: pages > 1,
            is_complete: complete,
            source_entries: vec![],
            entry_count: pages,
        }
    }

    #[test]
    fn combine_summary_counts_types() {
        let mut book = Logbook::new(vec![
            doc("letter", 3, true),
            doc("narrative", 1, false),
            doc("letter", 2, true),
        ]);
        book.metadata.insert("original_entries".into(), Value::from(7));
        book.metadata.insert("unassigned_entries".into(), Value::from(1));

        let summary = CombineSummary::from_logbook(&book);
        assert_eq!(summary.original_entries, 7);
        assert_eq!(summary.documents, 3);
        assert_eq!(summary.multi_page, 2);
        assert_eq!(summary.complete, 2);
        assert_eq!(summary.unassigned, 1);
        assert_eq!(
            summary.by_type,
            vec![("letter".to_string(), 2), ("narrative".to_string(), 1)]
        );
        assert!(summary.render().contains("- letter: 2"));
    }

    #[test]
    fn clean_summary_of_empty_logbook() {
        let summary = CleanSummary::from_entries(&[]);
        assert_eq!(summary.entries, 0);
        assert!(summary.render().contains("Dated: 0 (0.0%)"));
    }
}
