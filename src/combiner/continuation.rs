use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::patterns::{identify_document_type, round_score, DocumentType};
use crate::record::PageRecord;

pub const CONTINUATION_THRESHOLD: f64 = 0.5;
const MAX_PAGE_GAP: i64 = 5;

pub(crate) static ENDS_INCOMPLETE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z,;]\s*$").unwrap());
pub(crate) static STARTS_LOWER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]").unwrap());
static STARTS_CONNECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:and|but)\s").unwrap());
static PAGE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Page\s+\d+|^\d+\.\s*$|\(-?\d+-?\)|^-\d+-").unwrap());
static PROPER_NOUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+\b").unwrap());

/// Text that stops mid-sentence: a trailing lower-case letter, comma,
/// semicolon or an ellipsis.
pub fn ends_incomplete(content: &str) -> bool {
    ENDS_INCOMPLETE_RE.is_match(content) || content.trim_end().ends_with("...")
}

/// Whether `next` reads as the page after `prev`, with the summed evidence.
///
/// Evidence is additive: nearby page numbers, agreeing dates and places, a
/// sentence broken across the page boundary, page markers, matching document
/// types, and shared proper nouns. Pages with no text never continue.
pub fn is_continuation(prev: &PageRecord, next: &PageRecord) -> (bool, f64) {
    let content1 = prev.content.trim();
    let content2 = next.content.trim();
    if content1.is_empty() || content2.is_empty() {
        return (false, 0.0);
    }

    let mut confidence = 0.0;

    if let (Some(p1), Some(p2)) = (nonzero(prev.page_number), nonzero(next.page_number)) {
        if (p2 - p1).abs() <= MAX_PAGE_GAP {
            confidence += 0.2;
        }
    }

    match (prev.date(), next.date()) {
        (Some(d1), Some(d2)) if d1 == d2 => confidence += 0.3,
        (Some(_), None) | (None, Some(_)) => confidence += 0.1,
        _ => {}
    }

    if let (Some(l1), Some(l2)) = (prev.location(), next.location()) {
        let (l1, l2) = (l1.to_lowercase(), l2.to_lowercase());
        if l1 == l2 {
            confidence += 0.2;
        } else if shares_word(&l1, &l2) {
            confidence += 0.1;
        }
    }

    if ends_incomplete(content1) {
        confidence += 0.3;
    }

    if STARTS_LOWER_RE.is_match(content2) || STARTS_CONNECTIVE_RE.is_match(content2) {
        confidence += 0.3;
    }

    if PAGE_MARKER_RE.is_match(content1) {
        confidence += 0.2;
    }

    let (type1, _) = identify_document_type(content1);
    let (type2, _) = identify_document_type(content2);
    if type1 == type2 && type1 != DocumentType::Unknown {
        confidence += 0.2;
    }

    confidence += proper_noun_overlap(content1, content2) * 0.2;

    let confidence = round_score(confidence);
    (confidence >= CONTINUATION_THRESHOLD, confidence)
}

fn nonzero(page: Option<i64>) -> Option<i64> {
    page.filter(|p| *p != 0)
}

/// Either location mentions a word of the other ("Port Said" / "Said").
fn shares_word(l1: &str, l2: &str) -> bool {
    l1.split_whitespace().any(|w| l2.contains(w)) || l2.split_whitespace().any(|w| l1.contains(w))
}

/// Jaccard overlap of capitalized words.
fn proper_noun_overlap(a: &str, b: &str) -> f64 {
    let words_a: HashSet<&str> = PROPER_NOUN_RE.find_iter(a).map(|m| m.as_str()).collect();
    let words_b: HashSet<&str> = PROPER_NOUN_RE.find_iter(b).map(|m| m.as_str()).collect();
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }
    let shared = words_a.intersection(&words_b).count();
    let total = words_a.union(&words_b).count();
    shared as f64 / total as f64
}

// ── Tests ──
