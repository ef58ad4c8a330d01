use std::sync::LazyLock;

use regex::Regex;

use super::continuation::{ends_incomplete, STARTS_LOWER_RE};
use crate::record::PageRecord;

static PAGE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:Page\s+)?\d+\.?\s*").unwrap());
static DASH_NUMBER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+-?\s*").unwrap());
static PAREN_NUMBER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d+\)\s*").unwrap());
static CONNECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:and|but|however|therefore|thus|so|in|of|the|that|which)\s+").unwrap()
});
static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());
static HSPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\S\n]+").unwrap());

/// Merge page texts (already in page order) into one document.
///
/// A page that picks up a sentence the previous page left open is glued on
/// with a single space; anything else starts a new paragraph.
pub fn combine_entries(records: &[PageRecord]) -> String {
    match records {
        [] => return String::new(),
        [only] => return only.content.clone(),
        _ => {}
    }

    let mut fragments: Vec<String> = Vec::new();
    for record in records {
        let content = strip_page_marker(record.content.trim());
        if content.is_empty() {
            continue;
        }

        if let Some(last) = fragments.last_mut() {
            let picks_up = STARTS_LOWER_RE.is_match(&content) || CONNECTIVE_RE.is_match(&content);
            if ends_incomplete(last) && picks_up {
                let joined = format!("{} {}", last.trim_end(), content);
                *last = joined;
                continue;
            }
        }
        fragments.push(content);
    }

    let joined = fragments.join("\n\n");
    let joined = BLANK_RUN_RE.replace_all(&joined, "\n\n");
    let joined = HSPACE_RE.replace_all(&joined, " ");
    joined.trim().to_string()
}

/// Drop a leading "Page 4", "12.", "-3-" or "(2)" marker.
fn strip_page_marker(content: &str) -> String {
    let content = PAGE_PREFIX_RE.replace(content, "");
    let content = DASH_NUMBER_PREFIX_RE.replace(&content, "");
    let content = PAREN_NUMBER_PREFIX_RE.replace(&content, "");
    content.trim().to_string()
}

// ── Tests ──
