use tracing::debug;

use super::continuation::is_continuation;
use super::merge::combine_entries;
use super::patterns::{identify_document_type, DocumentType};
use super::title::{create_document_title, is_document_complete};
use crate::record::PageRecord;

/// One or more consecutive pages that form a single logical document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentGroup {
    pub id: String,
    pub document_type: DocumentType,
    pub title: String,
    pub date_entry: Option<String>,
    pub location: Option<String>,
    pub entries: Vec<PageRecord>,
    pub combined_content: String,
    pub is_complete: bool,
    /// How sure the classifier is about `document_type`.
    pub type_confidence: f64,
    pub date_inferred: bool,
}

impl DocumentGroup {
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_combined(&self) -> bool {
        self.entries.len() > 1
    }
}

/// Where the builder is with the group it is currently working on.
#[derive(Debug)]
enum GroupState {
    /// No open group; looking for the next record that may start one.
    Seeking,
    /// A group is open and absorbing continuations.
    Extending {
        members: Vec<usize>,
        cursor: usize,
        window_end: usize,
        misses: usize,
    },
    /// The group is final.
    Closed(Vec<usize>),
}

/// Indices (into the page-sorted records) of each group, plus the records no
/// group took.
#[derive(Debug, Default)]
pub(crate) struct GroupPlan {
    pub groups: Vec<Vec<usize>>,
    pub unassigned: Vec<usize>,
}

pub(crate) struct GroupRules {
    pub lookahead: usize,
    pub min_content_len: usize,
}

impl GroupRules {
    fn can_open(&self, record: &PageRecord) -> bool {
        record.content.trim().chars().count() >= self.min_content_len
    }
}

/// Walk the page-sorted records once and chain continuations into groups.
///
/// A short record never opens a group but may be absorbed into one. A
/// single-page group closes on its first failed candidate; a longer group
/// closes after two failures in a row or when the look-ahead window runs out.
pub(crate) fn plan_groups(sorted: &[&PageRecord], rules: &GroupRules) -> GroupPlan {
    let mut used = vec![false; sorted.len()];
    let mut plan = GroupPlan::default();
    let mut next_anchor = 0;
    let mut state = GroupState::Seeking;

    loop {
        state = match state {
            GroupState::Seeking => {
                let anchor = (next_anchor..sorted.len())
                    .find(|&i| !used[i] && rules.can_open(sorted[i]));
                let Some(anchor) = anchor else {
                    break;
                };
                used[anchor] = true;
                next_anchor = anchor + 1;
                GroupState::Extending {
                    members: vec![anchor],
                    cursor: anchor + 1,
                    window_end: (anchor + 1 + rules.lookahead).min(sorted.len()),
                    misses: 0,
                }
            }
            GroupState::Extending {
                mut members,
                cursor,
                window_end,
                mut misses,
            } => {
                let candidate = (cursor..window_end).find(|&j| !used[j]);
                match candidate {
                    None => GroupState::Closed(members),
                    Some(j) => {
                        let last = members[members.len() - 1];
                        let (continues, confidence) = is_continuation(sorted[last], sorted[j]);
                        debug!(
                            prev = %sorted[last].filename,
                            next = %sorted[j].filename,
                            confidence,
                            continues,
                            "continuation check"
                        );
                        if continues {
                            used[j] = true;
                            members.push(j);
                            misses = 0;
                        } else {
                            misses += 1;
                        }

                        let single_miss = members.len() == 1 && misses > 0;
                        if single_miss || misses >= 2 {
                            GroupState::Closed(members)
                        } else {
                            GroupState::Extending {
                                members,
                                cursor: j + 1,
                                window_end,
                                misses,
                            }
                        }
                    }
                }
            }
            GroupState::Closed(members) => {
                plan.groups.push(members);
                GroupState::Seeking
            }
        };
    }

    plan.unassigned = (0..sorted.len()).filter(|&i| !used[i]).collect();
    plan
}

/// Merge the member pages and derive type, title, date and location.
pub(crate) fn build_group(sorted: &[&PageRecord], members: &[usize]) -> DocumentGroup {
    let entries: Vec<PageRecord> = members.iter().map(|&i| sorted[i].clone()).collect();
    let combined_content = combine_entries(&entries);
    let (document_type, type_confidence) = identify_document_type(&combined_content);

    let dated = entries.iter().find(|e| e.date().is_some());
    let date_entry = dated.and_then(|e| e.date()).map(str::to_string);
    let date_inferred = dated.map(|e| e.date_inferred).unwrap_or(false);
    let location = entries
        .iter()
        .find_map(|e| e.location())
        .map(str::to_string);

    let anchor = members[0];
    let anchor_page = sorted[anchor].page_number.unwrap_or(anchor as i64);
    let id = format!("doc_{}_{}", anchor_page, document_type);

    let title = create_document_title(
        document_type,
        &combined_content,
        location.as_deref(),
        date_entry.as_deref(),
    );
    let is_complete = is_document_complete(document_type, &combined_content);

    DocumentGroup {
        id,
        document_type,
        title,
        date_entry,
        location,
        entries,
        combined_content,
        is_complete,
        type_confidence,
        date_inferred,
    }
}

// ── Tests ──
