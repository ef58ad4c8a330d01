use std::fmt;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Letter,
    Telegram,
    Report,
    List,
    Narrative,
    Unknown,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Letter => "letter",
            DocumentType::Telegram => "telegram",
            DocumentType::Report => "report",
            DocumentType::List => "list",
            DocumentType::Narrative => "narrative",
            DocumentType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct PatternSet {
    start: &'static [&'static str],
    end: &'static [&'static str],
    continuation: &'static [&'static str],
}

const LETTER: PatternSet = PatternSet {
    start: &[
        r"^.*(?:House|Street|Lane|Road),?\s*$",
        r"^\d{1,2}(?:st|nd|rd|th)?\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)[,\s]+\d{4}",
        r"^Dear\s+(?:Mr|Mrs|Miss|Dr|Professor)\s+\w+",
        r"^\w+\s+\w+,\s*Esq\.",
    ],
    end: &[
        r"(?:Yours\s+(?:sincerely|truly|faithfully)|Sincerely|Best\s+regards|Kind\s+regards),?\s*$",
        r"^[A-Z]\.\s*[A-Z]\.\s*\w+\s*$",
        r"^[A-Z]{2,4}/[A-Z]{2,4}\s*$",
    ],
    continuation: &[r"\.\.\.$", r"[a-z]\s*$", r"[,;]\s*$"],
};

const TELEGRAM: PatternSet = PatternSet {
    start: &[
        r"^[A-Z]+,\s+[A-Z]+\.\s+\d{1,2}",
        r"^[A-Z]+\s+[A-Z]+\s+\d{1,2}",
        r"^GANNGOR|^NLT|^CHGO",
    ],
    end: &[r"^[A-Z]+\s*$", r"Stop\.\s*$", r"Love,?\s*$"],
    continuation: &[r"Stop\s*$", r"[a-z]\s*$"],
};

const REPORT: PatternSet = PatternSet {
    start: &[
        r"^(?:GENERAL|POLITICAL|ECONOMIC|TECHNICAL)\s+(?:SITUATION|REPORT|ANALYSIS)",
        r"^(?:Page|Section)\s+\d+",
        r"^PROSPECTS\s+FOR\s+THE\s+FUTURE",
        r"^\d+\.\s+[A-Z]",
    ],
    end: &[r"^(?:End\s+of\s+)?(?:Report|Section|Chapter)", r"^\*\*\*\s*$"],
    continuation: &[r"\.\.\.$", r"[a-z]\s*$", r":\s*$"],
};

const LIST: PatternSet = PatternSet {
    start: &[
        r"^LIST\s+OF\s+",
        r"^\(\d+\)",
        r"^\d+\.",
        r"^[A-Z]-No\.\s+\d+",
        r"^PLACES\s+VISITED",
    ],
    end: &[r"^END\s+OF\s+LIST", r"^\*Note:"],
    continuation: &[r"^\d+\s*$", r"^[A-Z]\s*$", r"^\(\d+\)\s*$"],
};

const NARRATIVE: PatternSet = PatternSet {
    start: &[
        r"^I\s+(?:arrived|met|visited|went|saw)",
        r"^The\s+(?:journey|trip|visit)",
        r"^During\s+(?:my|the|this)",
    ],
    end: &[r"\.\s*$"],
    continuation: &[r"[a-z]\s*$", r"[,;]\s*$", r"\band\s*$"],
};

struct CompiledPatterns {
    start: Vec<Regex>,
    end: Vec<Regex>,
    continuation: Vec<Regex>,
}

/// Type patterns are matched case-insensitively with `^`/`$` anchored to lines.
fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .multi_line(true)
                .build()
                .unwrap()
        })
        .collect()
}

fn compile(set: &PatternSet) -> CompiledPatterns {
    CompiledPatterns {
        start: compile_all(set.start),
        end: compile_all(set.end),
        continuation: compile_all(set.continuation),
    }
}

/// Scoring order. Ties go to the earlier type.
static COMPILED: LazyLock<Vec<(DocumentType, CompiledPatterns)>> = LazyLock::new(|| {
    vec![
        (DocumentType::Letter, compile(&LETTER)),
        (DocumentType::Telegram, compile(&TELEGRAM)),
        (DocumentType::Report, compile(&REPORT)),
        (DocumentType::List, compile(&LIST)),
        (DocumentType::Narrative, compile(&NARRATIVE)),
    ]
});

static LETTER_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,2}(?:st|nd|rd|th)?\s+(?:january|february|march|april|may|june|july|august|september|october|november|december)").unwrap()
});
static NUMBERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\d+\.|\(\d+\)").unwrap());

const START_WEIGHT: f64 = 0.4;
const END_WEIGHT: f64 = 0.3;
const CONTINUATION_WEIGHT: f64 = 0.2;
const MIN_TYPE_SCORE: f64 = 0.3;

/// Classify `content` as one of the known document types.
///
/// Each candidate collects weight for a matching start, end and continuation
/// pattern (one of each at most) plus a few type-specific hints, capped at
/// 1.0. The highest score wins, earliest type on ties; anything below 0.3 is
/// `Unknown` carrying its best score.
pub fn identify_document_type(content: &str) -> (DocumentType, f64) {
    if content.trim().is_empty() {
        return (DocumentType::Unknown, 0.0);
    }

    let lower = content.to_lowercase();
    let word_count = content.split_whitespace().count();

    let mut best = (DocumentType::Unknown, f64::MIN);
    for (doc_type, patterns) in COMPILED.iter() {
        let mut score = 0.0;
        if patterns.start.iter().any(|re| re.is_match(content)) {
            score += START_WEIGHT;
        }
        if patterns.end.iter().any(|re| re.is_match(content)) {
            score += END_WEIGHT;
        }
        if patterns.continuation.iter().any(|re| re.is_match(content)) {
            score += CONTINUATION_WEIGHT;
        }
        score += type_hints(*doc_type, content, &lower, word_count);
        let score = round_score(score.min(1.0));

        if score > best.1 {
            best = (*doc_type, score);
        }
    }

    if best.1 < MIN_TYPE_SCORE {
        (DocumentType::Unknown, best.1)
    } else {
        best
    }
}

fn type_hints(doc_type: DocumentType, content: &str, lower: &str, word_count: usize) -> f64 {
    let mut score = 0.0;
    match doc_type {
        DocumentType::Letter => {
            if contains_any(lower, &["dear", "sincerely", "yours truly", "regards"]) {
                score += 0.1;
            }
            if LETTER_DATE_RE.is_match(lower) {
                score += 0.1;
            }
        }
        DocumentType::Telegram => {
            if contains_any(lower, &["stop", "cable", "wire", "ganngor", "chgo"]) {
                score += 0.2;
            }
            if word_count < 100 {
                score += 0.1;
            }
        }
        DocumentType::Report => {
            if contains_any(lower, &["analysis", "situation", "prospects", "conclusion"]) {
                score += 0.1;
            }
            if word_count > 200 {
                score += 0.1;
            }
        }
        DocumentType::List => {
            if NUMBERED_ITEM_RE.find_iter(content).count() > 3 {
                score += 0.2;
            }
            if contains_any(lower, &["specification", "equipment", "item", "description"]) {
                score += 0.1;
            }
        }
        DocumentType::Narrative | DocumentType::Unknown => {}
    }
    score
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Scores are sums of tenths; rounding keeps ties exact.
pub(crate) fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

// ── Tests ──
