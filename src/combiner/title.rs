use std::sync::LazyLock;

use regex::Regex;

use super::patterns::DocumentType;

static RECIPIENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Dear\s+((?:Mr|Mrs|Miss|Dr|Professor)\s+\w+)").unwrap()
});
static SENDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Yours\s+(?:sincerely|truly),?\s*([A-Z]\.\s*[A-Z]\.\s*\w+)").unwrap()
});
static TELEGRAM_ORIGIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([A-Z]+),?\s+[A-Z]+\.?\s+\d+").unwrap());
static REPORT_SUBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^((?:GENERAL|POLITICAL|ECONOMIC|TECHNICAL)\s+(?:SITUATION|REPORT|ANALYSIS))")
        .unwrap()
});
static LIST_SUBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^LIST\s+OF\s+(.+)$").unwrap());
static PLACES_VISITED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^PLACES\s+VISITED").unwrap());

static GREETING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Dear\s+\w+").unwrap());
static CLOSING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Yours\s+(?:sincerely|truly)|Sincerely|Best\s+regards)").unwrap()
});
static TELEGRAM_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:(?i:stop)\.?|[A-Z]{3,})\s*$").unwrap());
static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\d+\.|^\(\d+\)").unwrap());
static TERMINAL_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s*$").unwrap());

pub fn create_document_title(
    doc_type: DocumentType,
    content: &str,
    location: Option<&str>,
    date: Option<&str>,
) -> String {
    match doc_type {
        DocumentType::Letter => {
            if let Some(caps) = RECIPIENT_RE.captures(content) {
                return format!("Letter to {}", &caps[1]);
            }
            if let Some(caps) = SENDER_RE.captures(content) {
                return format!("Letter from {}", &caps[1]);
            }
            "Personal Letter".to_string()
        }
        DocumentType::Telegram => match TELEGRAM_ORIGIN_RE.captures(content) {
            Some(caps) => format!("Telegram from {}", &caps[1]),
            None => "Telegram".to_string(),
        },
        DocumentType::Report => match REPORT_SUBJECT_RE.captures(content) {
            Some(caps) => title_case(&caps[1]),
            None => "Business Report".to_string(),
        },
        DocumentType::List => {
            if let Some(caps) = LIST_SUBJECT_RE.captures(content) {
                return format!("List of {}", title_case(caps[1].trim()));
            }
            if PLACES_VISITED_RE.is_match(content) {
                return "Places Visited".to_string();
            }
            "Equipment List".to_string()
        }
        DocumentType::Narrative | DocumentType::Unknown => {
            match (non_empty(location), non_empty(date)) {
                (Some(location), _) => format!("Notes from {}", location),
                (None, Some(date)) => format!("Entry from {}", date),
                (None, None) => "Logbook Entry".to_string(),
            }
        }
    }
}

/// Structural completeness for the given type: a letter needs greeting and
/// closing, a telegram a final STOP or capitalized signature, a list a
/// numbered item; anything else must end a sentence.
pub fn is_document_complete(doc_type: DocumentType, content: &str) -> bool {
    if content.trim().is_empty() {
        return false;
    }
    match doc_type {
        DocumentType::Letter => GREETING_RE.is_match(content) && CLOSING_RE.is_match(content),
        DocumentType::Telegram => TELEGRAM_END_RE.is_match(content),
        DocumentType::List => LIST_ITEM_RE.is_match(content),
        _ => TERMINAL_PUNCT_RE.is_match(content),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// "GENERAL SITUATION" -> "General Situation": upper-case the first letter of
/// every run of letters, lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }
    out
}

// ── Tests ──
