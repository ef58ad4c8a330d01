use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

/// Places on the 1933 route and the month (or day) they were visited, in
/// travel order. Lookups take the first entry contained in the query, so the
/// order decides between overlapping names.
pub const ITINERARY: &[(&str, &str)] = &[
    ("chicago", "1933-01"),
    ("new york", "1933-01"),
    ("southampton", "1933-01-28"),
    ("london", "1933-01-29"),
    ("england", "1933-02"),
    ("liverpool", "1933-02"),
    ("portugal", "1933-02"),
    ("lisbon", "1933-02"),
    ("spain", "1933-02"),
    ("france", "1933-03"),
    ("paris", "1933-03"),
    ("switzerland", "1933-03"),
    ("germany", "1933-03"),
    ("berlin", "1933-03"),
    ("poland", "1933-04"),
    ("russia", "1933-04"),
    ("moscow", "1933-04"),
    ("egypt", "1933-04"),
    ("cairo", "1933-04"),
    ("suez", "1933-04"),
    ("india", "1933-05"),
    ("bombay", "1933-05"),
    ("calcutta", "1933-05"),
    ("burma", "1933-05"),
    ("rangoon", "1933-05"),
    ("straits settlements", "1933-05"),
    ("singapore", "1933-05"),
    ("kuala lumpur", "1933-05"),
    ("penang", "1933-05"),
    ("china", "1933-06"),
    ("shanghai", "1933-06"),
    ("hong kong", "1933-06"),
    ("hongkong", "1933-06"),
    ("nanking", "1933-06"),
    ("peking", "1933-06"),
    ("tientsin", "1933-06"),
    ("japan", "1933-07"),
    ("tokyo", "1933-07"),
    ("yokohama", "1933-07"),
    ("philippines", "1933-08"),
    ("manila", "1933-08"),
    ("hawaii", "1933-09"),
    ("honolulu", "1933-09"),
    ("pacific", "1933-09"),
    ("san francisco", "1933-09"),
    ("california", "1933-09"),
    ("united states", "1933-09"),
    ("america", "1933-09"),
];

/// Canonical spellings accepted as a record's `location`.
pub const KNOWN_LOCATIONS: &[&str] = &[
    "Chicago",
    "New York",
    "Southampton",
    "London",
    "England",
    "Liverpool",
    "Portugal",
    "Lisbon",
    "Spain",
    "France",
    "Paris",
    "Switzerland",
    "Germany",
    "Berlin",
    "Poland",
    "Russia",
    "Moscow",
    "Egypt",
    "Cairo",
    "Suez",
    "India",
    "Bombay",
    "Calcutta",
    "Burma",
    "Rangoon",
    "Straits Settlements",
    "Singapore",
    "Kuala Lumpur",
    "Penang",
    "China",
    "Shanghai",
    "Hong Kong",
    "Nanking",
    "Peking",
    "Tientsin",
    "Japan",
    "Tokyo",
    "Yokohama",
    "Philippines",
    "Manila",
    "Hawaii",
    "Honolulu",
    "San Francisco",
    "California",
    "Antwerp",
    "Melbourne House",
];

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

static DATE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!(r"(?i)\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:{MONTHS})[,\s]+1933\b"),
        format!(r"(?i)\b(?:{MONTHS})\s+\d{{1,2}}(?:st|nd|rd|th)?[,\s]+1933\b"),
        r"\b\d{1,2}/\d{1,2}/1933\b".to_string(),
        r"\b1933[-/]\d{1,2}[-/]\d{1,2}\b".to_string(),
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

const DATE_FORMATS: &[&str] = &["%d %B %Y", "%B %d %Y", "%m/%d/%Y", "%Y-%m-%d"];

static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d)(?:st|nd|rd|th)\b").unwrap());
static ISO_SLASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})/(\d{1,2})/(\d{1,2})$").unwrap());

static LOCATION_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:in|at|from|to)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
        r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)[,\s]+(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)",
        r"I\s+(?:am|was|arrived)\s+(?:in|at)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Best-effort date for a page: explicit date in the text, then the itinerary
/// month for the location, then any itinerary place named in the text, then a
/// few hand-checked passages. `None` means unknown.
pub fn infer_date_from_content(content: &str, location: Option<&str>) -> Option<String> {
    if let Some(date) = explicit_date(content) {
        return Some(date);
    }

    if let Some(location) = location.filter(|l| !l.trim().is_empty()) {
        if let Some(date) = itinerary_date(location) {
            debug!(location, date, "date from location");
            return Some(date.to_string());
        }
    }

    if let Some(date) = itinerary_date(content) {
        return Some(date.to_string());
    }

    special_case_date(&content.to_lowercase()).map(str::to_string)
}

fn explicit_date(content: &str) -> Option<String> {
    for re in DATE_RES.iter() {
        for m in re.find_iter(content) {
            if let Some(date) = parse_date(m.as_str()) {
                return Some(date.format("%Y-%m-%d").to_string());
            }
        }
    }
    None
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let without_commas = raw.replace(',', " ");
    let without_ordinals = ORDINAL_RE.replace_all(&without_commas, "$1");
    let normalized = without_ordinals.split_whitespace().collect::<Vec<_>>().join(" ");
    let normalized = ISO_SLASH_RE.replace(&normalized, "$1-$2-$3");
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&normalized, fmt).ok())
}

/// First itinerary entry whose name occurs in `text`, case-insensitively.
pub fn itinerary_date(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    ITINERARY
        .iter()
        .find(|(place, _)| lower.contains(place))
        .map(|(_, date)| *date)
}

/// Passages that name no itinerary place. Anything mentioning a place on the
/// route is already dated by the itinerary scan.
fn special_case_date(lower: &str) -> Option<&'static str> {
    if lower.contains("january") && lower.contains("harris") {
        return Some("1933-01-30");
    }
    None
}

/// A known location named in the text. Phrases like "arrived in Cairo" are
/// trusted only when they name a known place exactly; otherwise the first
/// known place mentioned anywhere wins.
pub fn extract_location_from_content(content: &str) -> Option<String> {
    if content.trim().is_empty() {
        return None;
    }

    for re in LOCATION_RES.iter() {
        for caps in re.captures_iter(content) {
            let candidate = &caps[1];
            if KNOWN_LOCATIONS.contains(&candidate) {
                return Some(candidate.to_string());
            }
        }
    }

    let lower = content.to_lowercase();
    KNOWN_LOCATIONS
        .iter()
        .find(|loc| lower.contains(&loc.to_lowercase()))
        .map(|loc| loc.to_string())
}

// ── Tests ──
