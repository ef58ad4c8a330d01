use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

static PAGE_DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// One digitized page as produced by the upstream OCR/AI step.
///
/// Keys this crate does not know about are kept in `extra` and written back
/// untouched, so downstream consumers see everything the digitizer emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(default)]
    pub page_number: Option<i64>,
    #[serde(default)]
    pub date_entry: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date_inferred: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_ocr_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub processing_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PageRecord {
    /// `page_number` if present, else the first run of digits in `filename`
    /// (`IMG_0412.png` -> 412).
    pub fn derived_page_number(&self) -> Option<i64> {
        self.page_number.or_else(|| page_number_from_filename(&self.filename))
    }

    /// Non-empty location, if any.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.trim().is_empty())
    }

    /// Non-empty date, if any.
    pub fn date(&self) -> Option<&str> {
        self.date_entry.as_deref().filter(|d| !d.trim().is_empty())
    }
}

pub fn page_number_from_filename(filename: &str) -> Option<i64> {
    PAGE_DIGITS_RE
        .find(filename)
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// ISO-8601 local timestamp, fractional seconds only when present.
pub fn iso_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// A merged multi-page document in the shape the website reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedRecord {
    pub filename: String,
    pub page_number: i64,
    pub date_entry: Option<String>,
    pub location: Option<String>,
    pub content: String,
    pub raw_ocr_text: String,
    /// Mean OCR confidence of the member pages.
    pub confidence_score: f64,
    /// Confidence of the document-type classification.
    pub type_confidence: f64,
    pub processing_method: String,
    pub timestamp: String,
    pub date_inferred: bool,
    pub document_type: String,
    pub document_title: String,
    pub is_combined: bool,
    pub is_complete: bool,
    pub source_entries: Vec<String>,
    pub entry_count: usize,
}

/// The JSON envelope shared by every stage: `{ "metadata": {..}, "entries": [..] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logbook<E> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Map<String, Value>,
    #[serde(default = "Vec::new")]
    pub entries: Vec<E>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<E> Logbook<E> {
    pub fn new(entries: Vec<E>) -> Self {
        Logbook {
            metadata: Map::new(),
            entries,
            extra: Map::new(),
        }
    }

    /// Same envelope, different entries.
    pub fn with_entries<T>(self, entries: Vec<T>) -> Logbook<T> {
        Logbook {
            metadata: self.metadata,
            entries,
            extra: self.extra,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Tests ──
