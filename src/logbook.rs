use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{LogbookError, Result};
use crate::record::Logbook;
use crate::settings::Settings;

pub const COMPLETE_LOGBOOK: &str = "complete_logbook.json";
pub const CLEANED_LOGBOOK: &str = "cleaned_logbook.json";
pub const COMBINED_LOGBOOK: &str = "combined_logbook.json";

const DATA_DIR_CANDIDATES: [&str; 3] = [
    "website/public/data",
    "../website/public/data",
    "../../website/public/data",
];

/// Where the website's JSON lives: `LOGBOOK_DATA_DIR` if set, else the first
/// candidate that exists relative to the working directory.
pub fn data_dir(settings: &Settings) -> PathBuf {
    if let Some(dir) = &settings.data_dir {
        return dir.clone();
    }
    DATA_DIR_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .unwrap_or_else(|| PathBuf::from(DATA_DIR_CANDIDATES[0]))
}

pub fn load<E: DeserializeOwned>(path: &Path) -> Result<Logbook<E>> {
    if !path.exists() {
        return Err(LogbookError::MissingInput(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path).map_err(|source| LogbookError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let logbook: Logbook<E> = serde_json::from_str(&raw).map_err(|source| LogbookError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = ?path, entries = logbook.entries.len(), "loaded logbook");
    Ok(logbook)
}

/// Pretty-print the whole document in memory, then write it in one go.
pub fn save<E: Serialize>(path: &Path, logbook: &Logbook<E>) -> Result<()> {
    let json = serde_json::to_string_pretty(logbook)?;
    let write_err = |source| LogbookError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, json).map_err(write_err)?;
    debug!(path = ?path, entries = logbook.entries.len(), "wrote logbook");
    Ok(())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PageRecord;

    #[test]
    fn missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(COMPLETE_LOGBOOK);
        let err = load::<PageRecord>(&path).unwrap_err();
        assert!(matches!(err, LogbookError::MissingInput(p) if p == path));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(COMPLETE_LOGBOOK);
        fs::write(&path, "{ not json").unwrap();
        let err = load::<PageRecord>(&path).unwrap_err();
        assert!(matches!(err, LogbookError::Parse { .. }));
    }

    #[test]
    fn save_then_load_keeps_envelope_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CLEANED_LOGBOOK);
        let mut book = Logbook::new(vec![PageRecord {
            filename: "IMG_0001.png".into(),
            content: "Ankunft in München".into(),
            ..Default::default()
        }]);
        book.extra.insert("source".into(), "scanner-2".into());
        save(&path, &book).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("München"));
        assert!(written.contains("\n  \"entries\""));

        let loaded: Logbook<PageRecord> = load(&path).unwrap();
        assert_eq!(loaded, book);
    }

    #[test]
    fn explicit_data_dir_wins() {
        let settings = Settings {
            data_dir: Some(PathBuf::from("/data/logbook")),
            ..Default::default()
        };
        assert_eq!(data_dir(&settings), PathBuf::from("/data/logbook"));
    }
}
