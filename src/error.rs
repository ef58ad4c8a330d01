use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced while loading, writing or configuring a logbook run.
///
/// Missing or malformed fields inside a record are never errors; they read as
/// defaults and flow through the cleaner and combiner as "unknown".
#[derive(Debug, Error)]
pub enum LogbookError {
    #[error("could not find logbook at {0:?}")]
    MissingInput(PathBuf),
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path:?} is not a valid logbook document: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize logbook: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, LogbookError>;
