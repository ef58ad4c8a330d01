use std::path::PathBuf;

use config::{Config, Environment};
use serde::Deserialize;

use crate::combiner::{DEFAULT_LOOKAHEAD, DEFAULT_MIN_CONTENT_LEN};
use crate::error::Result;

/// Run settings, read from `LOGBOOK_*` environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Overrides the data directory search.
    pub data_dir: Option<PathBuf>,
    pub lookahead: usize,
    pub min_content_len: usize,
    pub keep_short_fragments: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: None,
            lookahead: DEFAULT_LOOKAHEAD,
            min_content_len: DEFAULT_MIN_CONTENT_LEN,
            keep_short_fragments: false,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_environment(Environment::with_prefix("LOGBOOK"))
    }

    fn from_environment(env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("lookahead", DEFAULT_LOOKAHEAD as u64)?
            .set_default("min_content_len", DEFAULT_MIN_CONTENT_LEN as u64)?
            .set_default("keep_short_fragments", false)?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("LOGBOOK").source(Some(source))
    }

    #[test]
    fn defaults_without_environment() {
        let settings = Settings::from_environment(env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::from_environment(env(&[
            ("LOGBOOK_DATA_DIR", "/srv/logbook"),
            ("LOGBOOK_LOOKAHEAD", "4"),
            ("LOGBOOK_KEEP_SHORT_FRAGMENTS", "true"),
        ]))
        .unwrap();
        assert_eq!(settings.data_dir, Some(PathBuf::from("/srv/logbook")));
        assert_eq!(settings.lookahead, 4);
        assert_eq!(settings.min_content_len, DEFAULT_MIN_CONTENT_LEN);
        assert!(settings.keep_short_fragments);
    }
}
