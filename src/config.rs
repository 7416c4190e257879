use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_CATALOG;
use crate::engine::state::Difficulty;
use crate::error::ConfigError;

const SETTINGS_FILE_NAME: &str = "settings.json";
const CONFIG_ENV: &str = "MATCHSHELL_CONFIG";
const CATALOG_ENV: &str = "MATCHSHELL_CATALOG";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: String,
    pub mismatch_delay_ms: u64,
    pub restart_delay_ms: u64,
    pub peek_lead_ms: u64,
    pub peek_show_ms: u64,
    pub default_difficulty: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            catalog: DEFAULT_CATALOG.to_string(),
            mismatch_delay_ms: 1000,
            restart_delay_ms: 3000,
            peek_lead_ms: 500,
            peek_show_ms: 1500,
            default_difficulty: Difficulty::default().token().to_string(),
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Defaults, then the settings file, then `MATCHSHELL_CATALOG`.
    pub fn load() -> Self {
        let mut settings = match settings_path() {
            Some(path) => match Self::from_file(&path) {
                Ok(Some(settings)) => {
                    log::info!("Using settings from {}", path.display());
                    settings
                }
                Ok(None) => Self::default(),
                Err(err) => {
                    log::warn!("{err}; falling back to defaults");
                    Self::default()
                }
            },
            None => Self::default(),
        };
        if let Ok(catalog) = std::env::var(CATALOG_ENV)
            && !catalog.trim().is_empty()
        {
            settings.catalog = catalog;
        }
        settings
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_token_or_default(&self.default_difficulty)
    }

    pub fn peek_enabled(&self) -> bool {
        self.peek_show_ms > 0
    }
}

fn settings_path() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(std::env::var("HOME").ok()?).join(".config"),
    };
    Some(base.join("matchshell").join(SETTINGS_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_timings() {
        let settings = Settings::default();
        assert_eq!(settings.mismatch_delay_ms, 1000);
        assert_eq!(settings.restart_delay_ms, 3000);
        assert_eq!(settings.difficulty(), Difficulty::Easy);
        assert!(settings.peek_enabled());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"mismatch_delay_ms": 400, "default_difficulty": "hard"}}"#).unwrap();
        let settings = Settings::from_file(file.path()).unwrap().unwrap();
        assert_eq!(settings.mismatch_delay_ms, 400);
        assert_eq!(settings.restart_delay_ms, 3000);
        assert_eq!(settings.catalog, DEFAULT_CATALOG);
        assert_eq!(settings.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::from_file(&dir.path().join(SETTINGS_FILE_NAME)).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn malformed_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = Settings::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("invalid settings"));
    }
}
