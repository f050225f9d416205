//! Runtime configuration.
//!
//! # Responsibility
//! - Describe where the document store, cache and logs live.
//! - Load settings from an optional JSON file with per-key defaults.
//!
//! # Invariants
//! - Every path in a loaded config is absolute (relative entries resolve
//!   against the config file's directory).
//! - `document_id` is never blank.

use crate::catalog::{CatalogError, RegionCatalog};
use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable overriding `admin_credential`.
pub const ADMIN_CREDENTIAL_ENV: &str = "PARTNERMAP_ADMIN_CREDENTIAL";

pub const DEFAULT_DOCUMENT_ID: &str = "france";
pub const DEFAULT_CACHE_KEY: &str = "partner-map-france:v1";
const DEFAULT_DB_FILE_NAME: &str = "partnermap.sqlite3";
const DEFAULT_CACHE_DIR_NAME: &str = "cache";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Settings for one directory instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file backing the primary document store.
    pub db_path: PathBuf,
    /// Directory holding the fallback cache file.
    pub cache_dir: PathBuf,
    /// Fixed id of the single stored document.
    pub document_id: String,
    /// Fixed key of the fallback cache entry.
    pub cache_key: String,
    /// Shared admin credential; empty disables admin mode.
    pub admin_credential: String,
    pub log_level: String,
    /// File logging is enabled only when set.
    pub log_dir: Option<PathBuf>,
    /// Custom region catalog (JSON); the built-in French catalog otherwise.
    pub catalog_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR_NAME),
            document_id: DEFAULT_DOCUMENT_ID.to_string(),
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            admin_credential: String::new(),
            log_level: default_log_level().to_string(),
            log_dir: None,
            catalog_path: None,
        }
    }
}

impl AppConfig {
    /// Loads a JSON config file; missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&text)?;

        let base_dir = match path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            Some(dir) => absolutize(dir)?,
            None => std::env::current_dir()?,
        };
        config.finish(&base_dir)
    }

    /// Default settings rooted at `base_dir`.
    pub fn rooted_at(base_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let base_dir = absolutize(base_dir.as_ref())?;
        Self::default().finish(&base_dir)
    }

    /// Loads `path` when given, otherwise defaults rooted at the working directory.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::rooted_at(std::env::current_dir()?),
        }
    }

    /// Builds the region catalog this config points at.
    pub fn region_catalog(&self) -> Result<RegionCatalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => RegionCatalog::load(path),
            None => Ok(RegionCatalog::france()),
        }
    }

    fn finish(mut self, base_dir: &Path) -> Result<Self, ConfigError> {
        self.document_id = self.document_id.trim().to_string();
        if self.document_id.is_empty() {
            return Err(ConfigError::Invalid("document_id must not be blank".to_string()));
        }
        if self.cache_key.trim().is_empty() {
            return Err(ConfigError::Invalid("cache_key must not be blank".to_string()));
        }

        self.db_path = base_dir.join(&self.db_path);
        self.cache_dir = base_dir.join(&self.cache_dir);
        self.log_dir = self.log_dir.map(|dir| base_dir.join(dir));
        self.catalog_path = self.catalog_path.map(|file| base_dir.join(file));

        if let Ok(credential) = std::env::var(ADMIN_CREDENTIAL_ENV) {
            self.admin_credential = credential;
        }
        Ok(self)
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, DEFAULT_CACHE_KEY, DEFAULT_DOCUMENT_ID};

    #[test]
    fn missing_keys_take_defaults_and_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partnermap.json");
        std::fs::write(&path, r#"{ "db_path": "data/map.sqlite3" }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.db_path, dir.path().join("data/map.sqlite3"));
        assert_eq!(config.cache_dir, dir.path().join("cache"));
        assert_eq!(config.document_id, DEFAULT_DOCUMENT_ID);
        assert_eq!(config.cache_key, DEFAULT_CACHE_KEY);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn absolute_paths_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let path = dir.path().join("partnermap.json");
        let body = serde_json::json!({ "log_dir": elsewhere.path() }).to_string();
        std::fs::write(&path, body).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.log_dir.as_deref(), Some(elsewhere.path()));
    }

    #[test]
    fn blank_document_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partnermap.json");
        std::fs::write(&path, r#"{ "document_id": "  " }"#).unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partnermap.json");
        std::fs::write(&path, "{").unwrap();

        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn default_catalog_is_france() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::rooted_at(dir.path()).unwrap();
        assert_eq!(config.region_catalog().unwrap().len(), 13);
    }
}
