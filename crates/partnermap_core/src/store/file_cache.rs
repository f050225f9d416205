//! File-backed fallback cache.
//!
//! # Responsibility
//! - Keep a local JSON copy of the last document written in this process.
//!
//! # Invariants
//! - The cache file name is derived from a fixed key.
//! - Saves go through a temp file and rename so readers never see half a file.

use super::{FallbackCache, StoreError, StoreResult};
use crate::model::document::PartnerDocument;
use log::debug;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Fallback cache storing `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    /// Creates a cache for `key` under `dir`; the directory is created on save.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", sanitize_key(key))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FallbackCache for FileCache {
    fn load(&self) -> StoreResult<Option<Value>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let value = serde_json::from_str(&text).map_err(|err| {
            StoreError::InvalidData(format!(
                "cache file `{}` is not json: {err}",
                self.path.display()
            ))
        })?;
        Ok(Some(value))
    }

    fn save(&self, document: &PartnerDocument) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_vec(document)?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &data)?;
        std::fs::rename(&temp_path, &self.path)?;

        debug!(
            "event=cache_write module=store status=ok bytes={}",
            data.len()
        );
        Ok(())
    }
}

/// Maps a cache key to a portable file stem (`partner-map-france:v1` -> `partner-map-france_v1`).
fn sanitize_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "document".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::{sanitize_key, FileCache};
    use crate::model::document::{PartnerDocument, Region};
    use crate::store::{FallbackCache, StoreError};

    #[test]
    fn sanitize_key_replaces_path_hostile_characters() {
        assert_eq!(sanitize_key("partner-map-france:v1"), "partner-map-france_v1");
        assert_eq!(sanitize_key("../etc"), ".._etc");
        assert_eq!(sanitize_key("   "), "document");
    }

    #[test]
    fn load_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path(), "k");
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_returns_document_json() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("nested"), "partner-map-france:v1");
        let document = PartnerDocument::new(vec![Region::new("bre", "Bretagne")]);

        cache.save(&document).unwrap();
        let loaded = cache.load().unwrap().unwrap();
        assert_eq!(loaded["regions"][0]["id"], "bre");
        assert!(cache.path().ends_with("partner-map-france_v1.json"));
    }

    #[test]
    fn corrupt_cache_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path(), "k");
        std::fs::write(cache.path(), "{not json").unwrap();
        assert!(matches!(cache.load(), Err(StoreError::InvalidData(_))));
    }
}
