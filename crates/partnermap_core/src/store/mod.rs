//! Persistence adapters for the directory document.
//!
//! # Responsibility
//! - Define the key/document contract the service persists through.
//! - Provide the SQLite primary store and the file-backed fallback cache.
//!
//! # Invariants
//! - Writes always replace the whole document; there are no partial updates.
//! - Reads return raw JSON so that normalization decides what to keep.
//! - Adapters carry no conflict detection: the last write wins.

use crate::db::DbError;
use crate::model::document::PartnerDocument;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod file_cache;
pub mod sqlite_store;

pub use file_cache::FileCache;
pub use sqlite_store::SqliteDocumentStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by document store and cache adapters.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Io(std::io::Error),
    Serialize(serde_json::Error),
    /// Stored payload exists but is not a JSON document.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "document serialization failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid stored document: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Primary key/document store holding the directory under a fixed id.
pub trait DocumentStore {
    /// Returns `Ok(None)` when no document exists under `document_id`.
    fn read(&self, document_id: &str) -> StoreResult<Option<Value>>;
    /// Upserts the whole document under `document_id`.
    fn write(&self, document_id: &str, document: &PartnerDocument) -> StoreResult<()>;
}

/// Local backup consulted only when the primary store cannot be read.
pub trait FallbackCache {
    fn load(&self) -> StoreResult<Option<Value>>;
    fn save(&self, document: &PartnerDocument) -> StoreResult<()>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn read(&self, document_id: &str) -> StoreResult<Option<Value>> {
        (**self).read(document_id)
    }

    fn write(&self, document_id: &str, document: &PartnerDocument) -> StoreResult<()> {
        (**self).write(document_id, document)
    }
}

impl<T: FallbackCache + ?Sized> FallbackCache for &T {
    fn load(&self) -> StoreResult<Option<Value>> {
        (**self).load()
    }

    fn save(&self, document: &PartnerDocument) -> StoreResult<()> {
        (**self).save(document)
    }
}
