//! SQLite-backed document store.
//!
//! # Responsibility
//! - Persist the directory document as one JSON row keyed by document id.
//!
//! # Invariants
//! - Each write replaces `data` and bumps `revision`; it never merges.
//! - Rows whose `data` is not JSON surface as `StoreError::InvalidData`.

use super::{DocumentStore, StoreError, StoreResult};
use crate::model::document::PartnerDocument;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

/// Document store over the `partner_documents` table.
pub struct SqliteDocumentStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Number of writes recorded for `document_id`, or `None` if absent.
    pub fn revision(&self, document_id: &str) -> StoreResult<Option<i64>> {
        let revision = self
            .conn
            .query_row(
                "SELECT revision FROM partner_documents WHERE id = ?1;",
                [document_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(revision)
    }
}

impl DocumentStore for SqliteDocumentStore<'_> {
    fn read(&self, document_id: &str) -> StoreResult<Option<Value>> {
        let data = self
            .conn
            .query_row(
                "SELECT data FROM partner_documents WHERE id = ?1;",
                [document_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        let Some(data) = data else {
            debug!(
                "event=store_read module=store status=not_found document_id={}",
                document_id
            );
            return Ok(None);
        };

        let value = serde_json::from_str(&data).map_err(|err| {
            error!(
                "event=store_read module=store status=error error_code=invalid_json document_id={}",
                document_id
            );
            StoreError::InvalidData(format!(
                "partner_documents.data for `{document_id}` is not json: {err}"
            ))
        })?;
        Ok(Some(value))
    }

    fn write(&self, document_id: &str, document: &PartnerDocument) -> StoreResult<()> {
        let data = serde_json::to_string(document)?;
        self.conn.execute(
            "INSERT INTO partner_documents (id, data, revision)
             VALUES (?1, ?2, 1)
             ON CONFLICT(id) DO UPDATE SET
                data = excluded.data,
                revision = partner_documents.revision + 1,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![document_id, data],
        )?;
        debug!(
            "event=store_write module=store status=ok document_id={} bytes={}",
            document_id,
            data.len()
        );
        Ok(())
    }
}
