//! Tabular import of partners and contacts.
//!
//! # Responsibility
//! - Parse comma/semicolon separated text exported from spreadsheets.
//! - Merge the rows into an in-memory document.
//!
//! # Invariants
//! - Import never fails on row content; bad rows are skipped and counted.
//! - Empty or header-only input leaves the document untouched.

pub mod merge;
pub mod parser;

use crate::model::document::PartnerDocument;
use log::info;
use std::time::Instant;

pub use merge::{apply_rows, merge_accounts, ImportReport};
pub use parser::{detect_delimiter, parse_rows, split_list, ImportRow};

/// Parses `text` and merges its rows into `document`.
pub fn import_text(document: &mut PartnerDocument, text: &str) -> ImportReport {
    let started_at = Instant::now();
    let rows = parse_rows(text);
    let report = apply_rows(document, &rows);

    info!(
        "event=import module=import status=ok duration_ms={} rows_parsed={} rows_applied={} skipped_region={} skipped_partner={} skipped_empty={} partners_created={} contacts_created={} contacts_merged={}",
        started_at.elapsed().as_millis(),
        report.rows_parsed,
        report.rows_applied,
        report.skipped_unknown_region,
        report.skipped_missing_partner,
        report.skipped_empty_contact,
        report.partners_created,
        report.contacts_created,
        report.contacts_merged
    );

    report
}
