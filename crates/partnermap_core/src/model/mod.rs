//! Domain model for the partner directory.
//!
//! # Responsibility
//! - Define the document/region/partner/contact/project hierarchy.
//! - Decode persisted JSON leniently so stale documents still load.
//!
//! # Invariants
//! - Every partner, contact and project is identified by a stable UUID.
//! - Region identity comes from the region catalog, not from stored data.

pub mod document;
mod lenient;
pub mod partner;
