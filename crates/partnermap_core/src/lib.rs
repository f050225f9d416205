//! Core domain logic for PartnerMap, the regional partner directory.
//! This crate is the single source of truth for document invariants.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod import;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod search;
pub mod service;
pub mod store;

pub use auth::{AdminAuthority, AdminSession, AuthError, StaticCredentialAuthority};
pub use catalog::{CatalogError, CatalogRegion, RegionCatalog};
pub use config::{AppConfig, ConfigError};
pub use import::{import_text, ImportReport};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::{PartnerDocument, Region};
pub use model::partner::{
    Contact, ContactId, Partner, PartnerId, PartnerStatus, Project, ProjectId, ProjectStatus,
};
pub use normalize::{normalize_document, normalize_json, resolve_region, sample_document};
pub use search::{search_accounts, search_projects, AccountHit, ProjectHit};
pub use service::directory_service::{
    DirectoryService, LoadOutcome, LoadSource, ServiceError, ServiceResult,
};
pub use service::drafts::{ContactDraft, PartnerDraft, ProjectDraft, ValidationError};
pub use store::{
    DocumentStore, FallbackCache, FileCache, SqliteDocumentStore, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
