//! Directory use-case service.
//!
//! # Responsibility
//! - Own the in-memory document and its load/persist lifecycle.
//! - Apply admin mutations addressed by stable ids.
//! - Expose read and search entry points for front ends.
//!
//! # Invariants
//! - Every mutation requires a valid `AdminSession`.
//! - Every successful mutation is followed by a full-document persist to the
//!   store and the fallback cache; persist failures are logged, never raised.
//! - The in-memory region list always mirrors the region catalog.
//! - Sample or repaired documents are persisted during `load`, so generated
//!   ids are assigned once.

use super::drafts::{ContactDraft, PartnerDraft, ProjectDraft, ValidationError};
use crate::auth::{AdminAuthority, AdminSession, AuthError};
use crate::catalog::RegionCatalog;
use crate::import::{import_text, ImportReport};
use crate::model::document::{PartnerDocument, Region};
use crate::model::partner::{
    Contact, ContactId, Partner, PartnerId, Project, ProjectId,
};
use crate::normalize::{normalize_document, normalize_json, resolve_region, sample_document};
use crate::search::{search_accounts, search_projects, AccountHit, ProjectHit};
use crate::store::{DocumentStore, FallbackCache};
use log::{error, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Notice shown when the primary store could not be read.
pub const STORE_UNAVAILABLE_NOTICE: &str = "document store unavailable; using local data";

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Session missing, revoked, or issued by another authority.
    Unauthorized,
    RegionNotFound(String),
    PartnerNotFound(PartnerId),
    ContactNotFound(ContactId),
    ProjectNotFound(ProjectId),
    Validation(ValidationError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "admin session required"),
            Self::RegionNotFound(id) => write!(f, "region not found: {id}"),
            Self::PartnerNotFound(id) => write!(f, "partner not found: {id}"),
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Where the working document came from at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Store,
    Cache,
    Sample,
}

impl LoadSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Cache => "cache",
            Self::Sample => "sample",
        }
    }
}

/// Result of the startup load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub source: LoadSource,
    /// Non-blocking message for the user when the store could not be read.
    pub notice: Option<String>,
}

/// Use-case service over one directory document.
pub struct DirectoryService<S: DocumentStore, C: FallbackCache, A: AdminAuthority> {
    store: S,
    cache: C,
    authority: A,
    catalog: RegionCatalog,
    document_id: String,
    document: PartnerDocument,
}

impl<S: DocumentStore, C: FallbackCache, A: AdminAuthority> DirectoryService<S, C, A> {
    /// Creates a service holding an empty, catalog-shaped document.
    ///
    /// Call `load` before serving reads.
    pub fn new(
        store: S,
        cache: C,
        authority: A,
        catalog: RegionCatalog,
        document_id: impl Into<String>,
    ) -> Self {
        let document = normalize_document(&PartnerDocument::default(), &catalog);
        Self {
            store,
            cache,
            authority,
            catalog,
            document_id: document_id.into(),
            document,
        }
    }

    /// Loads the document: store, then cache on store failure, then sample data.
    ///
    /// A store that has no document yields the sample data directly; the
    /// cache is only consulted when the store read itself fails. Seeded or
    /// repaired documents are persisted before returning so their ids stay
    /// stable across processes.
    pub fn load(&mut self) -> LoadOutcome {
        let started_at = Instant::now();
        let outcome = match self.store.read(&self.document_id) {
            Ok(Some(raw)) => {
                self.document = normalize_json(&raw, &self.catalog);
                self.write_back_if_repaired(&raw);
                LoadOutcome {
                    source: LoadSource::Store,
                    notice: None,
                }
            }
            Ok(None) => {
                self.document = sample_document(&self.catalog);
                self.persist();
                LoadOutcome {
                    source: LoadSource::Sample,
                    notice: None,
                }
            }
            Err(err) => {
                error!(
                    "event=document_load module=service status=error stage=store document_id={} error={}",
                    self.document_id, err
                );
                let source = self.load_from_cache();
                LoadOutcome {
                    source,
                    notice: Some(STORE_UNAVAILABLE_NOTICE.to_string()),
                }
            }
        };

        info!(
            "event=document_load module=service status=ok source={} duration_ms={} regions={} partners={}",
            outcome.source.as_str(),
            started_at.elapsed().as_millis(),
            self.document.regions.len(),
            self.document.partner_count()
        );
        outcome
    }

    fn load_from_cache(&mut self) -> LoadSource {
        match self.cache.load() {
            Ok(Some(raw)) => {
                self.document = normalize_json(&raw, &self.catalog);
                self.write_back_if_repaired(&raw);
                LoadSource::Cache
            }
            Ok(None) => {
                self.document = sample_document(&self.catalog);
                self.persist();
                LoadSource::Sample
            }
            Err(err) => {
                warn!(
                    "event=document_load module=service status=error stage=cache error={}",
                    err
                );
                self.document = sample_document(&self.catalog);
                self.persist();
                LoadSource::Sample
            }
        }
    }

    /// Persists the loaded document when normalization changed it, so ids
    /// generated for records that had none survive the next load.
    fn write_back_if_repaired(&self, raw: &Value) {
        let unchanged = serde_json::to_value(&self.document).is_ok_and(|value| &value == raw);
        if !unchanged {
            info!("event=document_load module=service status=repaired");
            self.persist();
        }
    }

    pub fn document(&self) -> &PartnerDocument {
        &self.document
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Looks up a region by id, falling back to its catalog name.
    pub fn region(&self, region_id: &str) -> Option<&Region> {
        resolve_region(&self.document, &self.catalog, region_id)
    }

    pub fn partner(&self, region_id: &str, partner_id: PartnerId) -> Option<&Partner> {
        self.region(region_id)?.partner(partner_id)
    }

    pub fn search_projects(&self, query: &str) -> Vec<ProjectHit<'_>> {
        search_projects(&self.document, query)
    }

    pub fn search_accounts(&self, query: &str) -> Vec<AccountHit<'_>> {
        search_accounts(&self.document, query)
    }

    /// Enters admin mode.
    pub fn login(&mut self, credential: &str) -> Result<AdminSession, AuthError> {
        self.authority.authorize(credential)
    }

    /// Leaves admin mode; the session stops being accepted.
    pub fn logout(&mut self, session: &AdminSession) {
        self.authority.revoke(session);
    }

    pub fn is_admin(&self, session: &AdminSession) -> bool {
        self.authority.is_valid(session)
    }

    pub fn add_partner(
        &mut self,
        session: &AdminSession,
        region_id: &str,
        draft: &PartnerDraft,
    ) -> ServiceResult<PartnerId> {
        self.ensure_admin(session)?;
        draft.validate()?;

        let mut partner = Partner::new(String::new());
        draft.apply_to(&mut partner);
        let partner_id = partner.id;
        self.region_mut(region_id)?.partners.push(partner);

        self.commit("add_partner");
        Ok(partner_id)
    }

    /// Replaces partner fields; contacts and projects are kept.
    pub fn update_partner(
        &mut self,
        session: &AdminSession,
        region_id: &str,
        partner_id: PartnerId,
        draft: &PartnerDraft,
    ) -> ServiceResult<()> {
        self.ensure_admin(session)?;
        draft.validate()?;

        draft.apply_to(self.partner_mut(region_id, partner_id)?);
        self.commit("update_partner");
        Ok(())
    }

    pub fn delete_partner(
        &mut self,
        session: &AdminSession,
        region_id: &str,
        partner_id: PartnerId,
    ) -> ServiceResult<()> {
        self.ensure_admin(session)?;

        let region = self.region_mut(region_id)?;
        let before = region.partners.len();
        region.partners.retain(|partner| partner.id != partner_id);
        if region.partners.len() == before {
            return Err(ServiceError::PartnerNotFound(partner_id));
        }

        self.commit("delete_partner");
        Ok(())
    }

    pub fn add_contact(
        &mut self,
        session: &AdminSession,
        region_id: &str,
        partner_id: PartnerId,
        draft: &ContactDraft,
    ) -> ServiceResult<ContactId> {
        self.ensure_admin(session)?;
        draft.validate_for_create()?;

        let mut contact = Contact::new();
        draft.apply_to(&mut contact);
        let contact_id = contact.id;
        self.partner_mut(region_id, partner_id)?.contacts.push(contact);

        self.commit("add_contact");
        Ok(contact_id)
    }

    pub fn update_contact(
        &mut self,
        session: &AdminSession,
        region_id: &str,
        partner_id: PartnerId,
        contact_id: ContactId,
        draft: &ContactDraft,
    ) -> ServiceResult<()> {
        self.ensure_admin(session)?;
        draft.validate_for_update()?;

        let contact = self
            .partner_mut(region_id, partner_id)?
            .contact_mut(contact_id)
            .ok_or(ServiceError::ContactNotFound(contact_id))?;
        draft.apply_to(contact);

        self.commit("update_contact");
        Ok(())
    }

    pub fn delete_contact(
        &mut self,
        session: &AdminSession,
        region_id: &str,
        partner_id: PartnerId,
        contact_id: ContactId,
    ) -> ServiceResult<()> {
        self.ensure_admin(session)?;

        let partner = self.partner_mut(region_id, partner_id)?;
        let before = partner.contacts.len();
        partner.contacts.retain(|contact| contact.id != contact_id);
        if partner.contacts.len() == before {
            return Err(ServiceError::ContactNotFound(contact_id));
        }

        self.commit("delete_contact");
        Ok(())
    }

    pub fn add_project(
        &mut self,
        session: &AdminSession,
        region_id: &str,
        partner_id: PartnerId,
        draft: &ProjectDraft,
    ) -> ServiceResult<ProjectId> {
        self.ensure_admin(session)?;
        draft.validate()?;

        let mut project = Project::new(String::new());
        draft.apply_to(&mut project);
        let project_id = project.id;
        self.partner_mut(region_id, partner_id)?.projects.push(project);

        self.commit("add_project");
        Ok(project_id)
    }

    pub fn update_project(
        &mut self,
        session: &AdminSession,
        region_id: &str,
        partner_id: PartnerId,
        project_id: ProjectId,
        draft: &ProjectDraft,
    ) -> ServiceResult<()> {
        self.ensure_admin(session)?;
        draft.validate()?;

        let project = self
            .partner_mut(region_id, partner_id)?
            .project_mut(project_id)
            .ok_or(ServiceError::ProjectNotFound(project_id))?;
        draft.apply_to(project);

        self.commit("update_project");
        Ok(())
    }

    pub fn delete_project(
        &mut self,
        session: &AdminSession,
        region_id: &str,
        partner_id: PartnerId,
        project_id: ProjectId,
    ) -> ServiceResult<()> {
        self.ensure_admin(session)?;

        let partner = self.partner_mut(region_id, partner_id)?;
        let before = partner.projects.len();
        partner.projects.retain(|project| project.id != project_id);
        if partner.projects.len() == before {
            return Err(ServiceError::ProjectNotFound(project_id));
        }

        self.commit("delete_project");
        Ok(())
    }

    /// Merges delimited text into the document.
    ///
    /// Input without data rows is a no-op: nothing is persisted and the
    /// returned report has `rows_parsed == 0`.
    pub fn import_text(&mut self, session: &AdminSession, text: &str) -> ServiceResult<ImportReport> {
        self.ensure_admin(session)?;

        let report = import_text(&mut self.document, text);
        if report.rows_parsed == 0 {
            warn!("event=import module=service status=skip reason=no_rows");
            return Ok(report);
        }

        self.commit("import");
        Ok(report)
    }

    /// Replaces the whole document with the demonstration data.
    pub fn reset_to_sample(&mut self, session: &AdminSession) -> ServiceResult<()> {
        self.ensure_admin(session)?;
        self.document = sample_document(&self.catalog);
        self.commit("reset_to_sample");
        Ok(())
    }

    fn ensure_admin(&self, session: &AdminSession) -> ServiceResult<()> {
        if self.authority.is_valid(session) {
            Ok(())
        } else {
            warn!("event=mutation module=service status=error error_code=unauthorized");
            Err(ServiceError::Unauthorized)
        }
    }

    fn region_mut(&mut self, region_id: &str) -> ServiceResult<&mut Region> {
        // Region ids are catalog ids after normalization; no name fallback needed.
        self.document
            .region_mut(region_id)
            .ok_or_else(|| ServiceError::RegionNotFound(region_id.to_string()))
    }

    fn partner_mut(&mut self, region_id: &str, partner_id: PartnerId) -> ServiceResult<&mut Partner> {
        self.region_mut(region_id)?
            .partner_mut(partner_id)
            .ok_or(ServiceError::PartnerNotFound(partner_id))
    }

    fn commit(&self, action: &'static str) {
        info!(
            "event=mutation module=service status=ok action={} partners={} contacts={}",
            action,
            self.document.partner_count(),
            self.document.contact_count()
        );
        self.persist();
    }

    /// Writes the whole document to the store, then the cache.
    ///
    /// Failures are logged only; the in-memory document stays authoritative.
    fn persist(&self) {
        let started_at = Instant::now();
        match self.store.write(&self.document_id, &self.document) {
            Ok(()) => info!(
                "event=document_save module=service status=ok target=store document_id={} duration_ms={}",
                self.document_id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=document_save module=service status=error target=store document_id={} error={}",
                self.document_id, err
            ),
        }

        if let Err(err) = self.cache.save(&self.document) {
            error!(
                "event=document_save module=service status=error target=cache error={}",
                err
            );
        }
    }
}
