//! Input models for admin create/edit operations.
//!
//! # Responsibility
//! - Carry form input for partners, contacts and projects.
//! - Validate the minimum content each record needs before it is stored.
//!
//! # Invariants
//! - Validation trims text before checking for emptiness.
//! - Drafts never carry ids; ids are assigned or kept by the service.

use crate::import::{merge_accounts, split_list};
use crate::model::partner::{Contact, Partner, PartnerStatus, Project, ProjectStatus};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    BlankPartnerName,
    BlankProjectName,
    /// Contact has none of the fields that make it identifiable.
    EmptyContact,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankPartnerName => write!(f, "partner name must not be blank"),
            Self::BlankProjectName => write!(f, "project name must not be blank"),
            Self::EmptyContact => write!(
                f,
                "contact needs at least a first name, last name, email or phone"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Partner form content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerDraft {
    pub name: String,
    pub city: String,
    pub address: String,
    pub status: PartnerStatus,
    pub logo: String,
}

impl PartnerDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankPartnerName);
        }
        Ok(())
    }

    /// Copies the draft onto `partner`, leaving contacts and projects alone.
    pub(crate) fn apply_to(&self, partner: &mut Partner) {
        partner.name = self.name.trim().to_string();
        partner.city = self.city.clone();
        partner.address = self.address.clone();
        partner.status = self.status;
        partner.logo = self.logo.clone();
    }
}

/// Contact form content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub photo: String,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub verticals: Vec<String>,
    pub named_accounts: Vec<String>,
    pub territory: String,
}

impl ContactDraft {
    /// Fills `verticals` and `named_accounts` from comma/semicolon separated text.
    pub fn with_list_text(mut self, verticals: &str, named_accounts: &str) -> Self {
        self.verticals = split_list(verticals);
        self.named_accounts = split_list(named_accounts);
        self
    }

    fn has_identity(&self) -> bool {
        [&self.first_name, &self.last_name, &self.email, &self.phone]
            .iter()
            .any(|value| !value.trim().is_empty())
    }

    /// New contacts must be identifiable by name, email or phone.
    pub(crate) fn validate_for_create(&self) -> Result<(), ValidationError> {
        if self.has_identity() {
            Ok(())
        } else {
            Err(ValidationError::EmptyContact)
        }
    }

    /// Edits may also keep a contact that only carries lists or a territory.
    pub(crate) fn validate_for_update(&self) -> Result<(), ValidationError> {
        let has_extra = self.verticals.iter().any(|value| !value.trim().is_empty())
            || self.named_accounts.iter().any(|value| !value.trim().is_empty())
            || !self.territory.trim().is_empty();
        if self.has_identity() || has_extra {
            Ok(())
        } else {
            Err(ValidationError::EmptyContact)
        }
    }

    pub(crate) fn apply_to(&self, contact: &mut Contact) {
        contact.photo = self.photo.clone();
        contact.first_name = self.first_name.clone();
        contact.last_name = self.last_name.clone();
        contact.title = self.title.clone();
        contact.email = self.email.clone();
        contact.phone = self.phone.clone();
        contact.verticals = self
            .verticals
            .iter()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        contact.named_accounts = merge_accounts(&[], &self.named_accounts);
        contact.territory = self.territory.trim().to_string();
    }
}

/// Project form content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub ic_name: String,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankProjectName);
        }
        Ok(())
    }

    pub(crate) fn apply_to(&self, project: &mut Project) {
        project.name = self.name.trim().to_string();
        project.description = self.description.clone();
        project.status = self.status;
        project.ic_name = self.ic_name.clone();
    }
}
