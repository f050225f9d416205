//! Partner, contact and project records.
//!
//! # Responsibility
//! - Define the records nested under each region of the directory.
//! - Keep the persisted JSON shape (camelCase keys) stable across versions.
//!
//! # Invariants
//! - `id` is assigned at creation and never reused or reassigned.
//! - Sequence fields are always present (possibly empty), never absent.

use super::lenient;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Stable identifier of a partner within the document.
pub type PartnerId = Uuid;
/// Stable identifier of a contact within its partner.
pub type ContactId = Uuid;
/// Stable identifier of a project within its partner.
pub type ProjectId = Uuid;

/// Partnership tier shown on the partner card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PartnerStatus {
    Bronze,
    /// Default tier for partners created without an explicit status.
    #[default]
    Silver,
    Gold,
}

impl PartnerStatus {
    pub const ALL: [PartnerStatus; 3] = [Self::Gold, Self::Silver, Self::Bronze];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
        }
    }

    /// Parses a tier label, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "bronze" => Some(Self::Bronze),
            "silver" => Some(Self::Silver),
            "gold" => Some(Self::Gold),
            _ => None,
        }
    }
}

impl Serialize for PartnerStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PartnerStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::optional_text(deserializer)?;
        Ok(raw
            .as_deref()
            .and_then(PartnerStatus::parse)
            .unwrap_or_default())
    }
}

/// Commercial state of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProjectStatus {
    #[default]
    InProgress,
    Won,
    Lost,
    Paused,
}

impl ProjectStatus {
    /// Persisted labels, kept in French for compatibility with stored data.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "En cours",
            Self::Won => "Gagné",
            Self::Lost => "Perdu",
            Self::Paused => "Pause",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "en cours" => Some(Self::InProgress),
            "gagné" | "gagne" => Some(Self::Won),
            "perdu" => Some(Self::Lost),
            "pause" => Some(Self::Paused),
            _ => None,
        }
    }
}

impl Serialize for ProjectStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProjectStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::optional_text(deserializer)?;
        Ok(raw
            .as_deref()
            .and_then(ProjectStatus::parse)
            .unwrap_or_default())
    }
}

/// Organization listed under a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient::stable_id")]
    pub id: PartnerId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub city: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub address: String,
    #[serde(default)]
    pub status: PartnerStatus,
    /// Opaque image reference (data URL in practice).
    #[serde(default, deserialize_with = "lenient::text")]
    pub logo: String,
    #[serde(default, deserialize_with = "lenient::record_list")]
    pub contacts: Vec<Contact>,
    #[serde(default, deserialize_with = "lenient::record_list")]
    pub projects: Vec<Project>,
}

impl Partner {
    /// Creates an empty partner with a generated stable ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            city: String::new(),
            address: String::new(),
            status: PartnerStatus::default(),
            logo: String::new(),
            contacts: Vec::new(),
            projects: Vec::new(),
        }
    }

    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    pub fn contact_mut(&mut self, id: ContactId) -> Option<&mut Contact> {
        self.contacts.iter_mut().find(|contact| contact.id == id)
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn project_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|project| project.id == id)
    }
}

/// Person attached to a partner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient::stable_id")]
    pub id: ContactId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub photo: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub verticals: Vec<String>,
    /// Customer accounts handled by this contact; unique ignoring case.
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub named_accounts: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub territory: String,
}

impl Contact {
    /// Creates an empty contact with a generated stable ID.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            ..Self::default()
        }
    }

    /// "First Last" label for listings and delete confirmations.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Project tracked for a partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient::stable_id")]
    pub id: ProjectId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    /// Name of the internal counterpart following the project.
    #[serde(default, deserialize_with = "lenient::text")]
    pub ic_name: String,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            status: ProjectStatus::default(),
            ic_name: String::new(),
        }
    }
}
