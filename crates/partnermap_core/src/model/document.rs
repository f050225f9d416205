//! Directory document and region containers.
//!
//! # Responsibility
//! - Define the single persisted object holding every region and partner.
//! - Provide id-based lookups used by services and search.
//!
//! # Invariants
//! - After normalization, `regions` mirrors the region catalog one-to-one.
//! - The document is always persisted as a whole; there are no partial writes.

use super::lenient;
use super::partner::{Partner, PartnerId};
use serde::{Deserialize, Serialize};

/// Fixed geographic container for partners.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::record_list")]
    pub partners: Vec<Partner>,
}

impl Region {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            partners: Vec::new(),
        }
    }

    pub fn partner(&self, id: PartnerId) -> Option<&Partner> {
        self.partners.iter().find(|partner| partner.id == id)
    }

    pub fn partner_mut(&mut self, id: PartnerId) -> Option<&mut Partner> {
        self.partners.iter_mut().find(|partner| partner.id == id)
    }
}

/// The whole directory: one entry per catalog region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerDocument {
    #[serde(default, deserialize_with = "lenient::record_list")]
    pub regions: Vec<Region>,
}

impl PartnerDocument {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.id == id)
    }

    pub fn region_mut(&mut self, id: &str) -> Option<&mut Region> {
        self.regions.iter_mut().find(|region| region.id == id)
    }

    /// Finds a region whose trimmed name equals `name` trimmed (case-sensitive).
    pub fn region_by_name(&self, name: &str) -> Option<&Region> {
        let wanted = name.trim();
        self.regions
            .iter()
            .find(|region| region.name.trim() == wanted)
    }

    pub fn partner_count(&self) -> usize {
        self.regions.iter().map(|region| region.partners.len()).sum()
    }

    pub fn contact_count(&self) -> usize {
        self.regions
            .iter()
            .flat_map(|region| region.partners.iter())
            .map(|partner| partner.contacts.len())
            .sum()
    }
}
