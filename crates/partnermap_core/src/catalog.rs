//! Region catalog: the fixed set of regions the map can display.
//!
//! # Responsibility
//! - Provide the canonical region ids and display names, in map order.
//! - Load alternative catalogs from JSON files.
//!
//! # Invariants
//! - Catalog ids are non-empty and unique.
//! - The catalog is read-only once constructed.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// One region as defined by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRegion {
    pub id: String,
    pub name: String,
}

/// Catalog construction errors.
#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Empty,
    BlankId { position: usize },
    DuplicateId(String),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read region catalog: {err}"),
            Self::Parse(err) => write!(f, "invalid region catalog json: {err}"),
            Self::Empty => write!(f, "region catalog must contain at least one region"),
            Self::BlankId { position } => {
                write!(f, "region catalog entry #{position} has a blank id")
            }
            Self::DuplicateId(id) => write!(f, "region catalog id is duplicated: {id}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

const FRANCE_REGIONS: &[(&str, &str)] = &[
    ("ara", "Auvergne-Rhône-Alpes"),
    ("bfc", "Bourgogne-Franche-Comté"),
    ("bre", "Bretagne"),
    ("cvl", "Centre-Val de Loire"),
    ("cor", "Corse"),
    ("ges", "Grand Est"),
    ("hdf", "Hauts-de-France"),
    ("idf", "Île-de-France"),
    ("nor", "Normandie"),
    ("naq", "Nouvelle-Aquitaine"),
    ("occ", "Occitanie"),
    ("pdl", "Pays de la Loire"),
    ("pac", "Provence-Alpes-Côte d'Azur"),
];

/// Ordered, validated list of regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCatalog {
    regions: Vec<CatalogRegion>,
}

impl RegionCatalog {
    /// Builds a catalog, rejecting blank or duplicated ids.
    pub fn new(regions: Vec<CatalogRegion>) -> Result<Self, CatalogError> {
        if regions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for (position, region) in regions.iter().enumerate() {
            let id = region.id.trim();
            if id.is_empty() {
                return Err(CatalogError::BlankId { position });
            }
            if !seen.insert(id.to_string()) {
                return Err(CatalogError::DuplicateId(id.to_string()));
            }
        }

        Ok(Self { regions })
    }

    /// Built-in catalog of the metropolitan French regions.
    pub fn france() -> Self {
        Self {
            regions: FRANCE_REGIONS
                .iter()
                .map(|(id, name)| CatalogRegion {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                })
                .collect(),
        }
    }

    /// Parses a JSON array of `{ "id", "name" }` objects.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let regions: Vec<CatalogRegion> = serde_json::from_str(text)?;
        Self::new(regions)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn regions(&self) -> &[CatalogRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogRegion> {
        self.regions.iter().find(|region| region.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogError, RegionCatalog};

    #[test]
    fn france_catalog_has_unique_ids() {
        let catalog = RegionCatalog::france();
        let rebuilt = RegionCatalog::new(catalog.regions().to_vec()).unwrap();
        assert_eq!(rebuilt.len(), 13);
        assert_eq!(catalog.get("idf").unwrap().name, "Île-de-France");
    }

    #[test]
    fn from_json_rejects_duplicates() {
        let err = RegionCatalog::from_json(
            r#"[{"id":"a","name":"A"},{"id":"a","name":"Again"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn from_json_rejects_blank_id_and_empty_list() {
        let blank = RegionCatalog::from_json(r#"[{"id":"  ","name":"A"}]"#).unwrap_err();
        assert!(matches!(blank, CatalogError::BlankId { position: 0 }));

        let empty = RegionCatalog::from_json("[]").unwrap_err();
        assert!(matches!(empty, CatalogError::Empty));
    }
}
