//! Document normalization against the region catalog.
//!
//! # Responsibility
//! - Realign any loaded document to the catalog's region list.
//! - Build the demonstration document used when storage has nothing.
//!
//! # Invariants
//! - Output regions have the catalog's length, ids, names and order.
//! - Normalization is pure and idempotent.
//! - Regions unknown to the catalog are dropped.

use crate::catalog::RegionCatalog;
use crate::model::document::{PartnerDocument, Region};
use crate::model::partner::{Partner, PartnerStatus};
use log::{debug, warn};
use serde_json::Value;

const SAMPLE_PARTNER_NAME: &str = "Test";
const SAMPLE_PARTNER_ADDRESS: &str = "1 rue Exemple";

/// Aligns a typed document to the catalog.
///
/// Each catalog region takes the partners of the stored region with the same
/// id, or failing that the same trimmed name; otherwise it starts empty.
pub fn normalize_document(document: &PartnerDocument, catalog: &RegionCatalog) -> PartnerDocument {
    let regions = catalog
        .regions()
        .iter()
        .map(|entry| {
            let matched = document
                .regions
                .iter()
                .find(|region| region.id == entry.id)
                .or_else(|| {
                    document
                        .regions
                        .iter()
                        .find(|region| region.name.trim() == entry.name.trim())
                });

            Region {
                id: entry.id.clone(),
                name: entry.name.clone(),
                partners: matched
                    .map(|region| region.partners.clone())
                    .unwrap_or_default(),
            }
        })
        .collect();

    PartnerDocument { regions }
}

/// Aligns a raw JSON document to the catalog.
///
/// Tolerates any root shape: a root without a `regions` array normalizes to
/// a document of empty regions. Partner entries that cannot be decoded are
/// dropped and reported through a `warn` event.
pub fn normalize_json(raw: &Value, catalog: &RegionCatalog) -> PartnerDocument {
    let stored_regions = raw
        .get("regions")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut dropped_partners = 0usize;
    let regions = stored_regions
        .iter()
        .filter(|value| value.is_object())
        .map(|value| {
            let partners = value
                .get("partners")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| match decode_partner(item) {
                            Some(partner) => Some(partner),
                            None => {
                                dropped_partners += 1;
                                None
                            }
                        })
                        .collect()
                })
                .unwrap_or_default();

            Region {
                id: text_field(value, "id"),
                name: text_field(value, "name"),
                partners,
            }
        })
        .collect();

    if dropped_partners > 0 {
        warn!(
            "event=normalize module=normalize status=partial dropped_partners={}",
            dropped_partners
        );
    }

    let normalized = normalize_document(&PartnerDocument { regions }, catalog);
    debug!(
        "event=normalize module=normalize status=ok regions={} partners={}",
        normalized.regions.len(),
        normalized.partner_count()
    );
    normalized
}

/// Builds the demonstration document: one `Test` partner per region.
///
/// Tiers cycle gold, silver, bronze in catalog order so seeded data is
/// reproducible.
pub fn sample_document(catalog: &RegionCatalog) -> PartnerDocument {
    let regions = catalog
        .regions()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let mut partner = Partner::new(SAMPLE_PARTNER_NAME);
            partner.city = entry.name.clone();
            partner.address = SAMPLE_PARTNER_ADDRESS.to_string();
            partner.status = PartnerStatus::ALL[index % PartnerStatus::ALL.len()];

            Region {
                id: entry.id.clone(),
                name: entry.name.clone(),
                partners: vec![partner],
            }
        })
        .collect();

    PartnerDocument { regions }
}

/// Resolves a selected region id against a document.
///
/// Falls back to the catalog name of `region_id` when the document carries a
/// stale id for that region.
pub fn resolve_region<'doc>(
    document: &'doc PartnerDocument,
    catalog: &RegionCatalog,
    region_id: &str,
) -> Option<&'doc Region> {
    if let Some(region) = document.region(region_id) {
        return Some(region);
    }
    let entry = catalog.get(region_id)?;
    document.region_by_name(&entry.name)
}

fn decode_partner(value: &Value) -> Option<Partner> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

fn text_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{normalize_document, normalize_json, resolve_region, sample_document};
    use crate::catalog::{CatalogRegion, RegionCatalog};
    use crate::model::document::{PartnerDocument, Region};
    use crate::model::partner::Partner;
    use serde_json::json;

    fn catalog() -> RegionCatalog {
        RegionCatalog::new(vec![
            CatalogRegion {
                id: "nor".to_string(),
                name: "Normandie".to_string(),
            },
            CatalogRegion {
                id: "bre".to_string(),
                name: "Bretagne".to_string(),
            },
        ])
        .unwrap()
    }

    #[test]
    fn output_follows_catalog_order_and_drops_unknown_regions() {
        let mut stored = PartnerDocument::new(vec![
            Region::new("bre", "Bretagne"),
            Region::new("zzz", "Atlantis"),
        ]);
        stored.regions[0].partners.push(Partner::new("Acme"));

        let normalized = normalize_document(&stored, &catalog());
        let ids: Vec<&str> = normalized.regions.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["nor", "bre"]);
        assert!(normalized.regions[0].partners.is_empty());
        assert_eq!(normalized.regions[1].partners[0].name, "Acme");
    }

    #[test]
    fn name_match_corrects_region_id() {
        let mut stale = Region::new("old-id", "  Normandie ");
        stale.partners.push(Partner::new("Acme"));
        let normalized = normalize_document(&PartnerDocument::new(vec![stale]), &catalog());

        assert_eq!(normalized.regions[0].id, "nor");
        assert_eq!(normalized.regions[0].name, "Normandie");
        assert_eq!(normalized.regions[0].partners.len(), 1);
    }

    #[test]
    fn id_match_wins_over_name_match() {
        let mut by_name = Region::new("x", "Bretagne");
        by_name.partners.push(Partner::new("ByName"));
        let mut by_id = Region::new("bre", "Renamed");
        by_id.partners.push(Partner::new("ById"));

        let normalized =
            normalize_document(&PartnerDocument::new(vec![by_name, by_id]), &catalog());
        assert_eq!(normalized.regions[1].partners[0].name, "ById");
    }

    #[test]
    fn normalize_json_backfills_missing_collections() {
        let raw = json!({
            "regions": [{
                "id": "nor",
                "name": "Normandie",
                "partners": [{
                    "name": "Acme",
                    "status": "gold",
                    "contacts": [{ "firstName": "Ada", "namedAccounts": null }]
                }]
            }]
        });

        let normalized = normalize_json(&raw, &catalog());
        let partner = &normalized.regions[0].partners[0];
        assert!(partner.projects.is_empty());
        let contact = &partner.contacts[0];
        assert!(contact.verticals.is_empty());
        assert!(contact.named_accounts.is_empty());
        assert_eq!(contact.territory, "");
    }

    #[test]
    fn normalize_json_tolerates_garbage_roots() {
        for raw in [json!(null), json!([1, 2]), json!({ "regions": "nope" })] {
            let normalized = normalize_json(&raw, &catalog());
            assert_eq!(normalized.regions.len(), 2);
            assert_eq!(normalized.partner_count(), 0);
        }
    }

    #[test]
    fn normalize_json_drops_non_object_partners() {
        let raw = json!({
            "regions": [{ "id": "bre", "partners": ["oops", { "name": "Kept" }] }]
        });
        let normalized = normalize_json(&raw, &catalog());
        assert_eq!(normalized.regions[1].partners.len(), 1);
        assert_eq!(normalized.regions[1].partners[0].name, "Kept");
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = json!({
            "regions": [
                { "id": "legacy", "name": "Bretagne", "partners": [{ "name": "Acme" }] },
                { "id": "nor", "partners": null }
            ]
        });
        let once = normalize_json(&raw, &catalog());
        let twice = normalize_document(&once, &catalog());
        assert_eq!(once, twice);

        let reparsed = normalize_json(&serde_json::to_value(&once).unwrap(), &catalog());
        assert_eq!(once, reparsed);
    }

    #[test]
    fn sample_document_seeds_one_partner_per_region() {
        let sample = sample_document(&catalog());
        assert_eq!(sample.regions.len(), 2);
        for region in &sample.regions {
            assert_eq!(region.partners.len(), 1);
            assert_eq!(region.partners[0].name, "Test");
            assert_eq!(region.partners[0].city, region.name);
        }
    }

    #[test]
    fn resolve_region_falls_back_to_catalog_name() {
        let document = PartnerDocument::new(vec![Region::new("legacy", "Bretagne")]);
        let region = resolve_region(&document, &catalog(), "bre").unwrap();
        assert_eq!(region.id, "legacy");
        assert!(resolve_region(&document, &catalog(), "missing").is_none());
    }
}
