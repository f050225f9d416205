//! Directory-wide search over projects and named accounts.
//!
//! # Responsibility
//! - Find projects by name and contacts by named account across all regions.
//!
//! # Invariants
//! - Queries are trimmed and matched as case-insensitive substrings.
//! - A blank query returns no hits.
//! - Hits follow document order: region, partner, then entry.

use crate::model::document::PartnerDocument;
use crate::model::partner::{Contact, PartnerId, Project};

/// One project whose name matched the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectHit<'doc> {
    pub region_id: &'doc str,
    pub region_name: &'doc str,
    pub partner_id: PartnerId,
    pub partner_name: &'doc str,
    pub project: &'doc Project,
}

/// One named account that matched the query, with its owning contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountHit<'doc> {
    pub account_name: &'doc str,
    pub region_id: &'doc str,
    pub region_name: &'doc str,
    pub partner_id: PartnerId,
    pub partner_name: &'doc str,
    pub contact: &'doc Contact,
}

pub fn search_projects<'doc>(document: &'doc PartnerDocument, query: &str) -> Vec<ProjectHit<'doc>> {
    let Some(needle) = normalize_query(query) else {
        return Vec::new();
    };

    let mut hits = Vec::new();
    for region in &document.regions {
        for partner in &region.partners {
            for project in &partner.projects {
                if project.name.to_lowercase().contains(&needle) {
                    hits.push(ProjectHit {
                        region_id: &region.id,
                        region_name: &region.name,
                        partner_id: partner.id,
                        partner_name: &partner.name,
                        project,
                    });
                }
            }
        }
    }
    hits
}

pub fn search_accounts<'doc>(document: &'doc PartnerDocument, query: &str) -> Vec<AccountHit<'doc>> {
    let Some(needle) = normalize_query(query) else {
        return Vec::new();
    };

    let mut hits = Vec::new();
    for region in &document.regions {
        for partner in &region.partners {
            for contact in &partner.contacts {
                for account in &contact.named_accounts {
                    if account.to_lowercase().contains(&needle) {
                        hits.push(AccountHit {
                            account_name: account,
                            region_id: &region.id,
                            region_name: &region.name,
                            partner_id: partner.id,
                            partner_name: &partner.name,
                            contact,
                        });
                    }
                }
            }
        }
    }
    hits
}

fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
