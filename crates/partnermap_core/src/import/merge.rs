//! Merge of imported rows into the partner hierarchy.
//!
//! # Responsibility
//! - Route rows to regions and partners, creating partners on demand.
//! - Merge contact rows into existing contacts without losing data.
//!
//! # Invariants
//! - Empty imported values never overwrite stored values.
//! - `named_accounts` stays unique ignoring case; first-seen casing wins.
//! - Rows are applied in input order.

use super::parser::{split_list, ImportRow};
use crate::model::document::PartnerDocument;
use crate::model::partner::{Contact, Partner, PartnerStatus};

const REGION_COLUMNS: &[&str] = &["region"];
const PARTNER_COLUMNS: &[&str] = &["partner"];
const CITY_COLUMNS: &[&str] = &["city"];
const ADDRESS_COLUMNS: &[&str] = &["address"];
const STATUS_COLUMNS: &[&str] = &["status"];
const FIRST_NAME_COLUMNS: &[&str] = &["firstName"];
const LAST_NAME_COLUMNS: &[&str] = &["lastName"];
const TITLE_COLUMNS: &[&str] = &["title"];
const EMAIL_COLUMNS: &[&str] = &["email"];
const PHONE_COLUMNS: &[&str] = &["phone"];
const ACCOUNT_COLUMNS: &[&str] = &["account", "accounts", "namedAccounts"];

/// Counters describing one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub rows_parsed: usize,
    pub rows_applied: usize,
    pub skipped_unknown_region: usize,
    pub skipped_missing_partner: usize,
    pub skipped_empty_contact: usize,
    pub partners_created: usize,
    pub contacts_created: usize,
    pub contacts_merged: usize,
}

impl ImportReport {
    /// Whether the run touched the document at all.
    pub fn changed(&self) -> bool {
        self.partners_created > 0 || self.rows_applied > 0
    }
}

/// Contact fields carried by one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ContactCandidate {
    first_name: String,
    last_name: String,
    title: String,
    email: String,
    phone: String,
    named_accounts: Vec<String>,
}

impl ContactCandidate {
    fn from_row(row: &ImportRow) -> Self {
        Self {
            first_name: row.value(FIRST_NAME_COLUMNS).to_string(),
            last_name: row.value(LAST_NAME_COLUMNS).to_string(),
            title: row.value(TITLE_COLUMNS).to_string(),
            email: row.value(EMAIL_COLUMNS).to_string(),
            phone: row.value(PHONE_COLUMNS).to_string(),
            named_accounts: split_list(row.value(ACCOUNT_COLUMNS)),
        }
    }

    /// A row with no name, email, phone or account would only add noise.
    fn is_empty(&self) -> bool {
        self.first_name.is_empty()
            && self.last_name.is_empty()
            && self.email.is_empty()
            && self.phone.is_empty()
            && self.named_accounts.is_empty()
    }

    fn into_contact(self) -> Contact {
        Contact {
            first_name: self.first_name,
            last_name: self.last_name,
            title: self.title,
            email: self.email,
            phone: self.phone,
            named_accounts: merge_accounts(&[], &self.named_accounts),
            ..Contact::new()
        }
    }
}

/// Applies parsed rows to `document` in order and reports what happened.
pub fn apply_rows(document: &mut PartnerDocument, rows: &[ImportRow]) -> ImportReport {
    let mut report = ImportReport {
        rows_parsed: rows.len(),
        ..ImportReport::default()
    };

    for row in rows {
        apply_row(document, row, &mut report);
    }

    report
}

fn apply_row(document: &mut PartnerDocument, row: &ImportRow, report: &mut ImportReport) {
    let region_name = row.value(REGION_COLUMNS);
    let Some(region) = document
        .regions
        .iter_mut()
        .find(|region| !region_name.is_empty() && region.name.trim() == region_name)
    else {
        report.skipped_unknown_region += 1;
        return;
    };

    let partner_name = row.value(PARTNER_COLUMNS);
    if partner_name.is_empty() {
        report.skipped_missing_partner += 1;
        return;
    }

    let partner_index = match region
        .partners
        .iter()
        .position(|partner| partner.name.trim() == partner_name)
    {
        Some(index) => index,
        None => {
            let mut partner = Partner::new(partner_name);
            partner.city = row.value(CITY_COLUMNS).to_string();
            partner.address = row.value(ADDRESS_COLUMNS).to_string();
            partner.status = PartnerStatus::parse(row.value(STATUS_COLUMNS)).unwrap_or_default();
            region.partners.push(partner);
            report.partners_created += 1;
            region.partners.len() - 1
        }
    };
    let partner = &mut region.partners[partner_index];

    let candidate = ContactCandidate::from_row(row);
    if candidate.is_empty() {
        report.skipped_empty_contact += 1;
        return;
    }

    match find_matching_contact(&partner.contacts, &candidate) {
        Some(index) => {
            merge_into(&mut partner.contacts[index], candidate);
            report.contacts_merged += 1;
        }
        None => {
            partner.contacts.push(candidate.into_contact());
            report.contacts_created += 1;
        }
    }
    report.rows_applied += 1;
}

/// Email match across all contacts first, then the first/last name pair
/// among contacts whose email cannot contradict the row's.
fn find_matching_contact(contacts: &[Contact], candidate: &ContactCandidate) -> Option<usize> {
    let email = candidate.email.trim().to_lowercase();
    if !email.is_empty() {
        let by_email = contacts
            .iter()
            .position(|contact| contact.email.trim().to_lowercase() == email);
        if by_email.is_some() {
            return by_email;
        }
    }

    let first = candidate.first_name.trim().to_lowercase();
    let last = candidate.last_name.trim().to_lowercase();
    if first.is_empty() || last.is_empty() {
        return None;
    }

    // Two non-empty emails that differ identify different people.
    contacts.iter().position(|contact| {
        if !email.is_empty() && !contact.email.trim().is_empty() {
            return false;
        }
        let contact_first = contact.first_name.trim().to_lowercase();
        let contact_last = contact.last_name.trim().to_lowercase();
        !contact_first.is_empty()
            && !contact_last.is_empty()
            && contact_first == first
            && contact_last == last
    })
}

fn merge_into(existing: &mut Contact, candidate: ContactCandidate) {
    overwrite_if_present(&mut existing.first_name, candidate.first_name);
    overwrite_if_present(&mut existing.last_name, candidate.last_name);
    overwrite_if_present(&mut existing.title, candidate.title);
    overwrite_if_present(&mut existing.email, candidate.email);
    overwrite_if_present(&mut existing.phone, candidate.phone);
    existing.named_accounts = merge_accounts(&existing.named_accounts, &candidate.named_accounts);
}

fn overwrite_if_present(target: &mut String, value: String) {
    if !value.is_empty() {
        *target = value;
    }
}

/// Unions two account lists ignoring case, keeping first-seen casing and order.
pub fn merge_accounts(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(existing.len() + incoming.len());
    for account in existing.iter().chain(incoming) {
        let account = account.trim();
        if account.is_empty() {
            continue;
        }
        let lowered = account.to_lowercase();
        if merged.iter().any(|kept| kept.to_lowercase() == lowered) {
            continue;
        }
        merged.push(account.to_string());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::merge_accounts;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn merge_accounts_keeps_first_casing_and_order() {
        let merged = merge_accounts(&strings(&["Foo", "Bar"]), &strings(&["bar", "Baz"]));
        assert_eq!(merged, strings(&["Foo", "Bar", "Baz"]));
    }

    #[test]
    fn merge_accounts_dedupes_within_one_list() {
        let merged = merge_accounts(&[], &strings(&["ACME", " acme ", "", "Globex"]));
        assert_eq!(merged, strings(&["ACME", "Globex"]));
    }
}
