//! Delimited text parsing for partner imports.
//!
//! # Responsibility
//! - Detect the delimiter and split text into header-keyed rows.
//! - Never fail: unreadable records are skipped.
//!
//! # Invariants
//! - Header keys are trimmed and lowercased; values are trimmed.
//! - Every row carries every header key (missing trailing cells are `""`).

use csv::{ReaderBuilder, Trim};
use log::debug;
use std::collections::HashMap;

const UTF8_BOM: char = '\u{feff}';

/// One data line of an import file, keyed by lowercased header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRow {
    fields: HashMap<String, String>,
}

impl ImportRow {
    /// Builds a row from `(header, value)` pairs; headers are matched ignoring case.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            fields: pairs
                .into_iter()
                .map(|(key, value)| (normalize_header(key), value.trim().to_string()))
                .collect(),
        }
    }

    /// Returns the first non-empty value among `aliases`, or `""`.
    pub fn value(&self, aliases: &[&str]) -> &str {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(&normalize_header(alias)))
            .map(String::as_str)
            .find(|value| !value.is_empty())
            .unwrap_or_default()
    }

    fn is_blank(&self) -> bool {
        self.fields.values().all(|value| value.is_empty())
    }
}

/// Returns `b';'` when the header line contains a semicolon, else `b','`.
pub fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    if header.contains(';') {
        b';'
    } else {
        b','
    }
}

/// Splits import text into rows keyed by the header line.
///
/// Empty input and header-only input both yield no rows. Double-quoted cells
/// may contain the delimiter.
pub fn parse_rows(text: &str) -> Vec<ImportRow> {
    let trimmed = text.trim_start_matches(UTF8_BOM).trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(detect_delimiter(trimmed))
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(trimmed.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(record) => record.iter().map(normalize_header).collect(),
        Err(err) => {
            debug!(
                "event=import_parse module=import status=error stage=header error={}",
                err
            );
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    for (line_index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                debug!(
                    "event=import_parse module=import status=skip row={} error={}",
                    line_index + 1,
                    err
                );
                continue;
            }
        };

        let fields = headers
            .iter()
            .enumerate()
            .map(|(column, header)| {
                let value = record.get(column).unwrap_or_default();
                (header.clone(), value.trim().to_string())
            })
            .collect();
        let row = ImportRow { fields };

        if row.is_blank() {
            continue;
        }
        rows.push(row);
    }

    rows
}

/// Splits a `,`/`;` separated list, trimming entries and dropping empty ones.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(|c: char| c == ',' || c == ';')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize_header(value: &str) -> String {
    value.trim().trim_start_matches(UTF8_BOM).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{detect_delimiter, parse_rows, split_list};

    #[test]
    fn delimiter_follows_header_line() {
        assert_eq!(detect_delimiter("region;partner\nA,B;C"), b';');
        assert_eq!(detect_delimiter("region,partner\nA;B,C"), b',');
    }

    #[test]
    fn empty_and_header_only_inputs_yield_no_rows() {
        assert!(parse_rows("").is_empty());
        assert!(parse_rows("   \n  ").is_empty());
        assert!(parse_rows("region,partner,email").is_empty());
        assert!(parse_rows("region,partner,email\n\n").is_empty());
    }

    #[test]
    fn ragged_rows_fill_missing_cells_with_empty_strings() {
        let rows = parse_rows("region;partner;email\nBretagne;Acme\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value(&["region"]), "Bretagne");
        assert_eq!(rows[0].value(&["email"]), "");
    }

    #[test]
    fn headers_match_ignoring_case_and_values_are_trimmed() {
        let rows = parse_rows("Region , FirstName\n  Bretagne  , Ada ");
        assert_eq!(rows[0].value(&["region"]), "Bretagne");
        assert_eq!(rows[0].value(&["firstName"]), "Ada");
    }

    #[test]
    fn quoted_cells_keep_embedded_delimiters() {
        let rows = parse_rows("region,partner,account\nBretagne,Acme,\"Foo, Bar\"");
        assert_eq!(rows[0].value(&["account"]), "Foo, Bar");
    }

    #[test]
    fn blank_lines_between_rows_are_skipped() {
        let rows = parse_rows("region,partner\nA,B\n\n,\nC,D\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].value(&["partner"]), "D");
    }

    #[test]
    fn leading_bom_is_ignored() {
        let rows = parse_rows("\u{feff}region,partner\nA,B");
        assert_eq!(rows[0].value(&["region"]), "A");
    }

    #[test]
    fn split_list_handles_both_separators() {
        assert_eq!(
            split_list(" Foo, Bar ;; baz ,"),
            vec!["Foo".to_string(), "Bar".to_string(), "baz".to_string()]
        );
        assert!(split_list("").is_empty());
    }
}
