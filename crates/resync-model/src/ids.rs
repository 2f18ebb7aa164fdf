//! Record kinds and import identifier formatting.
//!
//! Every record batch destined for the target system carries an import
//! identifier in the target's `DDDDD-DDD-DDDDDDDDDD` format. Raw identifiers
//! are plain integers; formatting groups the decimal string as the first
//! five characters, the next three, and the last ten.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Offset added to the highest identifier observed in the target store.
///
/// Keeps machine-allocated identifiers clear of the range used by records
/// entered through the target's own UI.
pub const IMPORT_ID_GAP: u64 = 9_999_999_999;

/// The five output record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Organization,
    OrganizationAttribute,
    Contact,
    Address,
    CustomField,
}

/// Allocator configuration for one record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSpec {
    /// Target-side table holding existing records of this kind.
    pub table: &'static str,
    /// Column holding the formatted import identifier.
    pub id_column: &'static str,
    /// Gap added to the observed maximum when seeding the allocator.
    pub gap: u64,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Organization,
        RecordKind::OrganizationAttribute,
        RecordKind::Contact,
        RecordKind::Address,
        RecordKind::CustomField,
    ];

    pub fn spec(self) -> KindSpec {
        match self {
            RecordKind::Organization => KindSpec {
                table: "Org_Relationships",
                id_column: "ORImpID",
                gap: IMPORT_ID_GAP,
            },
            RecordKind::OrganizationAttribute => KindSpec {
                table: "Org_Relationship_Attributes",
                id_column: "ORAttrImpID",
                gap: IMPORT_ID_GAP,
            },
            RecordKind::Contact => KindSpec {
                table: "Phone_List",
                id_column: "PhoneImpID",
                gap: IMPORT_ID_GAP,
            },
            RecordKind::Address => KindSpec {
                table: "Addresses",
                id_column: "AddrImpID",
                gap: IMPORT_ID_GAP,
            },
            RecordKind::CustomField => KindSpec {
                table: "Custom_Fields",
                id_column: "CAttrImpID",
                gap: IMPORT_ID_GAP,
            },
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RecordKind::Organization => "organization",
            RecordKind::OrganizationAttribute => "organization_attribute",
            RecordKind::Contact => "contact",
            RecordKind::Address => "address",
            RecordKind::CustomField => "custom_field",
        };
        f.write_str(name)
    }
}

/// Errors from reading identifiers out of target-side cells.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportIdError {
    #[error("import id '{0}' contains no digits")]
    NoDigits(String),
    #[error("import id '{0}' exceeds the supported numeric range")]
    OutOfRange(String),
}

/// Format a raw identifier as `DDDDD-DDD-DDDDDDDDDD`.
///
/// Grouping follows the target's import format: characters 0-4 of the
/// decimal string, characters 5-7, then the last ten characters. Groups
/// overlap for strings shorter than 18 digits; the target tooling only
/// compares the strings, never reassembles them.
pub fn format_import_id(raw: u64) -> String {
    let digits = raw.to_string();
    let first = &digits[..digits.len().min(5)];
    let mid = &digits[digits.len().min(5)..digits.len().min(8)];
    let last = &digits[digits.len().saturating_sub(10)..];
    format!("{first}-{mid}-{last}")
}

/// Recover the raw integer from a formatted identifier cell.
///
/// Strips every non-digit character (dashes, stray whitespace) and parses
/// the remainder, matching how the target store is queried for its maximum
/// identifier.
pub fn parse_raw_id(text: &str) -> Result<u64, ImportIdError> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(ImportIdError::NoDigits(text.to_string()));
    }
    digits
        .parse::<u64>()
        .map_err(|_| ImportIdError::OutOfRange(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_ten_digit_raw() {
        assert_eq!(format_import_id(1234567890), "12345-678-1234567890");
    }

    #[test]
    fn formats_post_gap_raw() {
        // 10-digit observed maximum plus the gap lands at eleven digits.
        assert_eq!(format_import_id(19_999_999_998), "19999-999-9999999998");
    }

    #[test]
    fn formats_short_raw_without_panicking() {
        assert_eq!(format_import_id(42), "42--42");
    }

    #[test]
    fn parses_formatted_id() {
        assert_eq!(parse_raw_id("10001-001-0000000001"), Ok(100010010000000001));
    }

    #[test]
    fn parse_rejects_digitless_cell() {
        assert_eq!(
            parse_raw_id("n/a"),
            Err(ImportIdError::NoDigits("n/a".to_string()))
        );
    }

    #[test]
    fn kind_specs_are_distinct() {
        let mut tables: Vec<&str> = RecordKind::ALL.iter().map(|k| k.spec().table).collect();
        tables.sort_unstable();
        tables.dedup();
        assert_eq!(tables.len(), RecordKind::ALL.len());
    }
}
