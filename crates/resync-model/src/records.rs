//! Snapshot-side records: what the read interface hands the engine.
//!
//! These mirror the shape of the target and source exports, not the output
//! batches. Optional fields stay optional here; substitution rules live in
//! the engine's normalizer.

use serde::{Deserialize, Serialize};

/// One association between a target constituent and a source person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityLink {
    pub target_id: i64,
    pub source_id: i64,
}

/// Current-employment row from the source feed.
///
/// Numeric fields arrive as raw cell text; the feed mixes integers, floats
/// and free text in the same columns, so parsing (with sentinels) is the
/// normalizer's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmploymentRecord {
    pub company_name: Option<String>,
    pub standardized_name: Option<String>,
    pub title: Option<String>,
    pub start_year: Option<String>,
    pub start_month: Option<String>,
    pub end_year: Option<String>,
    pub end_month: Option<String>,
    pub company_industry: Option<String>,
    pub is_primary: Option<bool>,
    pub title_is_senior: Option<String>,
    pub salary_min: Option<String>,
    pub salary_max: Option<String>,
    pub company_type: Option<String>,
    pub company_size: Option<String>,
    pub company_sector: Option<String>,
    pub headline: Option<String>,
}

/// Existing organisation relationship on the target side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgRelationship {
    pub full_name: Option<String>,
    pub import_id: String,
}

/// Existing attribute row scoped to a parent organisation relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub parent_import_id: String,
    pub import_id: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub comment: Option<String>,
}

/// Contact columns of one source person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceContacts {
    pub url: Option<String>,
    pub business_email: Option<String>,
    pub personal_email: Option<String>,
}

/// Location columns of one source person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Preferred address on file for a target constituent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Link-discovery inputs for one source person.
///
/// `direct_target_ids` lists the constituent-id columns the feed carries,
/// in priority order; the first entry wins when several are populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkHint {
    pub source_id: i64,
    pub direct_target_ids: Vec<i64>,
    pub url: Option<String>,
}
