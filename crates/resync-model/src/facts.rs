//! Output fact records: one struct per batch row shape.
//!
//! Facts are built fresh each run, never mutated after construction, and
//! dropped once exported. An `import_id` of `None` marks a fact that has
//! not yet been confirmed net-new; assembly fills the field in bulk just
//! before export.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Comment stamped on attribute facts derived from the source feed.
pub const SOURCE_COMMENT: &str = "Source: Live Alumni";
/// Custom-field category whose rows link target constituents to source ids.
pub const LINK_CATEGORY: &str = "Live Alumni ID";
/// Comment stamped on contact facts derived from the source feed.
pub const CAPTURED_COMMENT: &str = "Captured from Live Alumni";
/// Relationship literals the target expects on employment rows.
pub const RECIPROCAL_EMPLOYEE: &str = "Employee";
pub const RELATIONSHIP_EMPLOYER: &str = "Employer";
/// Address type recorded for source-derived address updates.
pub const ADDRESS_TYPE_LINKEDIN: &str = "LinkedIn";

/// Employment fact for one linked pair.
///
/// Carries the matched organisation's existing import id on an update, or a
/// freshly allocated one when the employer was not recognized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationUpdate {
    pub cons_id: i64,
    pub import_id: String,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub income: Option<String>,
    pub industry: Option<String>,
    pub is_employee: bool,
    pub is_primary: Option<bool>,
    pub full_name: String,
    pub notes: Option<String>,
    pub position: Option<String>,
    pub profession: Option<String>,
    pub reciprocal: String,
    pub relationship: String,
}

/// (category, description) attribute fact tagged to a parent organisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgAttribute {
    pub parent_import_id: String,
    pub import_id: Option<String>,
    pub category: String,
    pub date: Option<NaiveDate>,
    pub description: String,
    pub comment: String,
}

/// Which contact stream a fact belongs to; decides its slot-label prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    LinkedIn,
    Email,
}

impl ContactKind {
    /// Prefix used in target-side contact type labels ("LinkedIn 2").
    pub fn label(self) -> &'static str {
        match self {
            ContactKind::LinkedIn => "LinkedIn",
            ContactKind::Email => "Email",
        }
    }
}

/// Contact fact (cleaned LinkedIn handle or lower-cased email).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub kind: ContactKind,
    /// Slot label such as "LinkedIn 1"; assigned during reconciliation.
    pub type_label: Option<String>,
    pub import_id: Option<String>,
    pub cons_id: i64,
    pub is_inactive: bool,
    pub is_primary: bool,
    pub comments: String,
    pub value: String,
}

/// Address fact for a target constituent whose location moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressUpdate {
    pub import_id: Option<String>,
    pub cons_id: i64,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub preferred: bool,
    pub address_type: String,
}

/// Generic attribute fact on a target constituent.
///
/// Used for Verified Email / Verified Location / Sync source provenance
/// rows and for newly discovered source links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub import_id: Option<String>,
    pub category: String,
    pub comment: Option<String>,
    pub cons_id: i64,
    pub date: Option<NaiveDate>,
    pub description: String,
}

/// Everything one reconciliation run assembles for export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncBatches {
    pub organizations: Vec<OrganizationUpdate>,
    pub org_attributes: Vec<OrgAttribute>,
    pub contacts: Vec<Contact>,
    pub addresses: Vec<AddressUpdate>,
    pub custom_fields: Vec<CustomField>,
}

/// Per-batch record counts for run summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCounts {
    pub organizations: usize,
    pub org_attributes: usize,
    pub contacts: usize,
    pub addresses: usize,
    pub custom_fields: usize,
}

impl SyncBatches {
    pub fn counts(&self) -> BatchCounts {
        BatchCounts {
            organizations: self.organizations.len(),
            org_attributes: self.org_attributes.len(),
            contacts: self.contacts.len(),
            addresses: self.addresses.len(),
            custom_fields: self.custom_fields.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
            && self.org_attributes.is_empty()
            && self.contacts.is_empty()
            && self.addresses.is_empty()
            && self.custom_fields.is_empty()
    }
}
