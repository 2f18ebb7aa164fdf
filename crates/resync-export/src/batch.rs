//! Per-batch column schemas and cell rendering.
//!
//! Column order and cell spellings are part of the contract with the
//! downstream ingestion tool: booleans render `True`/`False`, absent values
//! render as empty (quoted) fields, dates as `%d-%b-%Y`.

use chrono::NaiveDate;

use resync_model::{AddressUpdate, Contact, CustomField, OrgAttribute, OrganizationUpdate};

pub const ORGANIZATIONS_FILE: &str = "Organisations.csv";
pub const ORG_ATTRIBUTES_FILE: &str = "Organisation Attributes.csv";
pub const PHONES_FILE: &str = "Phones.csv";
pub const ADDRESSES_FILE: &str = "Address.csv";
pub const CUSTOM_FIELDS_FILE: &str = "Custom_Fields.csv";
pub const NEW_LINKS_FILE: &str = "New Live Alumni Matches.csv";

pub const ORGANIZATION_COLUMNS: [&str; 14] = [
    "ConsID",
    "ORImpID",
    "ORFromDate",
    "ORToDate",
    "ORIncome",
    "ORIndustry",
    "ORIsEmp",
    "ORIsPrimary",
    "ORFullName",
    "ORNotes",
    "ORPos",
    "ORProf",
    "ORRecip",
    "ORRelat",
];

pub const ORG_ATTRIBUTE_COLUMNS: [&str; 6] = [
    "ORAttrORImpID",
    "ORAttrImpID",
    "ORAttrCat",
    "ORAttrDate",
    "ORAttrDesc",
    "ORAttrCom",
];

pub const PHONE_COLUMNS: [&str; 7] = [
    "PhoneType",
    "PhoneImpID",
    "ConsID",
    "PhoneIsInactive",
    "PhoneIsPrimary",
    "PhoneComments",
    "PhoneNum",
];

pub const ADDRESS_COLUMNS: [&str; 8] = [
    "AddrImpID",
    "ConsID",
    "AddrCity",
    "AddrCounty",
    "AddrState",
    "AddrCountry",
    "PrefAddr",
    "AddrType",
];

pub const CUSTOM_FIELD_COLUMNS: [&str; 6] = [
    "CAttrImpID",
    "CAttrCat",
    "CAttrCom",
    "ConsID",
    "CAttrDate",
    "CAttrDesc",
];

pub fn organization_row(org: &OrganizationUpdate) -> Vec<String> {
    vec![
        org.cons_id.to_string(),
        org.import_id.clone(),
        date_cell(org.from_date),
        date_cell(org.to_date),
        opt_cell(org.income.as_deref()),
        opt_cell(org.industry.as_deref()),
        bool_cell(org.is_employee),
        opt_bool_cell(org.is_primary),
        org.full_name.clone(),
        opt_cell(org.notes.as_deref()),
        opt_cell(org.position.as_deref()),
        opt_cell(org.profession.as_deref()),
        org.reciprocal.clone(),
        org.relationship.clone(),
    ]
}

pub fn org_attribute_row(attr: &OrgAttribute) -> Vec<String> {
    vec![
        attr.parent_import_id.clone(),
        opt_cell(attr.import_id.as_deref()),
        attr.category.clone(),
        date_cell(attr.date),
        attr.description.clone(),
        attr.comment.clone(),
    ]
}

pub fn phone_row(contact: &Contact) -> Vec<String> {
    vec![
        opt_cell(contact.type_label.as_deref()),
        opt_cell(contact.import_id.as_deref()),
        contact.cons_id.to_string(),
        bool_cell(contact.is_inactive),
        bool_cell(contact.is_primary),
        contact.comments.clone(),
        contact.value.clone(),
    ]
}

pub fn address_row(address: &AddressUpdate) -> Vec<String> {
    vec![
        opt_cell(address.import_id.as_deref()),
        address.cons_id.to_string(),
        opt_cell(address.city.as_deref()),
        opt_cell(address.county.as_deref()),
        opt_cell(address.state.as_deref()),
        opt_cell(address.country.as_deref()),
        bool_cell(address.preferred),
        address.address_type.clone(),
    ]
}

pub fn custom_field_row(field: &CustomField) -> Vec<String> {
    vec![
        opt_cell(field.import_id.as_deref()),
        field.category.clone(),
        opt_cell(field.comment.as_deref()),
        field.cons_id.to_string(),
        date_cell(field.date),
        field.description.clone(),
    ]
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d-%b-%Y").to_string())
        .unwrap_or_default()
}

fn bool_cell(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}

fn opt_bool_cell(value: Option<bool>) -> String {
    value.map(bool_cell).unwrap_or_default()
}

fn opt_cell(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}
