//! CSV-backed snapshot store.
//!
//! Loads a folder of snapshot exports into memory and serves the read
//! interface from it. `Live Alumni.csv`, `Custom Fields.csv` and
//! `Phone List.csv` must be present; the remaining files load when present
//! and only fail the run if a phase actually needs them.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use tracing::{debug, warn};

use resync_model::{
    AddressRecord, AttributeRecord, EmploymentRecord, EntityLink, LINK_CATEGORY, LinkHint,
    OrgRelationship, RecordKind, SourceContacts, SourceLocation, parse_raw_id,
};

use crate::cell::{clean, parse_flag, parse_int_lossy, slot_suffix};
use crate::error::{Result, StoreError};
use crate::snapshot::SnapshotStore;

pub const LIVE_ALUMNI_FILE: &str = "Live Alumni.csv";
pub const CUSTOM_FIELDS_FILE: &str = "Custom Fields.csv";
pub const PHONE_LIST_FILE: &str = "Phone List.csv";
pub const ORG_RELATIONSHIPS_FILE: &str = "Org Relationships.csv";
pub const ORG_ATTRIBUTES_FILE: &str = "Org Relationship Attributes.csv";
pub const ADDRESSES_FILE: &str = "Addresses.csv";
pub const COUNTRY_MAPPING_FILE: &str = "Country Mapping.csv";

const DIRECT_ID_COLUMNS: [&str; 3] = [
    "Person Constituent ID",
    "Person Level 1 Constituent ID",
    "Person Level 2 Constituent ID",
];

/// One loaded CSV file: header index plus cleaned cells in row order.
#[derive(Debug)]
struct Table {
    file: &'static str,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    fn load(dir: &Path, file: &'static str) -> Result<Self> {
        let path = dir.join(file);
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
        // Exports pass through spreadsheet tools with legacy encodings, so
        // cells are decoded lossily rather than rejected.
        let headers = reader
            .byte_headers()
            .map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?
            .clone();
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(position, name)| (String::from_utf8_lossy(name).trim().to_string(), position))
            .collect();
        let mut rows = Vec::new();
        for record in reader.byte_records() {
            let record = record.map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
            let mut cells = vec![None; index.len()];
            for (position, value) in record.iter().enumerate() {
                if position < cells.len() {
                    cells[position] = clean(&String::from_utf8_lossy(value));
                }
            }
            rows.push(cells);
        }
        debug!(file, rows = rows.len(), "loaded snapshot table");
        Ok(Self { file, index, rows })
    }

    fn require_columns(&self, columns: &[&str]) -> Result<()> {
        for column in columns {
            if !self.index.contains_key(*column) {
                return Err(StoreError::MissingColumn {
                    file: self.file.to_string(),
                    column: (*column).to_string(),
                });
            }
        }
        Ok(())
    }

    fn get<'a>(&self, row: &'a [Option<String>], column: &str) -> Option<&'a str> {
        self.index
            .get(column)
            .and_then(|&position| row.get(position))
            .and_then(|cell| cell.as_deref())
    }

    fn owned(&self, row: &[Option<String>], column: &str) -> Option<String> {
        self.get(row, column).map(str::to_string)
    }

    /// Rows whose integer `column` equals `id`, in file order.
    fn rows_for<'a>(
        &'a self,
        column: &'a str,
        id: i64,
    ) -> impl Iterator<Item = &'a [Option<String>]> + 'a {
        self.rows.iter().filter_map(move |row| {
            let value = self.get(row, column)?;
            (parse_int_lossy(value) == Some(id)).then_some(row.as_slice())
        })
    }
}

#[derive(Debug)]
pub struct CsvSnapshotStore {
    live_alumni: Table,
    custom_fields: Table,
    phone_list: Table,
    org_relationships: Option<Table>,
    org_attributes: Option<Table>,
    addresses: Option<Table>,
    country_mapping: Option<Table>,
}

impl CsvSnapshotStore {
    /// Load the snapshot folder.
    ///
    /// # Errors
    ///
    /// Fails when a required file is absent or unreadable, or when a loaded
    /// file lacks one of the columns the engine keys on.
    pub fn open(dir: &Path) -> Result<Self> {
        let live_alumni = required(dir, LIVE_ALUMNI_FILE, &["personid"])?;
        let custom_fields = required(
            dir,
            CUSTOM_FIELDS_FILE,
            &["ConsID", "CAttrCat", "CAttrDesc"],
        )?;
        let phone_list = required(dir, PHONE_LIST_FILE, &["ConsID", "PhoneType", "PhoneNum"])?;
        let org_relationships = optional(
            dir,
            ORG_RELATIONSHIPS_FILE,
            &["ConsID", "ORFullName", "ORImpID"],
        )?;
        let org_attributes = optional(
            dir,
            ORG_ATTRIBUTES_FILE,
            &["ORAttrORImpID", "ORAttrCat", "ORAttrDesc"],
        )?;
        let addresses = optional(dir, ADDRESSES_FILE, &["ConsID", "PrefAddr"])?;
        let country_mapping = optional(
            dir,
            COUNTRY_MAPPING_FILE,
            &["Country in Live Alumni", "Country in Raisers Edge"],
        )?;
        Ok(Self {
            live_alumni,
            custom_fields,
            phone_list,
            org_relationships,
            org_attributes,
            addresses,
            country_mapping,
        })
    }

    fn table<'a>(&self, table: &'a Option<Table>, file: &'static str) -> Result<&'a Table> {
        table
            .as_ref()
            .ok_or_else(|| StoreError::MissingFile(file.to_string()))
    }

    /// The source row employment data is read from: the first row flagged
    /// current, falling back to the feed's first row for the person.
    fn employment_row(&self, source_id: i64) -> Option<&[Option<String>]> {
        let mut first = None;
        for row in self.live_alumni.rows_for("personid", source_id) {
            if first.is_none() {
                first = Some(row);
            }
            let current = self
                .live_alumni
                .get(row, "Employment Position Is Current")
                .and_then(parse_flag);
            if current == Some(true) {
                return Some(row);
            }
        }
        first
    }
}

fn required(dir: &Path, file: &'static str, columns: &[&str]) -> Result<Table> {
    if !dir.join(file).is_file() {
        return Err(StoreError::MissingFile(file.to_string()));
    }
    let table = Table::load(dir, file)?;
    table.require_columns(columns)?;
    Ok(table)
}

fn optional(dir: &Path, file: &'static str, columns: &[&str]) -> Result<Option<Table>> {
    if !dir.join(file).is_file() {
        debug!(file, "snapshot file not present");
        return Ok(None);
    }
    let table = Table::load(dir, file)?;
    table.require_columns(columns)?;
    Ok(Some(table))
}

impl SnapshotStore for CsvSnapshotStore {
    fn entity_links(&self) -> Result<Vec<EntityLink>> {
        let mut links = Vec::new();
        for row in &self.custom_fields.rows {
            if self.custom_fields.get(row, "CAttrCat") != Some(LINK_CATEGORY) {
                continue;
            }
            let target = self
                .custom_fields
                .get(row, "ConsID")
                .and_then(parse_int_lossy);
            let source = self
                .custom_fields
                .get(row, "CAttrDesc")
                .and_then(parse_int_lossy);
            match (target, source) {
                (Some(target_id), Some(source_id)) => links.push(EntityLink {
                    target_id,
                    source_id,
                }),
                (Some(target_id), None) => {
                    debug!(target_id, "link row without resolvable source id, skipping");
                }
                (None, _) => warn!("link row without target id, skipping"),
            }
        }
        Ok(links)
    }

    fn current_employment(&self, source_id: i64) -> Result<Option<EmploymentRecord>> {
        let Some(row) = self.employment_row(source_id) else {
            return Ok(None);
        };
        let table = &self.live_alumni;
        Ok(Some(EmploymentRecord {
            company_name: table.owned(row, "Employment Company Name"),
            standardized_name: table.owned(row, "Company Record Standardized Name"),
            title: table.owned(row, "Employment Title"),
            start_year: table.owned(row, "Employment Start Year"),
            start_month: table.owned(row, "Employment Start Month"),
            end_year: table.owned(row, "Employment End Year"),
            end_month: table.owned(row, "Employment End Month"),
            company_industry: table.owned(row, "Company Industry Name"),
            is_primary: table
                .get(row, "Employment Position Is Primary")
                .and_then(parse_flag),
            title_is_senior: table.owned(row, "Employment Title Is Senior"),
            salary_min: table.owned(row, "Employment Salary Min"),
            salary_max: table.owned(row, "Employment Salary Max"),
            company_type: table.owned(row, "Company Type Type"),
            company_size: table.owned(row, "Company Details Size"),
            company_sector: table.owned(row, "Company Details Sector"),
            headline: table.owned(row, "Person Headline"),
        }))
    }

    fn org_relationships(&self, target_id: i64) -> Result<Vec<OrgRelationship>> {
        let table = self.table(&self.org_relationships, ORG_RELATIONSHIPS_FILE)?;
        Ok(table
            .rows_for("ConsID", target_id)
            .map(|row| OrgRelationship {
                full_name: table.owned(row, "ORFullName"),
                import_id: table.owned(row, "ORImpID").unwrap_or_default(),
            })
            .collect())
    }

    fn org_attributes(&self, parent_import_id: &str) -> Result<Vec<AttributeRecord>> {
        let table = self.table(&self.org_attributes, ORG_ATTRIBUTES_FILE)?;
        Ok(table
            .rows
            .iter()
            .filter(|row| table.get(row, "ORAttrORImpID") == Some(parent_import_id))
            .map(|row| AttributeRecord {
                parent_import_id: parent_import_id.to_string(),
                import_id: table.owned(row, "ORAttrImpID"),
                category: table.owned(row, "ORAttrCat"),
                description: table.owned(row, "ORAttrDesc"),
                comment: table.owned(row, "ORAttrCom"),
            })
            .collect())
    }

    fn contact_values(&self, prefix: &str) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for row in &self.phone_list.rows {
            let matches_prefix = self
                .phone_list
                .get(row, "PhoneType")
                .is_some_and(|t| t.starts_with(prefix));
            if !matches_prefix {
                continue;
            }
            if let Some(value) = self.phone_list.owned(row, "PhoneNum")
                && seen.insert(value.clone())
            {
                values.push(value);
            }
        }
        Ok(values)
    }

    fn max_contact_slot(&self, target_id: i64, prefix: &str) -> Result<Option<u32>> {
        Ok(self
            .phone_list
            .rows_for("ConsID", target_id)
            .filter_map(|row| {
                let label = self.phone_list.get(row, "PhoneType")?;
                label.starts_with(prefix).then(|| slot_suffix(label))?
            })
            .max())
    }

    fn source_contacts(&self, source_id: i64) -> Result<Option<SourceContacts>> {
        let table = &self.live_alumni;
        Ok(table.rows_for("personid", source_id).next().map(|row| {
            SourceContacts {
                url: table.owned(row, "Person URL"),
                business_email: table.owned(row, "Contact Data Business Email"),
                personal_email: table.owned(row, "Person Email"),
            }
        }))
    }

    fn source_location(&self, source_id: i64) -> Result<Option<SourceLocation>> {
        let table = &self.live_alumni;
        Ok(table.rows_for("personid", source_id).next().map(|row| {
            SourceLocation {
                city: table.owned(row, "Location City"),
                state: table.owned(row, "Location State/Province"),
                country: table.owned(row, "Location Country"),
            }
        }))
    }

    fn preferred_address(&self, target_id: i64) -> Result<Option<AddressRecord>> {
        let table = self.table(&self.addresses, ADDRESSES_FILE)?;
        Ok(table
            .rows_for("ConsID", target_id)
            .find(|row| table.get(row, "PrefAddr").and_then(parse_flag) == Some(true))
            .map(|row| AddressRecord {
                city: table.owned(row, "AddrCity"),
                county: table.owned(row, "AddrCounty"),
                state: table.owned(row, "AddrState"),
                country: table.owned(row, "AddrCountry"),
            }))
    }

    fn country_mapping(&self) -> Result<BTreeMap<String, Option<String>>> {
        let table = self.table(&self.country_mapping, COUNTRY_MAPPING_FILE)?;
        let mut mapping = BTreeMap::new();
        for row in &table.rows {
            if let Some(source_name) = table.owned(row, "Country in Live Alumni") {
                mapping.insert(source_name, table.owned(row, "Country in Raisers Edge"));
            }
        }
        Ok(mapping)
    }

    fn max_raw_import_id(&self, kind: RecordKind) -> Result<Option<u64>> {
        let table = match kind {
            RecordKind::Organization => {
                self.table(&self.org_relationships, ORG_RELATIONSHIPS_FILE)?
            }
            RecordKind::OrganizationAttribute => {
                self.table(&self.org_attributes, ORG_ATTRIBUTES_FILE)?
            }
            RecordKind::Contact => &self.phone_list,
            RecordKind::Address => self.table(&self.addresses, ADDRESSES_FILE)?,
            RecordKind::CustomField => &self.custom_fields,
        };
        let column = kind.spec().id_column;
        let mut max = None;
        for row in &table.rows {
            let Some(cell) = table.get(row, column) else {
                continue;
            };
            match parse_raw_id(cell) {
                Ok(raw) => max = Some(max.map_or(raw, |current: u64| current.max(raw))),
                Err(error) => warn!(%kind, cell, %error, "unparseable import id, skipping"),
            }
        }
        Ok(max)
    }

    fn link_hints(&self) -> Result<Vec<LinkHint>> {
        let table = &self.live_alumni;
        let mut seen = HashSet::new();
        let mut hints = Vec::new();
        for row in &table.rows {
            let Some(source_id) = table.get(row, "personid").and_then(parse_int_lossy) else {
                continue;
            };
            if !seen.insert(source_id) {
                continue;
            }
            let direct_target_ids = DIRECT_ID_COLUMNS
                .iter()
                .filter_map(|column| table.get(row, column).and_then(parse_int_lossy))
                .collect();
            hints.push(LinkHint {
                source_id,
                direct_target_ids,
                url: table.owned(row, "Person URL"),
            });
        }
        Ok(hints)
    }

    fn active_linkedin_contacts(&self) -> Result<Vec<(i64, String)>> {
        let table = &self.phone_list;
        let mut contacts = Vec::new();
        for row in &table.rows {
            let is_linkedin = table
                .get(row, "PhoneType")
                .is_some_and(|t| t.to_ascii_lowercase().contains("linkedin"));
            let inactive = table.get(row, "PhoneIsInactive").and_then(parse_flag) == Some(true);
            if !is_linkedin || inactive {
                continue;
            }
            if let (Some(cons_id), Some(value)) = (
                table.get(row, "ConsID").and_then(parse_int_lossy),
                table.owned(row, "PhoneNum"),
            ) {
                contacts.push((cons_id, value));
            }
        }
        Ok(contacts)
    }
}
