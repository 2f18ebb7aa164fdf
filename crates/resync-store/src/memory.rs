//! In-memory snapshot store for tests and fixtures.

use std::collections::BTreeMap;

use resync_model::{
    AddressRecord, AttributeRecord, EmploymentRecord, EntityLink, LinkHint, OrgRelationship,
    RecordKind, SourceContacts, SourceLocation,
};

use crate::cell::slot_suffix;
use crate::error::Result;
use crate::snapshot::SnapshotStore;

/// A target-side contact row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    pub cons_id: i64,
    pub contact_type: String,
    pub value: String,
    pub inactive: bool,
}

/// Builder-style snapshot held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    links: Vec<EntityLink>,
    employment: BTreeMap<i64, EmploymentRecord>,
    org_relationships: BTreeMap<i64, Vec<OrgRelationship>>,
    org_attributes: BTreeMap<String, Vec<AttributeRecord>>,
    contacts: Vec<ContactRow>,
    source_contacts: BTreeMap<i64, SourceContacts>,
    source_locations: BTreeMap<i64, SourceLocation>,
    preferred_addresses: BTreeMap<i64, AddressRecord>,
    countries: BTreeMap<String, Option<String>>,
    max_ids: BTreeMap<RecordKind, u64>,
    hints: Vec<LinkHint>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link(mut self, target_id: i64, source_id: i64) -> Self {
        self.links.push(EntityLink {
            target_id,
            source_id,
        });
        self
    }

    pub fn with_employment(mut self, source_id: i64, record: EmploymentRecord) -> Self {
        self.employment.insert(source_id, record);
        self
    }

    pub fn with_org_relationship(
        mut self,
        target_id: i64,
        full_name: &str,
        import_id: &str,
    ) -> Self {
        self.org_relationships
            .entry(target_id)
            .or_default()
            .push(OrgRelationship {
                full_name: Some(full_name.to_string()),
                import_id: import_id.to_string(),
            });
        self
    }

    pub fn with_org_attribute(mut self, record: AttributeRecord) -> Self {
        self.org_attributes
            .entry(record.parent_import_id.clone())
            .or_default()
            .push(record);
        self
    }

    pub fn with_contact(mut self, cons_id: i64, contact_type: &str, value: &str) -> Self {
        self.contacts.push(ContactRow {
            cons_id,
            contact_type: contact_type.to_string(),
            value: value.to_string(),
            inactive: false,
        });
        self
    }

    pub fn with_source_contacts(mut self, source_id: i64, contacts: SourceContacts) -> Self {
        self.source_contacts.insert(source_id, contacts);
        self
    }

    pub fn with_source_location(mut self, source_id: i64, location: SourceLocation) -> Self {
        self.source_locations.insert(source_id, location);
        self
    }

    pub fn with_preferred_address(mut self, target_id: i64, address: AddressRecord) -> Self {
        self.preferred_addresses.insert(target_id, address);
        self
    }

    pub fn with_country(mut self, source_name: &str, target_name: Option<&str>) -> Self {
        self.countries
            .insert(source_name.to_string(), target_name.map(str::to_string));
        self
    }

    pub fn with_max_id(mut self, kind: RecordKind, raw: u64) -> Self {
        self.max_ids.insert(kind, raw);
        self
    }

    pub fn with_link_hint(mut self, hint: LinkHint) -> Self {
        self.hints.push(hint);
        self
    }
}

impl SnapshotStore for MemoryStore {
    fn entity_links(&self) -> Result<Vec<EntityLink>> {
        Ok(self.links.clone())
    }

    fn current_employment(&self, source_id: i64) -> Result<Option<EmploymentRecord>> {
        Ok(self.employment.get(&source_id).cloned())
    }

    fn org_relationships(&self, target_id: i64) -> Result<Vec<OrgRelationship>> {
        Ok(self
            .org_relationships
            .get(&target_id)
            .cloned()
            .unwrap_or_default())
    }

    fn org_attributes(&self, parent_import_id: &str) -> Result<Vec<AttributeRecord>> {
        Ok(self
            .org_attributes
            .get(parent_import_id)
            .cloned()
            .unwrap_or_default())
    }

    fn contact_values(&self, prefix: &str) -> Result<Vec<String>> {
        let mut values = Vec::new();
        for row in &self.contacts {
            if row.contact_type.starts_with(prefix) && !values.contains(&row.value) {
                values.push(row.value.clone());
            }
        }
        Ok(values)
    }

    fn max_contact_slot(&self, target_id: i64, prefix: &str) -> Result<Option<u32>> {
        Ok(self
            .contacts
            .iter()
            .filter(|row| row.cons_id == target_id && row.contact_type.starts_with(prefix))
            .filter_map(|row| slot_suffix(&row.contact_type))
            .max())
    }

    fn source_contacts(&self, source_id: i64) -> Result<Option<SourceContacts>> {
        Ok(self.source_contacts.get(&source_id).cloned())
    }

    fn source_location(&self, source_id: i64) -> Result<Option<SourceLocation>> {
        Ok(self.source_locations.get(&source_id).cloned())
    }

    fn preferred_address(&self, target_id: i64) -> Result<Option<AddressRecord>> {
        Ok(self.preferred_addresses.get(&target_id).cloned())
    }

    fn country_mapping(&self) -> Result<BTreeMap<String, Option<String>>> {
        Ok(self.countries.clone())
    }

    fn max_raw_import_id(&self, kind: RecordKind) -> Result<Option<u64>> {
        Ok(self.max_ids.get(&kind).copied())
    }

    fn link_hints(&self) -> Result<Vec<LinkHint>> {
        Ok(self.hints.clone())
    }

    fn active_linkedin_contacts(&self) -> Result<Vec<(i64, String)>> {
        Ok(self
            .contacts
            .iter()
            .filter(|row| {
                row.contact_type.to_ascii_lowercase().contains("linkedin") && !row.inactive
            })
            .map(|row| (row.cons_id, row.value.clone()))
            .collect())
    }
}
