pub mod facts;
pub mod ids;
pub mod records;

pub use facts::{
    ADDRESS_TYPE_LINKEDIN, AddressUpdate, BatchCounts, CAPTURED_COMMENT, Contact, ContactKind,
    CustomField, LINK_CATEGORY, OrgAttribute, OrganizationUpdate, RECIPROCAL_EMPLOYEE,
    RELATIONSHIP_EMPLOYER, SOURCE_COMMENT, SyncBatches,
};
pub use ids::{IMPORT_ID_GAP, ImportIdError, KindSpec, RecordKind, format_import_id, parse_raw_id};
pub use records::{
    AddressRecord, AttributeRecord, EmploymentRecord, EntityLink, LinkHint, OrgRelationship,
    SourceContacts, SourceLocation,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_counts_follow_contents() {
        let mut batches = SyncBatches::default();
        assert!(batches.is_empty());
        batches.custom_fields.push(CustomField {
            import_id: None,
            category: "Verified Email".to_string(),
            comment: Some("Live Alumni".to_string()),
            cons_id: 1,
            date: None,
            description: "jdoe@example.org".to_string(),
        });
        assert!(!batches.is_empty());
        assert_eq!(batches.counts().custom_fields, 1);
        assert_eq!(batches.counts().organizations, 0);
    }

    #[test]
    fn batches_serialize() {
        let batches = SyncBatches::default();
        let json = serde_json::to_string(&batches).expect("serialize batches");
        let round: SyncBatches = serde_json::from_str(&json).expect("deserialize batches");
        assert_eq!(round, batches);
    }
}
