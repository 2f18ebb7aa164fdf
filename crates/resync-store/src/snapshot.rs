//! The read interface the reconciliation engine runs against.
//!
//! Implementations expose a finite, read-only snapshot of both stores. All
//! calls are blocking; the engine treats the snapshot as immutable for the
//! duration of a run.

use std::collections::BTreeMap;

use resync_model::{
    AddressRecord, AttributeRecord, EmploymentRecord, EntityLink, LinkHint, OrgRelationship,
    RecordKind, SourceContacts, SourceLocation,
};

use crate::error::Result;

pub trait SnapshotStore {
    /// All linked entity pairs, in stable snapshot order.
    fn entity_links(&self) -> Result<Vec<EntityLink>>;

    /// The current-employer record for a source person, if the feed has one.
    fn current_employment(&self, source_id: i64) -> Result<Option<EmploymentRecord>>;

    /// Existing organisation relationships of a target constituent, in
    /// stable snapshot order.
    fn org_relationships(&self, target_id: i64) -> Result<Vec<OrgRelationship>>;

    /// Existing attributes scoped to one parent organisation import id.
    fn org_attributes(&self, parent_import_id: &str) -> Result<Vec<AttributeRecord>>;

    /// Distinct contact values whose type starts with `prefix`
    /// (e.g. "LinkedIn", "Email"), across all constituents.
    fn contact_values(&self, prefix: &str) -> Result<Vec<String>>;

    /// Highest numeric slot suffix among a constituent's contacts of the
    /// given type prefix. Suffixes of 100 or more are ignored as free text.
    fn max_contact_slot(&self, target_id: i64, prefix: &str) -> Result<Option<u32>>;

    /// Contact columns (URL, emails) for a source person.
    fn source_contacts(&self, source_id: i64) -> Result<Option<SourceContacts>>;

    /// Location columns for a source person.
    fn source_location(&self, source_id: i64) -> Result<Option<SourceLocation>>;

    /// The target's preferred address for a constituent, if any.
    fn preferred_address(&self, target_id: i64) -> Result<Option<AddressRecord>>;

    /// Source-vocabulary country name to target-vocabulary name. A key
    /// mapped to `None` is known to the source but has no target spelling.
    fn country_mapping(&self) -> Result<BTreeMap<String, Option<String>>>;

    /// Maximum raw import identifier present for a record kind, or `None`
    /// when the kind has no identified rows.
    fn max_raw_import_id(&self, kind: RecordKind) -> Result<Option<u64>>;

    /// Link-discovery inputs, one per distinct source person.
    fn link_hints(&self) -> Result<Vec<LinkHint>>;

    /// Active LinkedIn contacts on the target side as (constituent id,
    /// raw URL value) pairs.
    fn active_linkedin_contacts(&self) -> Result<Vec<(i64, String)>>;
}
