//! Per-pair employment synchronisation.
//!
//! For each linked pair: resolve the employer against the target's known
//! organisations, build the employment update, and derive the attribute
//! facts that survive diffing.

use std::collections::{HashMap, HashSet};

use anyhow::Context;
use rand::Rng;
use tracing::debug;

use resync_model::{
    EntityLink, OrgAttribute, OrganizationUpdate, RECIPROCAL_EMPLOYEE, RELATIONSHIP_EMPLOYER,
    SOURCE_COMMENT,
};
use resync_store::SnapshotStore;

use crate::allocator::ImportIdAllocator;
use crate::config::SyncOptions;
use crate::diff;
use crate::matcher;
use crate::normalize;

/// (category, description) pairs already emitted per parent import id.
/// Spans all pairs of a run, so two source records matched to the same
/// organisation cannot double-emit an attribute.
pub type EmittedAttributes = HashMap<String, HashSet<(String, String)>>;

pub struct EmploymentOutcome {
    pub update: OrganizationUpdate,
    pub attributes: Vec<OrgAttribute>,
    /// Whether an existing organisation was reused.
    pub matched: bool,
}

pub fn sync_employment(
    store: &impl SnapshotStore,
    link: EntityLink,
    options: &SyncOptions,
    rng: &mut impl Rng,
    org_allocator: &mut ImportIdAllocator,
    emitted: &mut EmittedAttributes,
) -> anyhow::Result<Option<EmploymentOutcome>> {
    let Some(record) = store
        .current_employment(link.source_id)
        .with_context(|| format!("reading employment for source {}", link.source_id))?
    else {
        debug!(source_id = link.source_id, "no employment data, skipping pair");
        return Ok(None);
    };
    let Some(company_name) = record.company_name.clone() else {
        debug!(source_id = link.source_id, "employment row without employer name, skipping pair");
        return Ok(None);
    };

    let relationships = store
        .org_relationships(link.target_id)
        .with_context(|| format!("reading organisations for constituent {}", link.target_id))?;
    let mut names: Vec<&str> = Vec::new();
    let mut seen_names = HashSet::new();
    for relationship in &relationships {
        if let Some(name) = relationship.full_name.as_deref()
            && seen_names.insert(name)
        {
            names.push(name);
        }
    }

    let matched_name = matcher::best_match(
        &company_name,
        names.iter().copied(),
        options.match_threshold,
    );
    let (import_id, matched) = match matched_name {
        Some(name) => {
            let import_id = relationships
                .iter()
                .find(|relationship| relationship.full_name.as_deref() == Some(name))
                .map(|relationship| relationship.import_id.clone())
                .unwrap_or_default();
            (import_id, true)
        }
        None => (org_allocator.next_id(), false),
    };

    let start_year = normalize::numeric_or_sentinel(record.start_year.as_deref());
    let start_month =
        normalize::resolve_month(record.start_month.as_deref(), options.missing_month, rng);
    let end_year = normalize::numeric_or_sentinel(record.end_year.as_deref());
    let end_month =
        normalize::resolve_month(record.end_month.as_deref(), options.missing_month, rng);
    let min_salary = normalize::numeric_or_sentinel(record.salary_min.as_deref());
    let max_salary = normalize::numeric_or_sentinel(record.salary_max.as_deref());

    let full_name =
        normalize::preferred_name(record.standardized_name.as_deref(), Some(&company_name))
            .unwrap_or_else(|| company_name.clone());

    let update = OrganizationUpdate {
        cons_id: link.target_id,
        import_id: import_id.clone(),
        from_date: normalize::employment_date(start_year, start_month),
        to_date: normalize::employment_date(end_year, end_month),
        income: normalize::income_range(min_salary, max_salary),
        industry: record.company_industry.clone(),
        is_employee: true,
        is_primary: record.is_primary,
        full_name,
        notes: record.headline.clone(),
        position: record.title.clone(),
        profession: record.company_industry.clone(),
        reciprocal: RECIPROCAL_EMPLOYEE.to_string(),
        relationship: RELATIONSHIP_EMPLOYER.to_string(),
    };

    let mut derived = Vec::new();
    if let Some(description) = record.title_is_senior.clone() {
        derived.push(attribute(&import_id, "Senior Position", description));
    }
    if let Some(sectors) = record.company_sector.as_deref() {
        for sector in normalize::split_sectors(sectors) {
            derived.push(attribute(&import_id, "Sector", sector));
        }
    }
    if let Some(description) = record.company_size.clone() {
        derived.push(attribute(&import_id, "Employee Size", description));
    }
    if let Some(description) = record.company_type.clone() {
        derived.push(attribute(&import_id, "Company Type", description));
    }

    let existing = store
        .org_attributes(&import_id)
        .with_context(|| format!("reading attributes for organisation {import_id}"))?;
    let attributes = diff::net_new_attributes(
        &existing,
        derived,
        emitted.entry(import_id.clone()).or_default(),
    );

    debug!(
        target_id = link.target_id,
        source_id = link.source_id,
        matched,
        attributes = attributes.len(),
        "employment pair processed"
    );
    Ok(Some(EmploymentOutcome {
        update,
        attributes,
        matched,
    }))
}

fn attribute(parent_import_id: &str, category: &str, description: String) -> OrgAttribute {
    OrgAttribute {
        parent_import_id: parent_import_id.to_string(),
        import_id: None,
        category: category.to_string(),
        date: None,
        description,
        comment: SOURCE_COMMENT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use resync_model::{EmploymentRecord, RecordKind};
    use resync_store::MemoryStore;

    fn acme_employment() -> EmploymentRecord {
        EmploymentRecord {
            company_name: Some("ACME Corporation".to_string()),
            salary_min: Some("80000".to_string()),
            salary_max: Some("95000".to_string()),
            company_sector: Some("Tech, and Finance".to_string()),
            ..EmploymentRecord::default()
        }
    }

    #[test]
    fn matched_employer_reuses_the_existing_id() {
        let store = MemoryStore::new()
            .with_link(9001, 555)
            .with_employment(555, acme_employment())
            .with_org_relationship(9001, "Acme Corp", "10001-001-0000000001");
        let mut rng = StdRng::seed_from_u64(1);
        let mut allocator = ImportIdAllocator::with_base(RecordKind::Organization, 20_000_000_000);
        let mut emitted = EmittedAttributes::new();

        let outcome = sync_employment(
            &store,
            EntityLink {
                target_id: 9001,
                source_id: 555,
            },
            &SyncOptions::default(),
            &mut rng,
            &mut allocator,
            &mut emitted,
        )
        .unwrap()
        .expect("employment present");

        assert!(outcome.matched);
        assert_eq!(outcome.update.import_id, "10001-001-0000000001");
        assert_eq!(outcome.update.income.as_deref(), Some("$80,000 - $95,000"));
        assert_eq!(outcome.update.from_date, None);
        let descriptions: Vec<&str> = outcome
            .attributes
            .iter()
            .map(|attr| attr.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["Tech", "Finance"]);
        assert!(
            outcome
                .attributes
                .iter()
                .all(|attr| attr.parent_import_id == "10001-001-0000000001")
        );
    }

    #[test]
    fn unmatched_employer_gets_a_fresh_id() {
        let store = MemoryStore::new()
            .with_link(9001, 555)
            .with_employment(
                555,
                EmploymentRecord {
                    company_name: Some("Globex Ltd".to_string()),
                    ..EmploymentRecord::default()
                },
            )
            .with_org_relationship(9001, "Acme Corp", "10001-001-0000000001");
        let mut rng = StdRng::seed_from_u64(1);
        let mut allocator = ImportIdAllocator::with_base(RecordKind::Organization, 21_234_567_889);
        let mut emitted = EmittedAttributes::new();

        let outcome = sync_employment(
            &store,
            EntityLink {
                target_id: 9001,
                source_id: 555,
            },
            &SyncOptions::default(),
            &mut rng,
            &mut allocator,
            &mut emitted,
        )
        .unwrap()
        .expect("employment present");

        assert!(!outcome.matched);
        assert_eq!(outcome.update.import_id, "21234-567-1234567889");
        assert_eq!(outcome.update.full_name, "Globex Ltd");
    }

    #[test]
    fn missing_employer_name_skips_the_pair() {
        let store = MemoryStore::new()
            .with_link(9001, 555)
            .with_employment(555, EmploymentRecord::default());
        let mut rng = StdRng::seed_from_u64(1);
        let mut allocator = ImportIdAllocator::with_base(RecordKind::Organization, 20_000_000_000);
        let mut emitted = EmittedAttributes::new();

        let outcome = sync_employment(
            &store,
            EntityLink {
                target_id: 9001,
                source_id: 555,
            },
            &SyncOptions::default(),
            &mut rng,
            &mut allocator,
            &mut emitted,
        )
        .unwrap();
        assert!(outcome.is_none());
    }
}
