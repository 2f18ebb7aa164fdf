use chrono::NaiveDate;
use resync_engine::{MissingMonthRule, SyncOptions, SyncRun};
use resync_model::{
    AddressRecord, AttributeRecord, EmploymentRecord, RecordKind, SourceContacts, SourceLocation,
    SyncBatches, parse_raw_id,
};
use resync_store::MemoryStore;

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
}

fn options() -> SyncOptions {
    SyncOptions {
        seed: Some(42),
        missing_month: MissingMonthRule::Fixed(1),
        ..SyncOptions::default()
    }
}

fn with_all_max_ids(store: MemoryStore) -> MemoryStore {
    store
        .with_max_id(RecordKind::Organization, 1_000_000_000)
        .with_max_id(RecordKind::OrganizationAttribute, 2_000_000_000)
        .with_max_id(RecordKind::Contact, 3_000_000_000)
        .with_max_id(RecordKind::Address, 4_000_000_000)
        .with_max_id(RecordKind::CustomField, 5_000_000_000)
}

#[test]
fn matched_employer_updates_without_a_new_organisation() {
    let store = with_all_max_ids(
        MemoryStore::new()
            .with_link(9001, 555)
            .with_org_relationship(9001, "Acme Corp", "10001-001-0000000001")
            .with_employment(
                555,
                EmploymentRecord {
                    company_name: Some("ACME Corporation".to_string()),
                    salary_min: Some("80000".to_string()),
                    salary_max: Some("95000".to_string()),
                    company_sector: Some("Tech, and Finance".to_string()),
                    ..EmploymentRecord::default()
                },
            ),
    );

    let batches = SyncRun::new(&store, options(), run_date()).execute().unwrap();

    assert_eq!(batches.organizations.len(), 1);
    let org = &batches.organizations[0];
    assert_eq!(org.import_id, "10001-001-0000000001");
    assert_eq!(org.income.as_deref(), Some("$80,000 - $95,000"));
    assert_eq!(org.from_date, None);
    assert_eq!(org.to_date, None);

    let descriptions: Vec<&str> = batches
        .org_attributes
        .iter()
        .map(|attr| attr.description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["Tech", "Finance"]);
    for attr in &batches.org_attributes {
        assert_eq!(attr.category, "Sector");
        assert_eq!(attr.parent_import_id, "10001-001-0000000001");
        assert_eq!(attr.date, Some(run_date()));
        assert!(attr.import_id.is_some());
    }

    // The only custom field is the employment provenance row.
    assert_eq!(batches.custom_fields.len(), 1);
    let provenance = &batches.custom_fields[0];
    assert_eq!(provenance.category, "Sync Source");
    assert_eq!(provenance.description, "Live Alumni | Employment");
    assert_eq!(provenance.comment.as_deref(), Some("ACME Corporation"));
    assert_eq!(provenance.date, Some(run_date()));
}

#[test]
fn unmatched_employer_creates_one_new_organisation() {
    let store = with_all_max_ids(
        MemoryStore::new()
            .with_link(9001, 555)
            .with_org_relationship(9001, "Acme Corp", "10001-001-0000000001")
            .with_employment(
                555,
                EmploymentRecord {
                    company_name: Some("Globex Ltd".to_string()),
                    company_sector: Some("Logistics".to_string()),
                    ..EmploymentRecord::default()
                },
            ),
    );

    let batches = SyncRun::new(&store, options(), run_date()).execute().unwrap();

    assert_eq!(batches.organizations.len(), 1);
    let org = &batches.organizations[0];
    // max organisation id 1_000_000_000 plus the 9_999_999_999 gap.
    assert_eq!(org.import_id, "10999-999-0999999999");
    assert_eq!(batches.org_attributes.len(), 1);
    assert_eq!(batches.org_attributes[0].parent_import_id, org.import_id);
    assert_eq!(batches.org_attributes[0].description, "Logistics");
}

#[test]
fn import_ids_are_distinct_and_ascending_per_kind() {
    let mut store = MemoryStore::new();
    for (index, source_id) in (1..=4).enumerate() {
        let target_id = 9000 + index as i64;
        store = store.with_link(target_id, source_id).with_employment(
            source_id,
            EmploymentRecord {
                company_name: Some(format!("Employer {source_id}")),
                company_sector: Some("Tech".to_string()),
                ..EmploymentRecord::default()
            },
        );
    }
    let store = with_all_max_ids(store);

    let batches = SyncRun::new(&store, options(), run_date()).execute().unwrap();

    assert_eq!(batches.organizations.len(), 4);
    let raw_org_ids: Vec<u64> = batches
        .organizations
        .iter()
        .map(|org| parse_raw_id(&org.import_id).unwrap())
        .collect();
    let raw_attr_ids: Vec<u64> = batches
        .org_attributes
        .iter()
        .map(|attr| parse_raw_id(attr.import_id.as_deref().unwrap()).unwrap())
        .collect();
    for ids in [&raw_org_ids, &raw_attr_ids] {
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1], "ids must strictly increase: {ids:?}");
        }
    }
}

#[test]
fn no_attribute_pair_repeats_within_a_parent() {
    // Two source people, both linked to the same constituent and employed
    // at the same known organisation.
    let employment = EmploymentRecord {
        company_name: Some("ACME Corporation".to_string()),
        company_sector: Some("Tech".to_string()),
        ..EmploymentRecord::default()
    };
    let store = with_all_max_ids(
        MemoryStore::new()
            .with_link(9001, 555)
            .with_link(9001, 556)
            .with_org_relationship(9001, "Acme Corp", "10001-001-0000000001")
            .with_employment(555, employment.clone())
            .with_employment(556, employment),
    );

    let batches = SyncRun::new(&store, options(), run_date()).execute().unwrap();

    assert_eq!(batches.organizations.len(), 2);
    assert_eq!(batches.org_attributes.len(), 1);
    let attr = &batches.org_attributes[0];
    assert_eq!(
        (attr.category.as_str(), attr.description.as_str()),
        ("Sector", "Tech")
    );
}

#[test]
fn record_without_dates_yields_no_dates() {
    let store = with_all_max_ids(
        MemoryStore::new().with_link(9001, 555).with_employment(
            555,
            EmploymentRecord {
                company_name: Some("Globex Ltd".to_string()),
                ..EmploymentRecord::default()
            },
        ),
    );
    let sync_options = SyncOptions {
        missing_month: MissingMonthRule::Random,
        seed: Some(7),
        ..SyncOptions::default()
    };

    let batches = SyncRun::new(&store, sync_options, run_date())
        .execute()
        .unwrap();
    assert_eq!(batches.organizations[0].from_date, None);
    assert_eq!(batches.organizations[0].to_date, None);
}

#[test]
fn known_dates_resolve_to_first_of_month() {
    let store = with_all_max_ids(
        MemoryStore::new().with_link(9001, 555).with_employment(
            555,
            EmploymentRecord {
                company_name: Some("Globex Ltd".to_string()),
                start_year: Some("2020".to_string()),
                start_month: Some("3".to_string()),
                end_year: Some("2023".to_string()),
                ..EmploymentRecord::default()
            },
        ),
    );

    let batches = SyncRun::new(&store, options(), run_date()).execute().unwrap();
    let org = &batches.organizations[0];
    assert_eq!(org.from_date, NaiveDate::from_ymd_opt(2020, 3, 1));
    // End month is unknown; the fixed-month rule substitutes January.
    assert_eq!(org.to_date, NaiveDate::from_ymd_opt(2023, 1, 1));
}

fn first_run_store() -> MemoryStore {
    with_all_max_ids(
        MemoryStore::new()
            .with_link(9001, 555)
            .with_employment(
                555,
                EmploymentRecord {
                    company_name: Some("Globex Ltd".to_string()),
                    title: Some("Director".to_string()),
                    start_year: Some("2020".to_string()),
                    start_month: Some("3".to_string()),
                    salary_min: Some("80000".to_string()),
                    salary_max: Some("95000".to_string()),
                    company_sector: Some("Tech".to_string()),
                    company_size: Some("100-500".to_string()),
                    title_is_senior: Some("True".to_string()),
                    company_type: Some("Private".to_string()),
                    ..EmploymentRecord::default()
                },
            )
            .with_source_contacts(
                555,
                SourceContacts {
                    url: Some("https://www.linkedin.com/in/jdoe/".to_string()),
                    business_email: Some("JDoe@Example.org".to_string()),
                    personal_email: None,
                },
            )
            .with_source_location(
                555,
                SourceLocation {
                    city: Some("Pune".to_string()),
                    state: Some("Maharashtra".to_string()),
                    country: Some("India".to_string()),
                },
            )
            .with_country("India", Some("India"))
            .with_preferred_address(
                9001,
                AddressRecord {
                    city: Some("Mumbai".to_string()),
                    county: None,
                    state: Some("Maharashtra".to_string()),
                    country: Some("India".to_string()),
                },
            ),
    )
}

/// A store that reflects the first run's output having been imported.
fn apply_run(batches: &SyncBatches) -> MemoryStore {
    let mut store = first_run_store();
    for org in &batches.organizations {
        store = store.with_org_relationship(org.cons_id, &org.full_name, &org.import_id);
    }
    for attr in &batches.org_attributes {
        store = store.with_org_attribute(AttributeRecord {
            parent_import_id: attr.parent_import_id.clone(),
            import_id: attr.import_id.clone(),
            category: Some(attr.category.clone()),
            description: Some(attr.description.clone()),
            comment: Some(attr.comment.clone()),
        });
    }
    for contact in &batches.contacts {
        store = store.with_contact(
            contact.cons_id,
            contact.type_label.as_deref().unwrap(),
            &contact.value,
        );
    }
    for address in &batches.addresses {
        store = store.with_preferred_address(
            address.cons_id,
            AddressRecord {
                city: address.city.clone(),
                county: address.county.clone(),
                state: address.state.clone(),
                country: address.country.clone(),
            },
        );
    }
    store
}

#[test]
fn second_run_emits_no_net_new_facts() {
    let first = SyncRun::new(&first_run_store(), options(), run_date())
        .execute()
        .unwrap();
    assert_eq!(first.organizations.len(), 1);
    assert_eq!(first.org_attributes.len(), 4);
    assert_eq!(first.contacts.len(), 2);
    assert_eq!(first.addresses.len(), 1);
    // Verified Email, Sync source (email), Verified Location, Sync source
    // (location), Sync Source (employment).
    assert_eq!(first.custom_fields.len(), 5);

    let replayed = apply_run(&first);
    let second = SyncRun::new(&replayed, options(), run_date())
        .execute()
        .unwrap();

    // The employment update restates itself against the now-known
    // organisation; everything else is a no-op.
    assert_eq!(second.organizations.len(), 1);
    assert_eq!(second.organizations[0].import_id, first.organizations[0].import_id);
    assert!(second.org_attributes.is_empty());
    assert!(second.contacts.is_empty());
    assert!(second.addresses.is_empty());
    assert_eq!(second.custom_fields.len(), 1);
    assert_eq!(second.custom_fields[0].category, "Sync Source");
}
