//! The reconciliation driver: one synchronous batch pass over the snapshot.
//!
//! Pairs are processed strictly sequentially. Attribute dedup and contact
//! slot numbering are stateful across pairs sharing a target entity, and
//! each identifier allocator is a single-writer owned here; nothing else is
//! shared.

use anyhow::Context;
use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use resync_model::{CustomField, RecordKind, SyncBatches};
use resync_store::SnapshotStore;

use crate::addresses;
use crate::allocator::ImportIdAllocator;
use crate::config::SyncOptions;
use crate::contacts;
use crate::employment::{self, EmittedAttributes};

pub struct SyncRun<'a, S: SnapshotStore> {
    store: &'a S,
    options: SyncOptions,
    run_date: NaiveDate,
}

impl<'a, S: SnapshotStore> SyncRun<'a, S> {
    pub fn new(store: &'a S, options: SyncOptions, run_date: NaiveDate) -> Self {
        Self {
            store,
            options,
            run_date,
        }
    }

    /// Run every phase and assemble the output batches.
    ///
    /// The first store or pair-level error aborts the whole run; there is
    /// no per-pair retry and no partial result.
    pub fn execute(&self) -> anyhow::Result<SyncBatches> {
        let mut rng = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let links = self.store.entity_links().context("loading entity links")?;
        info!(pairs = links.len(), "entity mapping loaded");

        let mut org_allocator =
            ImportIdAllocator::for_kind(self.store, RecordKind::Organization, &mut rng)?;
        let mut organizations = Vec::new();
        let mut org_attributes = Vec::new();
        let mut emitted = EmittedAttributes::new();
        for link in &links {
            let outcome = employment::sync_employment(
                self.store,
                *link,
                &self.options,
                &mut rng,
                &mut org_allocator,
                &mut emitted,
            )
            .with_context(|| {
                format!(
                    "processing pair (target {}, source {})",
                    link.target_id, link.source_id
                )
            })?;
            if let Some(outcome) = outcome {
                organizations.push(outcome.update);
                org_attributes.extend(outcome.attributes);
            }
        }
        info!(
            updates = organizations.len(),
            attributes = org_attributes.len(),
            "employment sync finished"
        );

        let employment_sources: Vec<CustomField> = organizations
            .iter()
            .map(|org| CustomField {
                import_id: None,
                category: "Sync Source".to_string(),
                comment: Some(org.full_name.clone()),
                cons_id: org.cons_id,
                date: None,
                description: "Live Alumni | Employment".to_string(),
            })
            .collect();

        let mut contacts = contacts::sync_linkedin(self.store, &links)?;
        let (emails, verified_emails, email_sources) =
            contacts::sync_emails(self.store, &links, &self.options)?;
        contacts.extend(emails);
        if !contacts.is_empty() {
            let mut allocator =
                ImportIdAllocator::for_kind(self.store, RecordKind::Contact, &mut rng)?;
            for contact in &mut contacts {
                contact.import_id = Some(allocator.next_id());
            }
        }
        info!(contacts = contacts.len(), "contact sync finished");

        let (mut addresses, verified_locations, location_sources) =
            addresses::sync_addresses(self.store, &links)?;
        if !addresses.is_empty() {
            let mut allocator =
                ImportIdAllocator::for_kind(self.store, RecordKind::Address, &mut rng)?;
            for address in &mut addresses {
                address.import_id = Some(allocator.next_id());
            }
        }
        info!(addresses = addresses.len(), "address sync finished");

        if !org_attributes.is_empty() {
            let mut allocator = ImportIdAllocator::for_kind(
                self.store,
                RecordKind::OrganizationAttribute,
                &mut rng,
            )?;
            for attribute in &mut org_attributes {
                attribute.import_id = Some(allocator.next_id());
                attribute.date = Some(self.run_date);
            }
        }

        let mut custom_fields = Vec::new();
        custom_fields.extend(verified_emails);
        custom_fields.extend(email_sources);
        custom_fields.extend(verified_locations);
        custom_fields.extend(location_sources);
        custom_fields.extend(employment_sources);
        if !custom_fields.is_empty() {
            let mut allocator =
                ImportIdAllocator::for_kind(self.store, RecordKind::CustomField, &mut rng)?;
            for field in &mut custom_fields {
                field.import_id = Some(allocator.next_id());
                field.date = Some(self.run_date);
                if let Some(comment) = &mut field.comment
                    && comment.chars().count() > self.options.comment_limit
                {
                    *comment = comment.chars().take(self.options.comment_limit).collect();
                }
            }
        }

        let batches = SyncBatches {
            organizations,
            org_attributes,
            contacts,
            addresses,
            custom_fields,
        };
        let counts = batches.counts();
        info!(
            organizations = counts.organizations,
            org_attributes = counts.org_attributes,
            contacts = counts.contacts,
            addresses = counts.addresses,
            custom_fields = counts.custom_fields,
            "run assembled"
        );
        Ok(batches)
    }
}
