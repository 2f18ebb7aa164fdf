//! Address reconciliation.
//!
//! Source locations are translated into the target's country vocabulary
//! and compared with the target's preferred address; only constituents
//! whose location actually differs produce an update.

use anyhow::Context;
use tracing::debug;

use resync_model::{ADDRESS_TYPE_LINKEDIN, AddressUpdate, CustomField, EntityLink};
use resync_store::SnapshotStore;

use crate::diff;

/// Net-new address updates with their Verified Location and Sync source
/// provenance rows.
pub fn sync_addresses(
    store: &impl SnapshotStore,
    links: &[EntityLink],
) -> anyhow::Result<(Vec<AddressUpdate>, Vec<CustomField>, Vec<CustomField>)> {
    let mapping = store
        .country_mapping()
        .context("reading country mapping")?;

    let mut updates = Vec::new();
    let mut verified = Vec::new();
    let mut sync_source = Vec::new();
    for link in links {
        let Some(location) = store.source_location(link.source_id)? else {
            continue;
        };
        // A source country missing from the mapping table means the
        // location cannot be expressed in the target vocabulary; skip.
        let country = match &location.country {
            Some(raw) => match mapping.get(raw) {
                Some(mapped) => mapped.clone().or_else(|| Some(raw.clone())),
                None => continue,
            },
            None => continue,
        };
        let Some(preferred) = store
            .preferred_address(link.target_id)
            .with_context(|| format!("reading preferred address for {}", link.target_id))?
        else {
            continue;
        };
        if !diff::location_differs(
            location.city.as_deref(),
            location.state.as_deref(),
            country.as_deref(),
            &preferred,
        ) {
            continue;
        }

        updates.push(AddressUpdate {
            import_id: None,
            cons_id: link.target_id,
            city: location.city.clone(),
            county: location.state.clone(),
            state: location.state.clone(),
            country: country.clone(),
            preferred: true,
            address_type: ADDRESS_TYPE_LINKEDIN.to_string(),
        });

        let described = [
            location.city.as_deref(),
            location.state.as_deref(),
            country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
        verified.push(CustomField {
            import_id: None,
            category: "Verified Location".to_string(),
            comment: Some("Live Alumni".to_string()),
            cons_id: link.target_id,
            date: None,
            description: described.clone(),
        });
        sync_source.push(CustomField {
            import_id: None,
            category: "Sync source".to_string(),
            comment: Some(described),
            cons_id: link.target_id,
            date: None,
            description: "Live Alumni | Location".to_string(),
        });
    }
    debug!(updates = updates.len(), "addresses diffed");
    Ok((updates, verified, sync_source))
}
