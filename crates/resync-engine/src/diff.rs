//! Net-new computation against the target's existing facts.

use std::collections::HashSet;

use resync_model::{AddressRecord, AttributeRecord, OrgAttribute};

/// Attributes from `derived` that survive deduplication against the
/// target's existing rows and against attributes already emitted for the
/// same parent earlier in the run.
///
/// Existing rows are read first, so pre-existing data always wins over a
/// re-derived duplicate; that ordering is what makes re-runs idempotent.
/// Entries without a description never survive.
pub fn net_new_attributes(
    existing: &[AttributeRecord],
    derived: Vec<OrgAttribute>,
    emitted: &mut HashSet<(String, String)>,
) -> Vec<OrgAttribute> {
    let mut seen: HashSet<(String, String)> = existing
        .iter()
        .filter_map(|record| {
            let category = record.category.clone()?;
            let description = record.description.clone()?;
            Some((category, description))
        })
        .collect();
    seen.extend(emitted.iter().cloned());

    let mut net_new = Vec::new();
    for fact in derived {
        if fact.description.is_empty() || fact.import_id.is_some() {
            continue;
        }
        let key = (fact.category.clone(), fact.description.clone());
        if seen.insert(key.clone()) {
            emitted.insert(key);
            net_new.push(fact);
        }
    }
    net_new
}

/// Whether the source location differs from the target's preferred address.
///
/// The target's county falls back to its state. Only field pairs populated
/// on both sides can register a difference, matching the store's comparison
/// semantics for absent values.
pub fn location_differs(
    city: Option<&str>,
    state: Option<&str>,
    country: Option<&str>,
    target: &AddressRecord,
) -> bool {
    let target_region = target.county.as_deref().or(target.state.as_deref());
    differs(city, target.city.as_deref())
        || differs(state, target_region)
        || differs(country, target.country.as_deref())
}

fn differs(source: Option<&str>, target: Option<&str>) -> bool {
    matches!((source, target), (Some(a), Some(b)) if a != b)
}
