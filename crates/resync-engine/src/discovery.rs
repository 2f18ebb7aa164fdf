//! Link discovery: propose associations for source people not yet linked
//! to a target constituent.
//!
//! Three candidate sources, combined in order: direct constituent-id
//! columns carried by the feed, LinkedIn URL equality against the target's
//! active contacts, and a pre-vetted manual override list.

use std::collections::{HashMap, HashSet};

use anyhow::Context;
use chrono::NaiveDate;
use rand::Rng;
use tracing::info;

use resync_model::{CustomField, EntityLink, LINK_CATEGORY, RecordKind};
use resync_store::SnapshotStore;

use crate::allocator::ImportIdAllocator;
use crate::normalize;

/// New candidate pairs, deduplicated, direct-id candidates first.
pub fn discover_links(
    store: &impl SnapshotStore,
    manual: &[EntityLink],
) -> anyhow::Result<Vec<EntityLink>> {
    let existing = store.entity_links().context("loading entity links")?;
    let linked_targets: HashSet<i64> = existing.iter().map(|link| link.target_id).collect();
    let linked_sources: HashSet<i64> = existing.iter().map(|link| link.source_id).collect();
    let hints = store.link_hints().context("loading link hints")?;

    // (a) Direct constituent ids: first populated column wins; both sides
    // must still be unlinked.
    let mut direct: Vec<EntityLink> = hints
        .iter()
        .filter_map(|hint| {
            let target_id = *hint.direct_target_ids.first()?;
            (!linked_targets.contains(&target_id) && !linked_sources.contains(&hint.source_id))
                .then_some(EntityLink {
                    target_id,
                    source_id: hint.source_id,
                })
        })
        .collect();
    direct.sort_by_key(|link| link.target_id);

    // (b) URL equality against active target-side LinkedIn contacts.
    let mut by_url: HashMap<String, i64> = HashMap::new();
    for (cons_id, value) in store
        .active_linkedin_contacts()
        .context("loading LinkedIn contacts")?
    {
        let cleaned = normalize::clean_linkedin_url(&value);
        if !cleaned.is_empty() {
            by_url.entry(cleaned).or_insert(cons_id);
        }
    }
    let url_matches = hints.iter().filter_map(|hint| {
        if linked_sources.contains(&hint.source_id) {
            return None;
        }
        let cleaned = normalize::clean_linkedin_url(hint.url.as_deref()?);
        let target_id = *by_url.get(&cleaned)?;
        Some(EntityLink {
            target_id,
            source_id: hint.source_id,
        })
    });

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for candidate in direct
        .into_iter()
        .chain(url_matches)
        .chain(manual.iter().copied())
    {
        if seen.insert(candidate) {
            candidates.push(candidate);
        }
    }
    info!(candidates = candidates.len(), "link discovery finished");
    Ok(candidates)
}

/// Discovery as an importable batch: one link custom field per candidate,
/// run-date stamped, identifiers allocated in order.
pub fn run_discovery(
    store: &impl SnapshotStore,
    manual: &[EntityLink],
    run_date: NaiveDate,
    rng: &mut impl Rng,
) -> anyhow::Result<Vec<CustomField>> {
    let candidates = discover_links(store, manual)?;
    let mut allocator = ImportIdAllocator::for_kind(store, RecordKind::CustomField, rng)?;
    Ok(candidates
        .into_iter()
        .map(|link| CustomField {
            import_id: Some(allocator.next_id()),
            category: LINK_CATEGORY.to_string(),
            comment: None,
            cons_id: link.target_id,
            date: Some(run_date),
            description: link.source_id.to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use resync_model::LinkHint;
    use resync_store::MemoryStore;

    fn hint(source_id: i64, direct: &[i64], url: Option<&str>) -> LinkHint {
        LinkHint {
            source_id,
            direct_target_ids: direct.to_vec(),
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn direct_ids_propose_unlinked_pairs_only() {
        let store = MemoryStore::new()
            .with_link(9001, 555)
            .with_link_hint(hint(555, &[9001], None))
            .with_link_hint(hint(777, &[9002], None));
        let candidates = discover_links(&store, &[]).unwrap();
        assert_eq!(
            candidates,
            vec![EntityLink {
                target_id: 9002,
                source_id: 777,
            }]
        );
    }

    #[test]
    fn url_equality_matches_active_contacts() {
        let store = MemoryStore::new()
            .with_contact(9003, "LinkedIn 1", "https://www.linkedin.com/in/jdoe/")
            .with_link_hint(hint(888, &[], Some("www.linkedin.com/in/jdoe")));
        let candidates = discover_links(&store, &[]).unwrap();
        assert_eq!(
            candidates,
            vec![EntityLink {
                target_id: 9003,
                source_id: 888,
            }]
        );
    }

    #[test]
    fn manual_overrides_pass_through_and_dedupe() {
        let store = MemoryStore::new().with_link_hint(hint(777, &[9002], None));
        let manual = vec![
            EntityLink {
                target_id: 9002,
                source_id: 777,
            },
            EntityLink {
                target_id: 9009,
                source_id: 999,
            },
        ];
        let candidates = discover_links(&store, &manual).unwrap();
        assert_eq!(candidates.len(), 2);
        assert!(candidates.contains(&EntityLink {
            target_id: 9009,
            source_id: 999,
        }));
    }

    #[test]
    fn discovery_batch_is_identified_and_dated() {
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let store = MemoryStore::new()
            .with_max_id(RecordKind::CustomField, 1_000_000_000)
            .with_link_hint(hint(777, &[9002], None));
        let mut rng = StdRng::seed_from_u64(1);
        let run_date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let fields = run_discovery(&store, &[], run_date, &mut rng).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].category, "Live Alumni ID");
        assert_eq!(fields[0].description, "777");
        assert_eq!(fields[0].cons_id, 9002);
        assert_eq!(fields[0].date, Some(run_date));
        assert_eq!(fields[0].import_id.as_deref(), Some("10999-999-0999999999"));
    }
}
