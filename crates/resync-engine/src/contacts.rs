//! Contact reconciliation: LinkedIn handles and email addresses.
//!
//! Candidate values are normalized, diffed against the target's existing
//! contact values for the matching type prefix, and the survivors get
//! per-constituent slot labels so several contacts of one type never
//! collide.

use std::collections::{HashMap, HashSet};

use anyhow::Context;
use tracing::debug;

use resync_model::{CAPTURED_COMMENT, Contact, ContactKind, CustomField, EntityLink};
use resync_store::SnapshotStore;

use crate::config::SyncOptions;
use crate::normalize;

/// Net-new LinkedIn contacts across all linked pairs.
pub fn sync_linkedin(
    store: &impl SnapshotStore,
    links: &[EntityLink],
) -> anyhow::Result<Vec<Contact>> {
    let existing: HashSet<String> = store
        .contact_values(ContactKind::LinkedIn.label())
        .context("reading existing LinkedIn contacts")?
        .iter()
        .map(|value| normalize::clean_linkedin_url(value))
        .collect();

    let mut seen = HashSet::new();
    let mut rows: Vec<(i64, String)> = Vec::new();
    for link in links {
        let Some(contacts) = store.source_contacts(link.source_id)? else {
            continue;
        };
        let Some(url) = contacts.url else {
            continue;
        };
        let cleaned = normalize::clean_linkedin_url(&url);
        if cleaned.is_empty() || existing.contains(&cleaned) {
            continue;
        }
        if seen.insert((link.target_id, cleaned.clone())) {
            rows.push((link.target_id, cleaned));
        }
    }
    rows.sort_by_key(|(cons_id, _)| *cons_id);
    debug!(candidates = rows.len(), "LinkedIn contacts diffed");
    assign_slots(store, rows, ContactKind::LinkedIn)
}

/// Net-new email contacts, plus their Verified Email and Sync source
/// provenance rows.
pub fn sync_emails(
    store: &impl SnapshotStore,
    links: &[EntityLink],
    options: &SyncOptions,
) -> anyhow::Result<(Vec<Contact>, Vec<CustomField>, Vec<CustomField>)> {
    let existing: HashSet<String> = store
        .contact_values(ContactKind::Email.label())
        .context("reading existing email contacts")?
        .iter()
        .map(|value| value.trim().to_lowercase())
        .collect();

    let mut seen = HashSet::new();
    let mut rows: Vec<(i64, String)> = Vec::new();
    for link in links {
        let Some(contacts) = store.source_contacts(link.source_id)? else {
            continue;
        };
        for cell in [contacts.business_email, contacts.personal_email]
            .into_iter()
            .flatten()
        {
            for email in normalize::split_emails(&cell) {
                if normalize::is_excluded_email(&email, &options.excluded_email_domains)
                    || existing.contains(&email)
                {
                    continue;
                }
                if seen.insert((link.target_id, email.clone())) {
                    rows.push((link.target_id, email));
                }
            }
        }
    }
    rows.sort_by_key(|(cons_id, _)| *cons_id);
    debug!(candidates = rows.len(), "email contacts diffed");

    let verified = rows
        .iter()
        .map(|(cons_id, email)| CustomField {
            import_id: None,
            category: "Verified Email".to_string(),
            comment: Some("Live Alumni".to_string()),
            cons_id: *cons_id,
            date: None,
            description: email.clone(),
        })
        .collect();
    let sync_source = rows
        .iter()
        .map(|(cons_id, email)| CustomField {
            import_id: None,
            category: "Sync source".to_string(),
            comment: Some(email.clone()),
            cons_id: *cons_id,
            date: None,
            description: "Live Alumni | Email".to_string(),
        })
        .collect();

    let contacts = assign_slots(store, rows, ContactKind::Email)?;
    Ok((contacts, verified, sync_source))
}

/// Turn (constituent, value) rows into contact facts with slot labels.
///
/// The first new slot for a constituent reuses the target's current
/// maximum numeric suffix for the type (1 when there is none); each
/// further contact increments from there.
fn assign_slots(
    store: &impl SnapshotStore,
    rows: Vec<(i64, String)>,
    kind: ContactKind,
) -> anyhow::Result<Vec<Contact>> {
    let mut next_slot: HashMap<i64, u32> = HashMap::new();
    let mut contacts = Vec::with_capacity(rows.len());
    for (cons_id, value) in rows {
        let slot = match next_slot.get(&cons_id) {
            Some(&slot) => slot,
            None => store
                .max_contact_slot(cons_id, kind.label())
                .with_context(|| format!("reading contact slots for constituent {cons_id}"))?
                .unwrap_or(1),
        };
        next_slot.insert(cons_id, slot + 1);
        contacts.push(Contact {
            kind,
            type_label: Some(format!("{} {slot}", kind.label())),
            import_id: None,
            cons_id,
            is_inactive: false,
            is_primary: false,
            comments: CAPTURED_COMMENT.to_string(),
            value,
        });
    }
    Ok(contacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resync_model::SourceContacts;
    use resync_store::MemoryStore;

    fn link(target_id: i64, source_id: i64) -> EntityLink {
        EntityLink {
            target_id,
            source_id,
        }
    }

    #[test]
    fn known_urls_are_excluded() {
        let store = MemoryStore::new()
            .with_contact(9001, "LinkedIn 1", "https://www.linkedin.com/in/jdoe")
            .with_source_contacts(
                555,
                SourceContacts {
                    url: Some("https://www.linkedin.com/in/jdoe/".to_string()),
                    ..SourceContacts::default()
                },
            );
        let contacts = sync_linkedin(&store, &[link(9001, 555)]).unwrap();
        assert!(contacts.is_empty());
    }

    #[test]
    fn new_urls_get_slot_labels() {
        let store = MemoryStore::new()
            .with_contact(9001, "LinkedIn 3", "linkedin.com/in/existing")
            .with_source_contacts(
                555,
                SourceContacts {
                    url: Some("https://www.linkedin.com/in/jdoe/".to_string()),
                    ..SourceContacts::default()
                },
            )
            .with_source_contacts(
                556,
                SourceContacts {
                    url: Some("www.linkedin.com/in/other".to_string()),
                    ..SourceContacts::default()
                },
            );
        let contacts = sync_linkedin(&store, &[link(9001, 555), link(9002, 556)]).unwrap();
        assert_eq!(contacts.len(), 2);
        // First new slot reuses the target's current numbering.
        assert_eq!(contacts[0].type_label.as_deref(), Some("LinkedIn 3"));
        assert_eq!(contacts[0].value, "linkedin.com/in/jdoe");
        assert_eq!(contacts[1].type_label.as_deref(), Some("LinkedIn 1"));
    }

    #[test]
    fn emails_split_dedupe_and_carry_provenance() {
        let store = MemoryStore::new()
            .with_contact(9001, "Email 1", "old@example.org")
            .with_source_contacts(
                555,
                SourceContacts {
                    business_email: Some("JDoe@Example.org; student@iitb.ac.in".to_string()),
                    personal_email: Some("jdoe@example.org".to_string()),
                    ..SourceContacts::default()
                },
            );
        let (contacts, verified, sync_source) =
            sync_emails(&store, &[link(9001, 555)], &SyncOptions::default()).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].value, "jdoe@example.org");
        assert_eq!(contacts[0].type_label.as_deref(), Some("Email 1"));
        assert_eq!(verified.len(), 1);
        assert_eq!(verified[0].category, "Verified Email");
        assert_eq!(verified[0].description, "jdoe@example.org");
        assert_eq!(sync_source[0].description, "Live Alumni | Email");
        assert_eq!(sync_source[0].comment.as_deref(), Some("jdoe@example.org"));
    }

    #[test]
    fn second_email_for_one_constituent_increments_the_slot() {
        let store = MemoryStore::new().with_source_contacts(
            555,
            SourceContacts {
                business_email: Some("a@example.org; b@example.org".to_string()),
                ..SourceContacts::default()
            },
        );
        let (contacts, _, _) =
            sync_emails(&store, &[link(9001, 555)], &SyncOptions::default()).unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].type_label.as_deref(), Some("Email 1"));
        assert_eq!(contacts[1].type_label.as_deref(), Some("Email 2"));
    }
}
