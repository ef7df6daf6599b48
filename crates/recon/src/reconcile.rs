//! Grouping, deduplication and merging of login entries.
//!
//! Entries are grouped by [`IdentityKey`]. A group whose members agree on
//! password and both timestamps collapses to its first member. Any other
//! multi-member group is merged into its best candidate, which absorbs every
//! member's URIs and notes.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use crate::item::VaultItem;
use crate::model::{GroupDecision, IdentityKey, ReconCounts, Resolution};
use crate::reuse::ReuseIndex;
use crate::uri::normalize_uri;

/// Output of [`reconcile`].
#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    /// Group survivors in first-appearance order, then ungrouped entries.
    pub items: Vec<VaultItem>,
    /// One decision per multi-member group.
    pub groups: Vec<GroupDecision>,
    pub counts: ReconCounts,
    /// Entries without a login or URIs, passed through untouched.
    pub ungrouped: usize,
}

/// Grouping key of a reconcilable entry; `None` for entries without URIs.
pub fn identity_key<S: AsRef<str>>(item: &VaultItem, app_schemes: &[S]) -> Option<IdentityKey> {
    let uri = item.first_uri()?;
    Some(IdentityKey {
        target: normalize_uri(uri, app_schemes),
        username: item.username(),
        password: item.password_key(),
    })
}

/// Deduplicate and merge `items`. Every input entry ends up exactly once as a
/// survivor, a removed duplicate, a merged loser, or an ungrouped pass-through.
pub fn reconcile<S: AsRef<str>>(
    items: Vec<VaultItem>,
    reuse: &ReuseIndex,
    app_schemes: &[S],
) -> Reconciled {
    let mut order: Vec<(IdentityKey, Vec<VaultItem>)> = Vec::new();
    let mut slots: HashMap<IdentityKey, usize> = HashMap::new();
    let mut ungrouped = Vec::new();

    for item in items {
        match identity_key(&item, app_schemes) {
            Some(key) => match slots.get(&key) {
                Some(&slot) => order[slot].1.push(item),
                None => {
                    slots.insert(key.clone(), order.len());
                    order.push((key, vec![item]));
                }
            },
            None => ungrouped.push(item),
        }
    }

    let mut out = Reconciled::default();

    for (key, mut members) in order {
        if members.len() == 1 {
            out.items.extend(members.pop());
            out.counts.kept += 1;
            continue;
        }

        debug!(
            domain = %key.target,
            username = key.username.as_deref().unwrap_or_default(),
            entries = members.len(),
            "evaluating group"
        );

        let member_ids: Vec<String> = members.iter().map(|m| m.id().to_string()).collect();
        let losers = members.len() - 1;

        if is_exact_duplicate(&members) {
            let kept = members.swap_remove(0);
            info!(id = kept.id(), removed = losers, "exact duplicates collapsed");
            out.counts.kept += 1;
            out.counts.removed += losers;
            out.groups.push(GroupDecision {
                target: key.target,
                username: key.username,
                resolution: Resolution::ExactDuplicate,
                member_ids,
                survivor_id: Some(kept.id().to_string()),
                uri_count: kept.uris().len(),
            });
            out.items.push(kept);
            continue;
        }

        let winner = merge_group(members, reuse);
        info!(
            id = winner.id(),
            merged = losers + 1,
            uris = winner.uris().len(),
            "merged group"
        );
        out.counts.kept += 1;
        out.counts.merged += losers;
        out.groups.push(GroupDecision {
            target: key.target,
            username: key.username,
            resolution: Resolution::Merged,
            member_ids,
            survivor_id: Some(winner.id().to_string()),
            uri_count: winner.uris().len(),
        });
        out.items.push(winner);
    }

    if !ungrouped.is_empty() {
        debug!(count = ungrouped.len(), "ungrouped entries passed through");
    }
    out.ungrouped = ungrouped.len();
    out.items.extend(ungrouped);

    out
}

/// All members share password, revision date and creation date.
/// A `null` timestamp counts as missing.
fn is_exact_duplicate(members: &[VaultItem]) -> bool {
    let Some(first) = members.first() else {
        return false;
    };
    let stamp = |item: &VaultItem, key: &str| item.field(key).filter(|v| !v.is_null()).cloned();
    members.iter().all(|m| {
        m.raw_password() == first.raw_password()
            && stamp(m, "revisionDate") == stamp(first, "revisionDate")
            && stamp(m, "creationDate") == stamp(first, "creationDate")
    })
}

/// Ascending rank; the greatest member wins the merge.
///
/// (last used, revision, reused password, creation, id). Missing values rank
/// lowest.
fn candidate_rank<'a>(item: &'a VaultItem, reuse: &ReuseIndex) -> (&'a str, &'a str, bool, &'a str, &'a str) {
    (
        item.last_used_date().unwrap_or_default(),
        item.revision_date().unwrap_or_default(),
        reuse.is_reused(item),
        item.creation_date().unwrap_or_default(),
        item.id(),
    )
}

/// Index of the merge winner. Ties go to the later member.
fn best_candidate(members: &[VaultItem], reuse: &ReuseIndex) -> usize {
    members
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| candidate_rank(a, reuse).cmp(&candidate_rank(b, reuse)))
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

/// Distinct trimmed notes joined by a blank line, in member order.
///
/// When no member has non-blank notes, falls back to the last member with any
/// notes at all; `None` when nobody has notes.
pub fn merge_notes(members: &[VaultItem]) -> Option<String> {
    let mut distinct: Vec<&str> = Vec::new();
    for note in members.iter().filter_map(|m| m.notes()).map(str::trim) {
        if !note.is_empty() && !distinct.contains(&note) {
            distinct.push(note);
        }
    }
    if !distinct.is_empty() {
        return Some(distinct.join("\n\n"));
    }
    members
        .iter()
        .rev()
        .filter_map(|m| m.notes())
        .find(|n| !n.is_empty())
        .map(str::to_string)
}

/// Fold a group into its best candidate.
fn merge_group(mut members: Vec<VaultItem>, reuse: &ReuseIndex) -> VaultItem {
    let winner_idx = best_candidate(&members, reuse);

    let uris: BTreeSet<String> = members
        .iter()
        .flat_map(|m| m.uris())
        .map(str::to_string)
        .collect();
    let notes = merge_notes(&members);

    let mut winner = members.swap_remove(winner_idx);
    winner.set_uris(uris);
    winner.set_notes(notes);
    winner
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const SCHEMES: [&str; 2] = ["android://", "androidapp://"];

    fn entry(id: &str, uri: &str, revision: &str, notes: Value) -> VaultItem {
        VaultItem::try_from(json!({
            "id": id,
            "name": id,
            "type": 1,
            "notes": notes,
            "revisionDate": revision,
            "creationDate": "2020-01-01T00:00:00Z",
            "login": {
                "username": "jane",
                "password": "pw",
                "uris": [{ "uri": uri, "match": 0 }]
            }
        }))
        .unwrap()
    }

    fn run(items: Vec<VaultItem>) -> Reconciled {
        reconcile(items, &ReuseIndex::default(), &SCHEMES)
    }

    #[test]
    fn singletons_untouched() {
        let a = entry("a", "https://a.com", "2024-01-01", json!("n"));
        let b = entry("b", "https://b.com", "2024-01-01", json!(null));
        let out = run(vec![a.clone(), b.clone()]);
        assert_eq!(out.items, vec![a, b]);
        assert!(out.groups.is_empty());
        assert_eq!(out.counts, ReconCounts { kept: 2, ..ReconCounts::default() });
    }

    #[test]
    fn exact_duplicates_keep_first() {
        let a = entry("a", "https://a.com", "2024-01-01", json!(null));
        let b = entry("b", "https://a.com/login", "2024-01-01", json!(null));
        let out = run(vec![a.clone(), b]);
        assert_eq!(out.items, vec![a]);
        assert_eq!(out.counts.removed, 1);
        assert_eq!(out.counts.merged, 0);
        assert_eq!(out.groups[0].resolution, Resolution::ExactDuplicate);
        assert_eq!(out.groups[0].survivor_id.as_deref(), Some("a"));
    }

    #[test]
    fn null_and_missing_timestamps_are_exact_duplicates() {
        let mut raw: Value = entry("a", "https://a.com", "x", json!(null)).into();
        raw["revisionDate"] = Value::Null;
        let a = VaultItem::try_from(raw.clone()).unwrap();
        raw["id"] = json!("b");
        raw.as_object_mut().unwrap().remove("revisionDate");
        let b = VaultItem::try_from(raw).unwrap();

        let out = run(vec![a.clone(), b]);
        assert_eq!(out.groups[0].resolution, Resolution::ExactDuplicate);
        assert_eq!(out.counts.removed, 1);
        assert_eq!(out.counts.merged, 0);
        // Survivor left as exported: URI match setting untouched.
        assert_eq!(out.items, vec![a]);
    }

    #[test]
    fn reuse_decides_between_equal_dates() {
        // "1234" and 1234 share a key, but only the string form is indexed for reuse.
        let mut raw: Value = entry("a", "https://a.com", "2024-01-01", json!(null)).into();
        raw["login"]["password"] = json!("1234");
        let a = VaultItem::try_from(raw.clone()).unwrap();
        raw["id"] = json!("b");
        raw["login"]["password"] = json!(1234);
        let b = VaultItem::try_from(raw).unwrap();

        let other = VaultItem::try_from(json!({
            "id": "o",
            "login": { "password": "1234", "uris": [{ "uri": "https://other.com" }] }
        }))
        .unwrap();
        let reuse = ReuseIndex::build([&a, &other], &SCHEMES);
        assert!(reuse.is_reused(&a));
        assert!(!reuse.is_reused(&b));

        // Without the reuse component the id tie-break would pick "b".
        let out = reconcile(vec![a, b], &reuse, &SCHEMES);
        assert_eq!(out.groups[0].resolution, Resolution::Merged);
        assert_eq!(out.items[0].id(), "a");
    }

    #[test]
    fn latest_revision_wins_merge() {
        let out = run(vec![
            entry("a", "https://a.com", "2023-01-01", json!(null)),
            entry("b", "https://a.com/x", "2024-06-02", json!(null)),
            entry("c", "https://a.com/y", "2024-06-01", json!(null)),
        ]);
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].id(), "b");
        assert_eq!(out.counts.merged, 2);
        assert_eq!(
            out.items[0].uris(),
            vec!["https://a.com", "https://a.com/x", "https://a.com/y"]
        );
        assert_eq!(
            out.items[0].field("login").unwrap()["uris"][0],
            json!({ "uri": "https://a.com", "match": null })
        );
    }

    #[test]
    fn last_used_outranks_revision() {
        let mut older = entry("a", "https://a.com", "2020-01-01", json!(null));
        let newer = entry("b", "https://a.com", "2024-01-01", json!(null));
        let mut raw: Value = older.clone().into();
        raw["passwordHistory"] = json!([{ "lastUsedDate": "2019-01-01", "password": "old" }]);
        older = VaultItem::try_from(raw).unwrap();

        let out = run(vec![newer, older]);
        assert_eq!(out.items[0].id(), "a");
    }

    #[test]
    fn id_breaks_full_ties() {
        let mut a = entry("a", "https://a.com", "2024-01-01", json!(null));
        let b = entry("b", "https://a.com", "2024-01-01", json!(null));
        // Padded password: same key, but not an exact duplicate.
        let mut raw: Value = a.clone().into();
        raw["login"]["password"] = json!(" pw ");
        a = VaultItem::try_from(raw).unwrap();

        let out = run(vec![b, a]);
        assert_eq!(out.groups[0].resolution, Resolution::Merged);
        assert_eq!(out.items[0].id(), "b");
    }

    #[test]
    fn notes_concatenated_without_duplicates() {
        let out = run(vec![
            entry("a", "https://a.com", "2024-01-01", json!("A")),
            entry("b", "https://a.com", "2024-01-02", json!(" A ")),
            entry("c", "https://a.com", "2024-01-03", json!("B")),
        ]);
        assert_eq!(out.items[0].notes(), Some("A\n\nB"));
    }

    #[test]
    fn notes_cleared_when_none() {
        let out = run(vec![
            entry("a", "https://a.com", "2024-01-01", json!(null)),
            entry("b", "https://a.com", "2024-01-02", json!(null)),
        ]);
        assert_eq!(out.items[0].field("notes"), Some(&Value::Null));
    }

    #[test]
    fn blank_notes_fall_back_to_latest_member() {
        let members = vec![
            entry("a", "https://a.com", "2024-01-01", json!("  ")),
            entry("b", "https://a.com", "2024-01-02", json!("\n")),
            entry("c", "https://a.com", "2024-01-03", json!(null)),
        ];
        assert_eq!(merge_notes(&members).as_deref(), Some("\n"));
    }

    #[test]
    fn key_separates_usernames_and_passwords() {
        let a = entry("a", "https://a.com", "2024-01-01", json!(null));
        let mut raw: Value = a.clone().into();
        raw["id"] = json!("b");
        raw["login"]["username"] = json!("john");
        let b = VaultItem::try_from(raw).unwrap();
        let mut raw: Value = a.clone().into();
        raw["id"] = json!("c");
        raw["login"]["password"] = json!("other");
        let c = VaultItem::try_from(raw).unwrap();

        let out = run(vec![a, b, c]);
        assert_eq!(out.items.len(), 3);
        assert!(out.groups.is_empty());
    }

    #[test]
    fn numeric_password_groups_with_its_string_form() {
        let a = entry("a", "https://a.com", "2024-01-01", json!(null));
        let mut raw: Value = a.clone().into();
        raw["login"]["password"] = json!(1234);
        let a = VaultItem::try_from(raw.clone()).unwrap();
        raw["id"] = json!("b");
        raw["login"]["password"] = json!("1234");
        raw["revisionDate"] = json!("2025-01-01");
        let b = VaultItem::try_from(raw).unwrap();

        let out = run(vec![a, b]);
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].id(), "b");
    }

    #[test]
    fn ungrouped_pass_through_last() {
        let note = VaultItem::try_from(json!({ "id": "n", "type": 2 })).unwrap();
        let a = entry("a", "https://a.com", "2024-01-01", json!(null));
        let out = run(vec![note.clone(), a.clone()]);
        assert_eq!(out.items, vec![a, note]);
        assert_eq!(out.ungrouped, 1);
    }

    #[test]
    fn groups_in_first_appearance_order() {
        let out = run(vec![
            entry("z1", "https://z.com", "2024-01-01", json!(null)),
            entry("a1", "https://a.com", "2024-01-01", json!(null)),
            entry("z2", "https://z.com", "2024-01-02", json!(null)),
        ]);
        let ids: Vec<&str> = out.items.iter().map(VaultItem::id).collect();
        assert_eq!(ids, vec!["z2", "a1"]);
    }
}
