use std::collections::{BTreeMap, BTreeSet};

use crate::item::VaultItem;
use crate::model::ReuseStat;
use crate::uri::normalize_uri;

/// Passwords seen on more than one distinct target.
///
/// Built before reconciliation: merging moves URIs between entries, which
/// would make a single site look like several.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReuseIndex {
    /// password -> number of distinct targets, reused passwords only.
    targets: BTreeMap<String, usize>,
    /// password -> number of entries using it, reused passwords only.
    usage: BTreeMap<String, usize>,
}

impl ReuseIndex {
    /// Index every entry with a non-empty string password and at least one URI.
    pub fn build<'a, I, S>(items: I, app_schemes: &[S]) -> Self
    where
        I: IntoIterator<Item = &'a VaultItem>,
        S: AsRef<str>,
    {
        let items: Vec<&VaultItem> = items.into_iter().collect();

        let mut seen: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
        for item in &items {
            let Some(password) = item.password() else {
                continue;
            };
            for uri in item.uris() {
                seen.entry(password)
                    .or_default()
                    .insert(normalize_uri(uri, app_schemes));
            }
        }

        let targets: BTreeMap<String, usize> = seen
            .into_iter()
            .filter(|(_, domains)| domains.len() > 1)
            .map(|(password, domains)| (password.to_string(), domains.len()))
            .collect();

        let mut usage: BTreeMap<String, usize> = BTreeMap::new();
        for item in &items {
            if let Some(password) = item.password().filter(|p| targets.contains_key(*p)) {
                *usage.entry(password.to_string()).or_insert(0) += 1;
            }
        }

        Self { targets, usage }
    }

    pub fn contains(&self, password: &str) -> bool {
        self.targets.contains_key(password)
    }

    /// Whether `item`'s string password is in the reuse set.
    pub fn is_reused(&self, item: &VaultItem) -> bool {
        item.password().is_some_and(|p| self.contains(p))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn passwords(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Masked per-password usage, most used first.
    pub fn stats(&self) -> Vec<ReuseStat> {
        let mut ranked: Vec<(&String, usize)> = self
            .targets
            .iter()
            .map(|(password, &targets)| (password, targets))
            .collect();
        ranked.sort_by(|a, b| {
            let ua = self.usage.get(a.0).copied().unwrap_or(0);
            let ub = self.usage.get(b.0).copied().unwrap_or(0);
            ub.cmp(&ua).then(b.1.cmp(&a.1)).then(a.0.cmp(b.0))
        });
        ranked
            .into_iter()
            .map(|(password, targets)| ReuseStat {
                masked: mask_password(password),
                entries: self.usage.get(password).copied().unwrap_or(0),
                targets,
            })
            .collect()
    }
}

/// First character followed by a fixed-width mask, so length is not revealed.
pub fn mask_password(password: &str) -> String {
    let first = password.chars().next().map(String::from).unwrap_or_default();
    format!("{first}{}", "*".repeat(7))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCHEMES: [&str; 2] = ["android://", "androidapp://"];

    fn login(id: &str, password: serde_json::Value, uris: &[&str]) -> VaultItem {
        let uris: Vec<_> = uris.iter().map(|u| json!({ "uri": u, "match": null })).collect();
        VaultItem::try_from(json!({
            "id": id,
            "login": { "username": "u", "password": password, "uris": uris }
        }))
        .unwrap()
    }

    #[test]
    fn reuse_across_targets() {
        let items = vec![
            login("a", json!("p"), &["https://x.com"]),
            login("b", json!("p"), &["https://y.com"]),
            login("c", json!("q"), &["https://x.com"]),
        ];
        let index = ReuseIndex::build(&items, &SCHEMES);
        assert_eq!(index.passwords().collect::<Vec<_>>(), vec!["p"]);
        assert!(index.is_reused(&items[0]));
        assert!(!index.is_reused(&items[2]));
    }

    #[test]
    fn same_target_is_not_reuse() {
        let items = vec![
            login("a", json!("p"), &["https://x.com/login"]),
            login("b", json!("p"), &["http://X.com/"]),
        ];
        assert!(ReuseIndex::build(&items, &SCHEMES).is_empty());
    }

    #[test]
    fn one_entry_with_two_targets_counts() {
        let items = vec![login("a", json!("p"), &["https://x.com", "android://h@com.x.app/"])];
        let index = ReuseIndex::build(&items, &SCHEMES);
        assert!(index.contains("p"));
        assert_eq!(index.stats()[0].targets, 2);
        assert_eq!(index.stats()[0].entries, 1);
    }

    #[test]
    fn ignores_blank_and_non_string_passwords() {
        let items = vec![
            login("a", json!(1234), &["https://x.com"]),
            login("b", json!(1234), &["https://y.com"]),
            login("c", json!("  "), &["https://x.com"]),
            login("d", json!("  "), &["https://y.com"]),
            login("e", json!(null), &["https://y.com"]),
        ];
        assert!(ReuseIndex::build(&items, &SCHEMES).is_empty());
    }

    #[test]
    fn passwords_are_trimmed() {
        let items = vec![
            login("a", json!(" p"), &["https://x.com"]),
            login("b", json!("p "), &["https://y.com"]),
        ];
        assert!(ReuseIndex::build(&items, &SCHEMES).contains("p"));
    }

    #[test]
    fn stats_ranked_and_masked() {
        let items = vec![
            login("a", json!("alpha"), &["https://x.com"]),
            login("b", json!("alpha"), &["https://y.com"]),
            login("c", json!("bravo"), &["https://x.com"]),
            login("d", json!("bravo"), &["https://y.com"]),
            login("e", json!("bravo"), &["https://z.com"]),
        ];
        let stats = ReuseIndex::build(&items, &SCHEMES).stats();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0], ReuseStat { masked: "b*******".into(), entries: 3, targets: 3 });
        assert_eq!(stats[1].masked, "a*******");
    }
}
