use std::collections::{BTreeMap, HashMap};

use crate::item::{Folder, ItemKind, VaultItem};

/// Label used in folder breakdowns for logins without a known folder.
pub const NO_FOLDER: &str = "[no folder]";

/// Entries per item type.
pub fn type_counts(items: &[VaultItem]) -> BTreeMap<ItemKind, usize> {
    let mut counts: BTreeMap<ItemKind, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(item.kind()).or_insert(0) += 1;
    }
    counts
}

/// Login entries per folder name. Unknown folder ids count as unfiled.
pub fn folder_counts(items: &[VaultItem], folders: &[Folder]) -> BTreeMap<String, usize> {
    let names: HashMap<&str, &str> = folders
        .iter()
        .map(|f| (f.id.as_str(), f.name.as_str()))
        .collect();

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for item in items.iter().filter(|i| i.kind() == ItemKind::Login) {
        let name = item
            .folder_id()
            .and_then(|id| names.get(id).copied())
            .unwrap_or(NO_FOLDER);
        *counts.entry(name.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Entries whose notes carry `marker`.
pub fn flagged_count(items: &[VaultItem], marker: &str) -> usize {
    items
        .iter()
        .filter(|i| i.notes().is_some_and(|n| n.contains(marker)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: &str, kind: i64, folder: Option<&str>) -> VaultItem {
        VaultItem::try_from(json!({ "id": id, "type": kind, "folderId": folder })).unwrap()
    }

    #[test]
    fn counts_by_type() {
        let items = vec![item("a", 1, None), item("b", 1, None), item("c", 2, None), item("d", 4, None)];
        let counts = type_counts(&items);
        assert_eq!(counts[&ItemKind::Login], 2);
        assert_eq!(counts[&ItemKind::SecureNote], 1);
        assert_eq!(counts[&ItemKind::Identity], 1);
        assert!(!counts.contains_key(&ItemKind::Card));
    }

    #[test]
    fn counts_logins_by_folder() {
        let folders = vec![Folder { id: "f1".into(), name: "work".into() }];
        let items = vec![
            item("a", 1, Some("f1")),
            item("b", 1, None),
            item("c", 1, Some("gone")),
            item("d", 2, Some("f1")),
        ];
        let counts = folder_counts(&items, &folders);
        assert_eq!(counts["work"], 1);
        assert_eq!(counts[NO_FOLDER], 2);
    }
}
