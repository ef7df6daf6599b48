use std::collections::HashSet;

use tracing::info;

use crate::item::VaultItem;
use crate::model::ExcludedEntry;

/// Drop personal entries whose id already exists in the organizational export.
///
/// Identity only: content is never compared.
pub fn exclude_org_duplicates(
    items: Vec<VaultItem>,
    org_ids: &HashSet<String>,
) -> (Vec<VaultItem>, Vec<ExcludedEntry>) {
    if org_ids.is_empty() {
        return (items, Vec::new());
    }

    let mut kept = Vec::with_capacity(items.len());
    let mut excluded = Vec::new();

    for item in items {
        if org_ids.contains(item.id()) {
            info!(
                id = item.id(),
                entry = item.name().unwrap_or_default(),
                "removed personal entry already in org vault"
            );
            excluded.push(ExcludedEntry {
                id: item.id().to_string(),
                name: item.name().unwrap_or_default().to_string(),
            });
        } else {
            kept.push(item);
        }
    }

    (kept, excluded)
}
