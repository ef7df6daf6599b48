use tracing::debug;

use crate::item::VaultItem;
use crate::reuse::ReuseIndex;

/// Append `marker` to the notes of every entry whose password is reused.
///
/// Entries already carrying the marker are left alone, so repeated runs do
/// not stack markers. Returns how many entries were newly flagged.
pub fn flag_reused(items: &mut [VaultItem], reuse: &ReuseIndex, marker: &str) -> usize {
    let mut flagged = 0;

    for item in items.iter_mut() {
        if !item.has_login() || !reuse.is_reused(item) {
            continue;
        }
        let notes = item.notes().unwrap_or_default();
        if notes.contains(marker) {
            continue;
        }
        let updated = if notes.is_empty() {
            marker.to_string()
        } else {
            format!("{}\n\n{marker}", notes.trim())
        };
        debug!(id = item.id(), "flagged reused password");
        item.set_notes(Some(updated));
        flagged += 1;
    }

    flagged
}
