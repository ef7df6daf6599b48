use std::collections::HashSet;

use tracing::info;

use crate::config::CleanupConfig;
use crate::error::VaultError;
use crate::filter::exclude_org_duplicates;
use crate::flag::flag_reused;
use crate::model::{CleanupInput, CleanupOutcome, CleanupReport, CleanupSummary};
use crate::normalize::normalize_entries;
use crate::reconcile::reconcile;
use crate::reuse::ReuseIndex;
use crate::summary::{flagged_count, folder_counts, type_counts};

/// Run the full cleanup pipeline. Returns the output items plus a report.
///
/// Stages run in order, each over the previous stage's owned output:
/// normalize, index reuse, drop org duplicates, reconcile, flag reuse.
pub fn run(config: &CleanupConfig, input: CleanupInput) -> Result<CleanupOutcome, VaultError> {
    config.validate()?;

    let CleanupInput { personal, folders, org } = input;
    let input_count = personal.len();

    let normalized = normalize_entries(personal, &folders, config);

    // Index before merging so merged URIs cannot invent extra targets.
    let reuse = ReuseIndex::build(
        normalized.reconcilable.iter().chain(org.iter()),
        &config.app_schemes,
    );

    let org_ids: HashSet<String> = org.iter().map(|item| item.id().to_string()).collect();
    let (reconcilable, mut excluded) = exclude_org_duplicates(normalized.reconcilable, &org_ids);
    let (skipped, excluded_skipped) = exclude_org_duplicates(normalized.skipped, &org_ids);
    excluded.extend(excluded_skipped);

    let mut reconciled = reconcile(reconcilable, &reuse, &config.app_schemes);

    if config.flag_reused {
        let flagged = flag_reused(&mut reconciled.items, &reuse, &config.reuse_marker);
        info!(flagged, "flagged entries with reused passwords");
    }

    let skipped_count = skipped.len() + reconciled.ungrouped;
    let mut items = reconciled.items;
    items.extend(skipped);

    let counts = reconciled.counts;
    let summary = CleanupSummary {
        input: input_count,
        org: org.len(),
        kept: counts.kept,
        merged: counts.merged,
        removed: counts.removed,
        skipped: skipped_count,
        excluded: excluded.len(),
        ambiguous: counts.ambiguous,
        renamed: normalized.renames.len(),
        folders_assigned: normalized.folder_assignments.len(),
        flagged: flagged_count(&items, &config.reuse_marker),
        reused_passwords: reuse.len(),
        output: items.len(),
        type_counts: type_counts(&items),
        folder_counts: folder_counts(&items, &folders),
    };

    info!(
        input = summary.input,
        output = summary.output,
        merged = summary.merged,
        removed = summary.removed,
        "cleanup complete"
    );

    let report = CleanupReport {
        summary,
        renames: normalized.renames,
        folder_assignments: normalized.folder_assignments,
        excluded,
        groups: reconciled.groups,
        reuse: reuse.stats(),
    };

    Ok(CleanupOutcome { items, reuse, report })
}
