use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::item::{Folder, ItemKind, VaultItem};
use crate::reuse::ReuseIndex;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Pre-parsed documents handed to the engine.
#[derive(Debug, Clone, Default)]
pub struct CleanupInput {
    pub personal: Vec<VaultItem>,
    pub folders: Vec<Folder>,
    /// Items of the organizational export, if one was supplied.
    pub org: Vec<VaultItem>,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rename {
    pub id: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderAssignment {
    pub id: String,
    pub name: String,
    pub folder_id: String,
    pub folder_name: String,
}

/// A personal entry dropped because the org export already holds its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedEntry {
    pub id: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Grouping key: entries sharing all three are merge candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub target: String,
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Members identical in password and timestamps; one kept, rest removed.
    ExactDuplicate,
    /// Best candidate absorbed the others' URIs and notes.
    Merged,
    /// Left untouched for manual review. No current rule produces this.
    Ambiguous,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactDuplicate => write!(f, "exact_duplicate"),
            Self::Merged => write!(f, "merged"),
            Self::Ambiguous => write!(f, "ambiguous"),
        }
    }
}

/// Outcome of one multi-member group. Singleton groups are not recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupDecision {
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub resolution: Resolution,
    pub member_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survivor_id: Option<String>,
    /// Distinct URIs on the survivor after merge.
    pub uri_count: usize,
}

/// Per-stage counters threaded through reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconCounts {
    /// Group survivors, singletons included.
    pub kept: usize,
    /// Losers of best-candidate merges.
    pub merged: usize,
    /// Exact duplicates discarded.
    pub removed: usize,
    /// Members of unresolved groups, passed through as-is.
    pub ambiguous: usize,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

/// One reused password, masked for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReuseStat {
    pub masked: String,
    /// Entries (personal + org) using it.
    pub entries: usize,
    /// Distinct targets it was seen on.
    pub targets: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupSummary {
    /// Personal entries loaded.
    pub input: usize,
    /// Organizational entries loaded.
    pub org: usize,
    /// Reconciled entries in the output.
    pub kept: usize,
    pub merged: usize,
    pub removed: usize,
    /// Entries without login or URIs, passed through.
    pub skipped: usize,
    /// Personal entries already present in the org export.
    pub excluded: usize,
    pub ambiguous: usize,
    pub renamed: usize,
    pub folders_assigned: usize,
    /// Output entries carrying the reuse marker.
    pub flagged: usize,
    pub reused_passwords: usize,
    /// Total entries written.
    pub output: usize,
    pub type_counts: BTreeMap<ItemKind, usize>,
    /// Login entries per folder name; `[no folder]` for unfiled.
    pub folder_counts: BTreeMap<String, usize>,
}

impl CleanupSummary {
    /// Every input entry lands in exactly one of these buckets.
    pub fn accounted(&self) -> usize {
        self.kept + self.merged + self.removed + self.skipped + self.excluded
    }
}

/// Serializable side channel: what happened, never any secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub summary: CleanupSummary,
    pub renames: Vec<Rename>,
    pub folder_assignments: Vec<FolderAssignment>,
    pub excluded: Vec<ExcludedEntry>,
    pub groups: Vec<GroupDecision>,
    /// Most used first.
    pub reuse: Vec<ReuseStat>,
}

impl CleanupReport {
    pub fn ambiguous_groups(&self) -> impl Iterator<Item = &GroupDecision> {
        self.groups.iter().filter(|g| g.resolution == Resolution::Ambiguous)
    }
}

/// Everything the engine hands back.
#[derive(Debug, Clone)]
pub struct CleanupOutcome {
    /// Reconciled entries in group order, then pass-through entries.
    pub items: Vec<VaultItem>,
    pub reuse: ReuseIndex,
    pub report: CleanupReport,
}
