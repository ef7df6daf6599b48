//! Human-readable cleanup summary.

use std::io::{self, Write};

use vaultclean_recon::CleanupReport;

use crate::util::fit_width;

const RULE_WIDTH: usize = 70;
const LABEL_WIDTH: usize = 42;
const FOLDER_WIDTH: usize = 28;
/// Reused passwords listed before the rest are elided.
const TOP_REUSED: usize = 15;

fn rule(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

fn count_line(out: &mut impl Write, label: &str, value: usize) -> io::Result<()> {
    writeln!(out, "{}{value:>6}", fit_width(label, LABEL_WIDTH))
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "entry" } else { "entries" }
}

pub fn write_summary(out: &mut impl Write, report: &CleanupReport) -> io::Result<()> {
    let s = &report.summary;

    writeln!(out)?;
    rule(out)?;
    writeln!(out, " CLEAN-UP SUMMARY")?;
    rule(out)?;
    count_line(out, "Personal entries read", s.input)?;
    count_line(out, "Organizational entries read", s.org)?;
    count_line(out, "Entries renamed", s.renamed)?;
    count_line(out, "Folders assigned", s.folders_assigned)?;
    count_line(out, "Already in organizational vault (dropped)", s.excluded)?;
    count_line(out, "Duplicates merged", s.merged)?;
    count_line(out, "Exact duplicates removed", s.removed)?;
    count_line(out, "Ambiguous entries left for review", s.ambiguous)?;
    count_line(out, "Without login or URIs (kept as-is)", s.skipped)?;
    count_line(out, "Flagged for password reuse", s.flagged)?;
    count_line(out, "Entries in cleaned export", s.output)?;

    if !s.type_counts.is_empty() {
        writeln!(out)?;
        writeln!(out, "  Item types:")?;
        for (kind, &n) in &s.type_counts {
            writeln!(out, "    {}{n:>6} {}", fit_width(&kind.label(), FOLDER_WIDTH), plural(n))?;
        }
    }

    if !s.folder_counts.is_empty() {
        let mut folders: Vec<(&String, &usize)> = s.folder_counts.iter().collect();
        folders.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        writeln!(out)?;
        writeln!(out, "  Folders (logins only):")?;
        for (name, &n) in folders {
            writeln!(out, "    {}{n:>6} {}", fit_width(name, FOLDER_WIDTH), plural(n))?;
        }
    }

    let ambiguous: Vec<_> = report.ambiguous_groups().collect();
    if !ambiguous.is_empty() {
        writeln!(out)?;
        writeln!(out, "  Ambiguous groups (left untouched):")?;
        for group in ambiguous {
            writeln!(
                out,
                "    {} | user: {}",
                group.target,
                group.username.as_deref().unwrap_or("(none)")
            )?;
            for id in &group.member_ids {
                writeln!(out, "      - {id}")?;
            }
        }
    }

    writeln!(out)?;
    if report.reuse.is_empty() {
        writeln!(out, "  No reused passwords found.")?;
    } else {
        writeln!(out, "  Reused passwords: {}", report.reuse.len())?;
        for stat in report.reuse.iter().take(TOP_REUSED) {
            writeln!(
                out,
                "    {}  {} {} across {} sites",
                stat.masked,
                stat.entries,
                plural(stat.entries),
                stat.targets
            )?;
        }
        if report.reuse.len() > TOP_REUSED {
            writeln!(out, "    ... and {} more", report.reuse.len() - TOP_REUSED)?;
        }
    }
    rule(out)?;
    Ok(())
}
