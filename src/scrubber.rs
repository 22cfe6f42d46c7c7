use std::collections::HashMap;

use crate::models::{ParsedReport, ReportEntry};

/// Pre-upload filters. Each policy is a stable filter: the first occurrence
/// in row order survives, later offenders are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubPolicy {
    /// Same (person, project, task, date). Hours are not part of the key.
    DuplicateEntries,
    /// Hours blank or zero.
    EmptyHours,
}

pub const DEFAULT_POLICIES: &[ScrubPolicy] = &[ScrubPolicy::EmptyHours, ScrubPolicy::DuplicateEntries];

#[derive(Debug, Clone, PartialEq)]
pub struct RemovedEntry {
    pub line: usize,
    pub policy: ScrubPolicy,
    pub reason: String,
}

impl ScrubPolicy {
    pub fn key(&self) -> &'static str {
        match self {
            Self::DuplicateEntries => "duplicate_entries",
            Self::EmptyHours => "empty_hours",
        }
    }

    fn apply(&self, entries: &mut Vec<ReportEntry>) -> Vec<RemovedEntry> {
        match self {
            Self::DuplicateEntries => drop_duplicates(entries),
            Self::EmptyHours => drop_empty_hours(entries),
        }
    }
}

fn drop_duplicates(entries: &mut Vec<ReportEntry>) -> Vec<RemovedEntry> {
    let mut first_line: HashMap<(String, String, String, String), usize> = HashMap::new();
    let mut removed = Vec::new();
    entries.retain(|e| {
        let d = &e.draft;
        let key = (
            d.person_id.clone(),
            d.project_id.clone(),
            d.task_id.clone(),
            d.date.clone(),
        );
        match first_line.get(&key) {
            Some(&original) => {
                removed.push(RemovedEntry {
                    line: e.line,
                    policy: ScrubPolicy::DuplicateEntries,
                    reason: format!("duplicate of row {original}"),
                });
                false
            }
            None => {
                first_line.insert(key, e.line);
                true
            }
        }
    });
    removed
}

fn drop_empty_hours(entries: &mut Vec<ReportEntry>) -> Vec<RemovedEntry> {
    let mut removed = Vec::new();
    entries.retain(|e| {
        let hours = e.draft.hours.trim();
        let empty = hours.is_empty() || hours.parse::<f64>().map_or(false, |h| h == 0.0);
        if empty {
            removed.push(RemovedEntry {
                line: e.line,
                policy: ScrubPolicy::EmptyHours,
                reason: format!("no hours to log ({:?})", e.draft.hours),
            });
        }
        !empty
    });
    removed
}

/// Run every policy in order over the report's entries. Date bounds are left
/// untouched.
pub fn scrub(report: &mut ParsedReport, policies: &[ScrubPolicy]) -> Vec<RemovedEntry> {
    let mut removed = Vec::new();
    for policy in policies {
        let dropped = policy.apply(&mut report.entries);
        for r in &dropped {
            log::debug!("scrub[{}] row {}: {}", policy.key(), r.line, r.reason);
        }
        removed.extend(dropped);
    }
    if !removed.is_empty() {
        log::info!("Scrubbed {} entries, {} remain", removed.len(), report.len());
    }
    removed
}
