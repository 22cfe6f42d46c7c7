use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::dates::format_destination;
use crate::error::{BridgeError, Result, UploadFailure};
use crate::models::{ParsedReport, UploadOutcome};
use crate::remote::TimeEntryService;

pub const AUDIT_COLUMN: &str = "RemoteEntryId";

pub fn audit_file_name(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "time-details-report_{}-{}.csv",
        format_destination(start),
        format_destination(end)
    )
}

#[derive(Debug)]
pub struct SyncReport {
    pub audit_file: PathBuf,
    /// One per surviving entry, in report order, tagged with its source row.
    pub outcomes: Vec<(usize, UploadOutcome)>,
}

impl SyncReport {
    pub fn created(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_success()).count()
    }
}

/// Upload every entry, one at a time, and write the audit file.
///
/// A rejected entry is recorded and the batch moves on. Once every entry has
/// been attempted, any failures are returned together as `BatchFailed`; the
/// audit file is complete either way.
pub fn synchronize<S: TimeEntryService + ?Sized>(
    report: &ParsedReport,
    service: &S,
    output_dir: Option<&Path>,
) -> Result<SyncReport> {
    let (Some(start), Some(end)) = (report.start_date, report.end_date) else {
        return Err(BridgeError::Other("report contains no entries".into()));
    };

    let dir = match output_dir {
        Some(d) => d.to_path_buf(),
        None => report
            .source_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    if !dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&dir)?;
    }
    let audit_path = dir.join(audit_file_name(start, end));

    let mut wtr = csv::Writer::from_writer(File::create(&audit_path)?);
    let mut header = report.header.clone();
    header.push(AUDIT_COLUMN.to_string());
    wtr.write_record(&header)?;

    let mut outcomes = Vec::with_capacity(report.len());
    let mut failures = Vec::new();

    for entry in &report.entries {
        let outcome = match service.create_time_entry(&entry.draft) {
            Ok(id) => {
                log::debug!("row {}: created {id}", entry.line);
                UploadOutcome::Created(id)
            }
            Err(e) => {
                log::warn!("row {}: upload failed: {e}", entry.line);
                failures.push(UploadFailure {
                    line: Some(entry.line),
                    message: e.to_string(),
                });
                UploadOutcome::Failed(e.to_string())
            }
        };

        let mut record = entry.cells.clone();
        record.push(outcome.audit_value().to_string());
        if let Err(e) = wtr.write_record(&record) {
            failures.push(UploadFailure {
                line: Some(entry.line),
                message: format!("audit write failed: {e}"),
            });
        }
        outcomes.push((entry.line, outcome));
    }

    if let Err(e) = wtr.flush() {
        failures.push(UploadFailure {
            line: None,
            message: format!("audit flush failed: {e}"),
        });
    }
    drop(wtr);

    let created = outcomes.iter().filter(|(_, o)| o.is_success()).count();
    log::info!(
        "Uploaded {} of {} entries, audit written to {}",
        created,
        outcomes.len(),
        audit_path.display()
    );

    if !failures.is_empty() {
        return Err(BridgeError::BatchFailed {
            attempted: outcomes.len(),
            failures,
            audit_file: audit_path.display().to_string(),
        });
    }

    Ok(SyncReport {
        audit_file: audit_path,
        outcomes,
    })
}
