use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::dates::format_destination;
use crate::error::{BridgeError, Result};
use crate::fmt::date_range;
use crate::importer::{compute_checksum, parse_report};
use crate::ledger::{ensure_not_synced, record_sync, SyncRecord};
use crate::scrubber::{scrub, DEFAULT_POLICIES};
use crate::settings::load_settings;
use crate::sync::{synchronize, SyncReport};

pub fn run(file: &Path, mapping: Option<&str>, output_dir: Option<PathBuf>, force: bool) -> Result<()> {
    let settings = load_settings();
    let schema = super::load_schema(&settings, mapping)?;
    let conn = super::open_ledger()?;

    let checksum = compute_checksum(file)?;
    ensure_not_synced(&conn, &checksum, force)?;

    let client = super::make_client(&settings)?;

    // parse errors stop here, before anything is uploaded
    let mut report = parse_report(file, &schema, &client)?;
    let removed = scrub(&mut report, DEFAULT_POLICIES);
    println!(
        "{}: {} entries ({}), {} scrubbed",
        file.display(),
        report.len(),
        date_range(report.start_date, report.end_date),
        removed.len()
    );

    let result = synchronize(&report, &client, output_dir.as_deref());
    match &result {
        Ok(r) => println!(
            "{} {} time entries created. Audit: {}",
            "OK".green().bold(),
            r.created(),
            r.audit_file.display()
        ),
        Err(BridgeError::BatchFailed { attempted, failures, audit_file }) => println!(
            "{} {} of {} entries failed. Audit: {}",
            "FAILED".red().bold(),
            failures.len(),
            attempted,
            audit_file
        ),
        Err(_) => {}
    }

    if let Some((failure_count, audit_file)) = ledger_outcome(&result) {
        let record = SyncRecord {
            id: None,
            filename: file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string(),
            checksum,
            report_name: schema.name.clone(),
            date_range_start: report.start_date.map(format_destination),
            date_range_end: report.end_date.map(format_destination),
            entry_count: report.len() as i64,
            scrubbed_count: removed.len() as i64,
            failure_count,
            audit_file: Some(audit_file),
            synced_at: None,
        };
        if let Err(e) = record_sync(&conn, &record) {
            log::error!("could not record sync in ledger: {e}");
        }
    }

    result.map(|_| ())
}

/// Failure count and audit path for runs that reached the upload stage.
fn ledger_outcome(result: &Result<SyncReport>) -> Option<(i64, String)> {
    match result {
        Ok(r) => Some((0, r.audit_file.display().to_string())),
        Err(BridgeError::BatchFailed { failures, audit_file, .. }) => {
            Some((failures.len() as i64, audit_file.clone()))
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UploadFailure;
    use crate::models::UploadOutcome;

    #[test]
    fn test_clean_run_is_recorded() {
        let result = Ok(SyncReport {
            audit_file: PathBuf::from("out/audit.csv"),
            outcomes: vec![(1, UploadOutcome::Created("TL1".into()))],
        });
        assert_eq!(ledger_outcome(&result), Some((0, "out/audit.csv".to_string())));
    }

    #[test]
    fn test_batch_failure_is_recorded_with_count() {
        let result = Err(BridgeError::BatchFailed {
            attempted: 3,
            failures: vec![
                UploadFailure { line: Some(1), message: "bad task".into() },
                UploadFailure { line: Some(3), message: "bad task".into() },
            ],
            audit_file: "audit.csv".into(),
        });
        assert_eq!(ledger_outcome(&result), Some((2, "audit.csv".to_string())));
    }

    #[test]
    fn test_run_that_never_uploaded_is_not_recorded() {
        let result = Err(BridgeError::Other("report contains no entries".into()));
        assert_eq!(ledger_outcome(&result), None);
    }
}
