use std::path::Path;

use sha2::{Digest, Sha256};

use crate::columns::verify_columns;
use crate::error::{BridgeError, Result};
use crate::models::{ParsedReport, ReportEntry};
use crate::remote::TimeEntryService;
use crate::schema::ReportSchema;
use crate::transformer::RowTransformer;

pub fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

/// Open a report CSV, returning its header and data rows. Rows whose width
/// differs from the header are a CSV error.
pub fn read_report_file(file_path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let file = std::fs::File::open(file_path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(std::io::BufReader::new(file));
    let mut records = rdr.records();

    let header: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(str::to_string).collect(),
        None => {
            return Err(BridgeError::Other(format!(
                "failed to read column names from file {}",
                file_path.display()
            )))
        }
    };

    let mut rows = Vec::new();
    for record in records {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok((header, rows))
}

/// Parse a whole report file into destination drafts.
///
/// All-or-nothing: the first failing row aborts the parse and no partial
/// report is returned.
pub fn parse_report<S: TimeEntryService + ?Sized>(
    file_path: &Path,
    schema: &ReportSchema,
    service: &S,
) -> Result<ParsedReport> {
    let (header, rows) = read_report_file(file_path)?;
    verify_columns(schema, &header)?;
    log::info!("{}: columns verified for report {}", file_path.display(), schema.name);

    let mut transformer = RowTransformer::new(schema, service);
    let mut entries = Vec::with_capacity(rows.len());
    let mut start_date = None;
    let mut end_date = None;

    for (i, cells) in rows.into_iter().enumerate() {
        let line = i + 1;
        let (draft, date) = transformer.transform(&cells).map_err(|e| {
            log::warn!("row {line}: {e}");
            e
        })?;

        match (start_date, end_date) {
            (Some(start), Some(end)) => {
                if date < start {
                    start_date = Some(date);
                }
                if date > end {
                    end_date = Some(date);
                }
            }
            _ => {
                start_date = Some(date);
                end_date = Some(date);
            }
        }

        entries.push(ReportEntry { line, cells, draft });
    }

    log::info!(
        "Parsed {} entries ({} people verified in {} lookups), {:?} to {:?}",
        entries.len(),
        transformer.cache().len(),
        transformer.cache().lookups(),
        start_date,
        end_date
    );

    Ok(ParsedReport {
        source_file: file_path.to_path_buf(),
        header,
        entries,
        start_date,
        end_date,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::schema::MappingTable;
    use crate::transformer::tests::{test_schema, FakeService};

    pub fn write_report(dir: &Path, name: &str, header: &str, rows: &[&str]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut content = format!("{header}\n");
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    pub const HEADER: &str = "Person,ProjectCode,TaskNumber,Date,Hours";

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_parse_three_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "report.csv", HEADER, &[
            "\"Smith, Jane\",ACME-01,1.1,10/05/2020,8",
            "\"Doe, John\",ACME-02,1.2,10/02/2020,4.5",
            "\"Smith, Jane\",ACME-01,1.2,10/09/2020,2",
        ]);
        let svc = FakeService::with_people(&["118616", "118617"]);
        let report = parse_report(&path, &test_schema(), &svc).unwrap();

        assert_eq!(report.len(), 3);
        assert_eq!(report.start_date, ymd(2020, 10, 2));
        assert_eq!(report.end_date, ymd(2020, 10, 9));
        let lines: Vec<usize> = report.entries.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
        assert_eq!(report.entries[1].draft.person_id, "118617");
        assert_eq!(report.entries[1].cells[0], "Doe, John");
        assert_eq!(svc.person_calls.get(), 2);
    }

    #[test]
    fn test_reordered_columns_follow_schema_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "report.csv", "Hours,Date,Person,TaskNumber,ProjectCode", &[
            "\"Smith, Jane\",ACME-01,1.1,10/05/2020,8",
        ]);
        let svc = FakeService::with_people(&["118616"]);
        let report = parse_report(&path, &test_schema(), &svc).unwrap();
        assert_eq!(report.entries[0].draft.hours, "8");
    }

    #[test]
    fn test_missing_hours_never_reaches_transformer() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "report.csv", "Person,ProjectCode,TaskNumber,Date,Minutes", &[
            "\"Smith, Jane\",ACME-01,1.1,10/05/2020,8",
        ]);
        let svc = FakeService::with_people(&["118616"]);
        let err = parse_report(&path, &test_schema(), &svc).unwrap_err();
        match err {
            BridgeError::MissingColumns(names) => assert_eq!(names, vec!["Hours"]),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(svc.person_calls.get(), 0);
    }

    #[test]
    fn test_bad_row_aborts_whole_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "report.csv", HEADER, &[
            "\"Smith, Jane\",ACME-01,1.1,10/05/2020,8",
            "\"Smith, Jane\",UNKNOWN,1.1,10/06/2020,8",
            "\"Smith, Jane\",ACME-01,1.1,10/07/2020,8",
        ]);
        let svc = FakeService::with_people(&["118616"]);
        let err = parse_report(&path, &test_schema(), &svc).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::UnmappedIdentifier { table: MappingTable::Project, .. }
        ));
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "report.csv", HEADER, &[
            "\"Smith, Jane\",ACME-01,1.1,10/05/2020",
        ]);
        let svc = FakeService::with_people(&["118616"]);
        assert!(matches!(
            parse_report(&path, &test_schema(), &svc),
            Err(BridgeError::Csv(_))
        ));
    }

    #[test]
    fn test_header_only_file_has_no_dates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "report.csv", HEADER, &[]);
        let svc = FakeService::default();
        let report = parse_report(&path, &test_schema(), &svc).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.start_date, None);
        assert_eq!(report.end_date, None);
    }

    #[test]
    fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();
        let err = parse_report(&path, &test_schema(), &FakeService::default()).unwrap_err();
        assert!(err.to_string().starts_with("failed to read column names"));
    }

    #[test]
    fn test_checksum_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "report.csv", HEADER, &[]);
        let a = compute_checksum(&path).unwrap();
        let b = compute_checksum(&path).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }
}
