use std::collections::BTreeSet;
use std::path::Path;

use crate::columns::verify_columns;
use crate::dates::to_destination_format;
use crate::error::{BridgeError, Result};
use crate::importer::read_report_file;
use crate::schema::{MappingTable, ReportSchema};
use crate::transformer::{COL_DATE, COL_PERSON, COL_PROJECT, COL_TASK};

pub const COL_PERSON_ORG: &str = "PersonOrganization";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    Unmapped { table: String, key: String, first_line: usize },
    InvalidDate { value: String, line: usize },
}

#[derive(Debug, Default)]
pub struct PreflightResult {
    pub rows: usize,
    pub problems: Vec<Problem>,
}

impl PreflightResult {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Offline check of a report file against a mapping configuration.
///
/// Unlike `parse_report`, this collects every unmapped key and bad date
/// instead of stopping at the first. Header problems are still returned as
/// errors. No remote calls are made.
pub fn check_report(file_path: &Path, schema: &ReportSchema) -> Result<PreflightResult> {
    let (header, rows) = read_report_file(file_path)?;
    verify_columns(schema, &header)?;

    let mut lookups = vec![
        (MappingTable::Person, schema.lookup_column_index(COL_PERSON)?),
        (MappingTable::Project, schema.lookup_column_index(COL_PROJECT)?),
        (MappingTable::Task, schema.lookup_column_index(COL_TASK)?),
    ];
    if schema.has_column(COL_PERSON_ORG) {
        lookups.push((MappingTable::Company, schema.lookup_column_index(COL_PERSON_ORG)?));
    }
    let date_idx = schema.lookup_column_index(COL_DATE)?;

    let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
    let mut problems = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        let line = i + 1;
        for (table, idx) in &lookups {
            let key = row.get(*idx).map(String::as_str).unwrap_or_default();
            match schema.resolve(*table, key) {
                Ok(_) => {}
                Err(BridgeError::UnmappedIdentifier { table, key }) => {
                    if seen.insert((table.to_string(), key.clone())) {
                        problems.push(Problem::Unmapped {
                            table: table.to_string(),
                            key,
                            first_line: line,
                        });
                    }
                }
                Err(e) => return Err(e),
            }
        }
        let raw = row.get(date_idx).map(String::as_str).unwrap_or_default();
        if to_destination_format(raw).is_err() {
            problems.push(Problem::InvalidDate {
                value: raw.to_string(),
                line,
            });
        }
    }

    Ok(PreflightResult {
        rows: rows.len(),
        problems,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::tests::{write_report, HEADER};
    use crate::transformer::tests::test_schema;

    #[test]
    fn test_clean_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "r.csv", HEADER, &[
            "\"Smith, Jane\",ACME-01,1.1,10/05/2020,8",
        ]);
        let result = check_report(&path, &test_schema()).unwrap();
        assert!(result.is_clean());
        assert_eq!(result.rows, 1);
    }

    #[test]
    fn test_collects_every_problem_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "r.csv", HEADER, &[
            "Nobody,ACME-01,1.1,10/05/2020,8",
            "Nobody,ACME-99,1.1,10/06/2020,8",
            "\"Smith, Jane\",ACME-01,7.7,Bad Mojo,8",
        ]);
        let result = check_report(&path, &test_schema()).unwrap();
        assert_eq!(
            result.problems,
            vec![
                Problem::Unmapped { table: "Person".into(), key: "Nobody".into(), first_line: 1 },
                Problem::Unmapped { table: "Project".into(), key: "ACME-99".into(), first_line: 2 },
                Problem::Unmapped { table: "Task".into(), key: "7.7".into(), first_line: 3 },
                Problem::InvalidDate { value: "Bad Mojo".into(), line: 3 },
            ]
        );
    }

    #[test]
    fn test_company_checked_when_declared() {
        let dir = tempfile::tempdir().unwrap();
        let mut schema = test_schema();
        schema
            .set_required_columns(
                ["PersonOrganization", "Person", "ProjectCode", "TaskNumber", "Date", "Hours"]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
            )
            .unwrap();
        let path = write_report(dir.path(), "r.csv", "PersonOrganization,Person,ProjectCode,TaskNumber,Date,Hours", &[
            "Foxtrot,\"Smith, Jane\",ACME-01,1.1,10/05/2020,8",
            "Umbrella,\"Smith, Jane\",ACME-01,1.1,10/05/2020,8",
        ]);
        let result = check_report(&path, &schema).unwrap();
        assert_eq!(
            result.problems,
            vec![Problem::Unmapped { table: "Company".into(), key: "Umbrella".into(), first_line: 2 }]
        );
    }

    #[test]
    fn test_header_problems_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "r.csv", "Person,ProjectCode,TaskNumber,Date,Minutes", &[]);
        let err = check_report(&path, &test_schema()).unwrap_err();
        assert_eq!(err.to_string(), "required columns not found: Hours");
    }
}
