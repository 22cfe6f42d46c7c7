use crate::error::{BridgeError, Result};
use crate::schema::ReportSchema;

/// Check a file's header row against the schema's required columns.
///
/// Column order in the file is not checked; every lookup goes through the
/// schema's own index.
pub fn verify_columns(schema: &ReportSchema, header: &[String]) -> Result<()> {
    let required = schema.required_columns();
    if header.len() != required.len() {
        return Err(BridgeError::ColumnCountMismatch {
            expected: required.len(),
            actual: header.len(),
        });
    }

    let missing: Vec<String> = required
        .iter()
        .filter(|col| !header.iter().any(|h| h == *col))
        .cloned()
        .collect();

    if !missing.is_empty() {
        return Err(BridgeError::MissingColumns(missing));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ReportSchema {
        ReportSchema::new(
            "PeopleTimeDetails",
            &["Person", "ProjectCode", "TaskNumber", "Date", "Hours"],
        )
        .unwrap()
    }

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_exact_header_passes() {
        let s = schema();
        assert!(verify_columns(&s, s.required_columns()).is_ok());
    }

    #[test]
    fn test_reordered_header_passes() {
        let h = header(&["Hours", "Date", "Person", "TaskNumber", "ProjectCode"]);
        assert!(verify_columns(&schema(), &h).is_ok());
    }

    #[test]
    fn test_count_mismatch() {
        let err = verify_columns(&schema(), &header(&["test1", "test2", "test3"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "required number of columns (5) not present - found 3"
        );
    }

    #[test]
    fn test_reports_every_missing_column() {
        let h = header(&["Person", "ProjectCode", "TaskNumber", "Boo", "Yah"]);
        match verify_columns(&schema(), &h) {
            Err(BridgeError::MissingColumns(names)) => assert_eq!(names, vec!["Date", "Hours"]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let h = header(&["person", "ProjectCode", "TaskNumber", "Date", "Hours"]);
        let err = verify_columns(&schema(), &h).unwrap_err();
        assert_eq!(err.to_string(), "required columns not found: Person");
    }
}
