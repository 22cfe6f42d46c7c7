use chrono::NaiveDate;

use crate::models::ReportEntry;

/// Format a number of hours with two decimals: 7.50h
pub fn hours(val: f64) -> String {
    format!("{val:.2}h")
}

/// Sum of the hours cells that parse as numbers.
pub fn total_hours(entries: &[ReportEntry]) -> f64 {
    entries
        .iter()
        .filter_map(|e| e.draft.hours.trim().parse::<f64>().ok())
        .sum()
}

/// "2020-10-02 to 2020-10-09", or "(no entries)".
pub fn date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (Some(s), Some(e)) if s == e => s.format("%Y-%m-%d").to_string(),
        (Some(s), Some(e)) => format!("{} to {}", s.format("%Y-%m-%d"), e.format("%Y-%m-%d")),
        _ => "(no entries)".to_string(),
    }
}
