use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One data row of the source file, cells in file order.
pub type RawRow = Vec<String>;

/// A person record as returned by the destination service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(rename = "first-name", default)]
    pub first_name: String,
    #[serde(rename = "last-name", default)]
    pub last_name: String,
}

/// A destination-native time entry, ready to post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEntryDraft {
    #[serde(rename = "person-id")]
    pub person_id: String,
    pub date: String,
    pub hours: String,
    pub minutes: String,
    pub description: String,
    #[serde(rename = "project-id")]
    pub project_id: String,
    #[serde(rename = "task-id")]
    pub task_id: String,
}

/// A draft together with the source row it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    /// 1-based data row number (header excluded).
    pub line: usize,
    pub cells: RawRow,
    pub draft: TimeEntryDraft,
}

#[derive(Debug, Clone)]
pub struct ParsedReport {
    pub source_file: PathBuf,
    pub header: Vec<String>,
    pub entries: Vec<ReportEntry>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ParsedReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Created(String),
    Failed(String),
}

impl UploadOutcome {
    /// Text for the audit file's trailing column.
    pub fn audit_value(&self) -> &str {
        match self {
            Self::Created(id) => id,
            Self::Failed(msg) => msg,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}
