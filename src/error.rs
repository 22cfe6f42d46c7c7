use thiserror::Error;

use crate::schema::MappingTable;

/// A single record that the remote service rejected during a batch upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFailure {
    /// 1-based data row number in the source file; `None` for file-level failures.
    pub line: Option<usize>,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("required number of columns ({expected}) not present - found {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    #[error("required columns not found: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("no {table} mapping found for {key}")]
    UnmappedIdentifier { table: MappingTable, key: String },

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("failed to resolve person {key} (id {id}): {reason}")]
    PersonResolutionFailed {
        key: String,
        id: String,
        reason: String,
    },

    #[error("{0}")]
    Remote(String),

    #[error("one or more errors occurred: {}", join_failures(.failures))]
    BatchFailed {
        attempted: usize,
        failures: Vec<UploadFailure>,
        audit_file: String,
    },

    #[error("This file has already been synced (checksum {0}). Use --force to sync it again.")]
    AlreadySynced(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

fn join_failures(failures: &[UploadFailure]) -> String {
    failures
        .iter()
        .map(|f| match f.line {
            Some(line) => format!("row {line}: {}", f.message),
            None => f.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, BridgeError>;
