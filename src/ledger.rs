use rusqlite::Connection;

use crate::error::{BridgeError, Result};

/// One recorded `sync` run.
#[derive(Debug, Clone)]
pub struct SyncRecord {
    pub id: Option<i64>,
    pub filename: String,
    pub checksum: String,
    pub report_name: String,
    pub date_range_start: Option<String>,
    pub date_range_end: Option<String>,
    pub entry_count: i64,
    pub scrubbed_count: i64,
    pub failure_count: i64,
    pub audit_file: Option<String>,
    pub synced_at: Option<String>,
}

pub fn record_sync(conn: &Connection, record: &SyncRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO syncs (filename, checksum, report_name, date_range_start, date_range_end, \
         entry_count, scrubbed_count, failure_count, audit_file) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            record.filename,
            record.checksum,
            record.report_name,
            record.date_range_start,
            record.date_range_end,
            record.entry_count,
            record.scrubbed_count,
            record.failure_count,
            record.audit_file,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// True when a file with this checksum has already been uploaded without failures.
pub fn is_completed(conn: &Connection, checksum: &str) -> Result<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM syncs WHERE checksum = ?1 AND failure_count = 0 AND audit_file IS NOT NULL",
    )?;
    Ok(stmt.exists([checksum])?)
}

/// Refuse a file that already synced cleanly, unless `force` is set.
pub fn ensure_not_synced(conn: &Connection, checksum: &str, force: bool) -> Result<()> {
    if !is_completed(conn, checksum)? {
        return Ok(());
    }
    if force {
        log::info!("{checksum} was already synced, syncing again");
        return Ok(());
    }
    Err(BridgeError::AlreadySynced(checksum.to_string()))
}

pub fn list_syncs(conn: &Connection, limit: usize) -> Result<Vec<SyncRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, filename, checksum, report_name, date_range_start, date_range_end, \
         entry_count, scrubbed_count, failure_count, audit_file, synced_at \
         FROM syncs ORDER BY id DESC LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit as i64], |row| {
            Ok(SyncRecord {
                id: row.get(0)?,
                filename: row.get(1)?,
                checksum: row.get(2)?,
                report_name: row.get(3)?,
                date_range_start: row.get(4)?,
                date_range_end: row.get(5)?,
                entry_count: row.get(6)?,
                scrubbed_count: row.get(7)?,
                failure_count: row.get(8)?,
                audit_file: row.get(9)?,
                synced_at: row.get(10)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_syncs(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT count(*) FROM syncs", [], |r| r.get(0))?)
}
