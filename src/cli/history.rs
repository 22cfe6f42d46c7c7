use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::ledger::list_syncs;

pub fn run(limit: usize) -> Result<()> {
    let conn = super::open_ledger()?;
    let rows = list_syncs(&conn, limit)?;

    if rows.is_empty() {
        println!("No syncs recorded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID", "When", "File", "Checksum", "Report", "Range", "Entries", "Scrubbed", "Failed", "Audit",
    ]);
    for r in rows {
        let range = match (&r.date_range_start, &r.date_range_end) {
            (Some(s), Some(e)) => format!("{s}-{e}"),
            _ => String::new(),
        };
        table.add_row(vec![
            Cell::new(r.id.unwrap_or_default()),
            Cell::new(r.synced_at.unwrap_or_default()),
            Cell::new(r.filename),
            Cell::new(&r.checksum[..r.checksum.len().min(12)]),
            Cell::new(r.report_name),
            Cell::new(range),
            Cell::new(r.entry_count),
            Cell::new(r.scrubbed_count),
            Cell::new(r.failure_count),
            Cell::new(r.audit_file.unwrap_or_default()),
        ]);
    }
    println!("Sync history\n{table}");
    Ok(())
}
