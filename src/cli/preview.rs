use std::path::Path;

use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::{date_range, hours, total_hours};
use crate::importer::parse_report;
use crate::scrubber::{scrub, DEFAULT_POLICIES};
use crate::settings::load_settings;

pub fn run(file: &Path, mapping: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let schema = super::load_schema(&settings, mapping)?;
    let client = super::make_client(&settings)?;

    let mut report = parse_report(file, &schema, &client)?;
    let removed = scrub(&mut report, DEFAULT_POLICIES);
    if report.is_empty() {
        println!("No entries to sync in {}.", file.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Row", "Date", "Person", "Project", "Task", "Hours"]);
    for e in &report.entries {
        let d = &e.draft;
        table.add_row(vec![
            Cell::new(e.line),
            Cell::new(&d.date),
            Cell::new(&d.person_id),
            Cell::new(&d.project_id),
            Cell::new(&d.task_id),
            Cell::new(&d.hours),
        ]);
    }
    println!("{} ({})\n{table}", schema.name, date_range(report.start_date, report.end_date));
    println!(
        "{} entries, {} total, {} scrubbed",
        report.len(),
        hours(total_hours(&report.entries)),
        removed.len()
    );
    for r in &removed {
        println!("  row {}: {} [{}]", r.line, r.reason, r.policy.key());
    }
    Ok(())
}
