use std::path::Path;

use comfy_table::{Cell, Table};

use crate::error::{BridgeError, Result};
use crate::preflight::{check_report, Problem};
use crate::settings::load_settings;

pub fn run(file: &Path, mapping: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let schema = super::load_schema(&settings, mapping)?;
    let result = check_report(file, &schema)?;

    if result.is_clean() {
        println!("{}: {} rows, all identifiers mapped", file.display(), result.rows);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Row", "Problem", "Value"]);
    for p in &result.problems {
        match p {
            Problem::Unmapped { table: t, key, first_line } => {
                table.add_row(vec![
                    Cell::new(first_line),
                    Cell::new(format!("no {t} mapping")),
                    Cell::new(key),
                ]);
            }
            Problem::InvalidDate { value, line } => {
                table.add_row(vec![Cell::new(line), Cell::new("invalid date"), Cell::new(value)]);
            }
        }
    }
    println!("Problems\n{table}");

    Err(BridgeError::Other(format!(
        "{} problem(s) found in {}",
        result.problems.len(),
        file.display()
    )))
}
