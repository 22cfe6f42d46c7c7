use crate::error::Result;
use crate::ledger::count_syncs;
use crate::settings::{load_settings, settings_file_exists};

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

pub fn run() -> Result<()> {
    if !settings_file_exists() {
        println!("No settings found. Run `timebridge init` to set up.");
    }
    let settings = load_settings();
    let key = if settings.resolved_api_key().is_some() { "(set)" } else { "(not set)" };

    println!("API URL:    {}", or_unset(&settings.api_url));
    println!("API key:    {key}");
    println!("Mapping:    {}", or_unset(&settings.mapping_file));
    println!("Data dir:   {}", settings.data_dir);

    let db_path = std::path::PathBuf::from(&settings.data_dir).join("timebridge.db");
    if db_path.exists() {
        let conn = super::open_ledger()?;
        println!();
        println!("Syncs:      {}", count_syncs(&conn)?);
    }
    Ok(())
}
