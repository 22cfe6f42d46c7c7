use std::path::PathBuf;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(
    api_url: Option<String>,
    api_key: Option<String>,
    mapping: Option<String>,
    data_dir: Option<String>,
) -> Result<()> {
    let mut settings = load_settings();

    if let Some(url) = api_url {
        settings.api_url = url.trim_end_matches('/').to_string();
    }
    if let Some(key) = api_key {
        settings.api_key = key;
    }
    if let Some(path) = mapping {
        settings.mapping_file = shellexpand_path(&path);
    }
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }

    save_settings(&settings)?;
    std::fs::create_dir_all(PathBuf::from(&settings.data_dir))?;
    super::open_ledger()?;

    println!("Initialized timebridge at {}", settings.data_dir);
    Ok(())
}
