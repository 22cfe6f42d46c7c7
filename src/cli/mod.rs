pub mod check;
pub mod history;
pub mod init;
pub mod preview;
pub mod status;
pub mod sync;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::error::{BridgeError, Result};
use crate::remote::TeamworkClient;
use crate::schema::ReportSchema;
use crate::settings::{get_data_dir, Settings};

pub(crate) fn open_ledger() -> Result<Connection> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let conn = get_connection(&data_dir.join("timebridge.db"))?;
    init_db(&conn)?;
    Ok(conn)
}

pub(crate) fn load_schema(settings: &Settings, mapping: Option<&str>) -> Result<ReportSchema> {
    let path = settings.mapping_path(mapping)?;
    let schema = ReportSchema::load(&path)?;
    log::info!("Loaded mapping {} for report {}", path.display(), schema.name);
    Ok(schema)
}

pub(crate) fn make_client(settings: &Settings) -> Result<TeamworkClient> {
    let key = settings.resolved_api_key().ok_or_else(|| {
        BridgeError::Settings(format!(
            "no API key configured. Set {} or run `timebridge init --api-key <key>`.",
            crate::settings::API_KEY_ENV
        ))
    })?;
    TeamworkClient::new(&settings.api_url, &key)
}

#[derive(Parser)]
#[command(
    name = "timebridge",
    version,
    about = "Sync Unanet time-detail exports into Teamwork time entries."
)]
pub struct Cli {
    /// Log pipeline progress (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save API and mapping settings.
    Init {
        /// Teamwork base URL, e.g. https://acme.teamwork.com
        #[arg(long = "api-url")]
        api_url: Option<String>,
        /// Teamwork API key (or set TIMEBRIDGE_API_KEY)
        #[arg(long = "api-key")]
        api_key: Option<String>,
        /// Path to the report mapping JSON
        #[arg(long)]
        mapping: Option<String>,
        /// Where the sync ledger lives
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Check a report against the mapping without contacting Teamwork.
    Check {
        /// Report CSV file
        file: PathBuf,
        /// Mapping JSON (default: from settings)
        #[arg(long)]
        mapping: Option<String>,
    },
    /// Parse and scrub a report, then show the entries that would be created.
    Preview {
        file: PathBuf,
        #[arg(long)]
        mapping: Option<String>,
    },
    /// Upload a report's entries and write the audit file.
    Sync {
        file: PathBuf,
        #[arg(long)]
        mapping: Option<String>,
        /// Directory for the audit file (default: next to the report)
        #[arg(long = "output-dir")]
        output_dir: Option<PathBuf>,
        /// Sync even if this file was already synced successfully
        #[arg(long)]
        force: bool,
    },
    /// List recorded sync runs.
    History {
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show current settings and ledger summary.
    Status,
}
