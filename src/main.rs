mod cli;
mod columns;
mod dates;
mod db;
mod error;
mod fmt;
mod importer;
mod ledger;
mod logger;
mod models;
mod preflight;
mod remote;
mod schema;
mod scrubber;
mod settings;
mod sync;
mod transformer;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    let result = match cli.command {
        Commands::Init {
            api_url,
            api_key,
            mapping,
            data_dir,
        } => cli::init::run(api_url, api_key, mapping, data_dir),
        Commands::Check { file, mapping } => cli::check::run(&file, mapping.as_deref()),
        Commands::Preview { file, mapping } => cli::preview::run(&file, mapping.as_deref()),
        Commands::Sync {
            file,
            mapping,
            output_dir,
            force,
        } => cli::sync::run(&file, mapping.as_deref(), output_dir, force),
        Commands::History { limit } => cli::history::run(limit),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
