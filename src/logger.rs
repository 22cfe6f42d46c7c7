use std::io::Write;

use env_logger::{Builder, Env};
use log::LevelFilter;

fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    }
}

fn builder(env: Env) -> Builder {
    let mut builder = Builder::from_env(env);
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{:5}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr);
    builder
}

/// Set up console logging on stderr.
///
/// `RUST_LOG` wins when set, including per-module directives; otherwise
/// `--verbose` selects `info` and the default is `warn`.
///
/// ```bash
/// RUST_LOG=debug timebridge sync report.csv
/// RUST_LOG=warn,timebridge::sync=debug timebridge sync report.csv
/// ```
pub fn init_logger(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).as_str());
    builder(env).try_init().ok(); // already initialised in tests
}
