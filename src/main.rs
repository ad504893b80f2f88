//! shipment-updater CLI entrypoint
//!
//! Reads a structured request from piped stdin, or falls back to
//! `-source/-type/-output/-config` flags, then prints one JSON status object.

use shipment_updater::cli::{self, RunReport};
use shipment_updater::config::ConfigResolver;
use shipment_updater::utils::init_logging;
use std::process::ExitCode;

/// Set to `json` for JSON log lines on stderr
const LOG_FORMAT_ENV: &str = "SHIPMENT_UPDATER_LOG_FORMAT";

#[tokio::main]
async fn main() -> ExitCode {
    let json_logs = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    init_logging(json_logs);

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let resolver = ConfigResolver::new();

    let report = match cli::read_piped_stdin() {
        Ok(stdin) => cli::run(argv, stdin, &resolver).await,
        Err(e) => RunReport::error(format!("Error: {}", e), Some("unknown")),
    };

    match report.to_pretty_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    cli::exit_code(&report)
}
