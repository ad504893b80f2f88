//! Invocation handling: pick the input source, route the capability, run the
//! batch and produce the status report.

use std::io::{self, IsTerminal, Read};
use std::path::Path;
use std::process::ExitCode;

use clap::error::ErrorKind;
use tracing::{debug, error, info, warn};

use super::args::CliArgs;
use super::request::{CAPABILITY_NAME, CapabilityRequest, RequestArgs, RunReport, USAGE_CLI};
use crate::config::ConfigResolver;
use crate::core::{BatchReport, RowProcessor, ShipmentApiClient};
use crate::storage::{output_file_path, read_input_records, write_output};
use crate::utils::error::{Result, ShipmentError};

/// Operation label used when a request does not name one
pub const DEFAULT_OPERATION: &str = "create";

/// Read stdin when it is piped; `None` when it is an interactive terminal.
pub fn read_piped_stdin() -> io::Result<Option<String>> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut buf = String::new();
    stdin.read_to_string(&mut buf)?;
    Ok(Some(buf))
}

/// Run one invocation end to end.
///
/// `argv` excludes the program name. Piped, non-blank `stdin` takes priority
/// over flags.
pub async fn run(argv: Vec<String>, stdin: Option<String>, resolver: &ConfigResolver) -> RunReport {
    match resolve_request(argv, stdin) {
        Ok(request) => dispatch(request, resolver).await,
        Err(report) => report,
    }
}

/// Work out the request from stdin or flags, or the report explaining why
/// there is none. `--help` and `--version` come back as a success report
/// carrying clap's text.
pub fn resolve_request(
    argv: Vec<String>,
    stdin: Option<String>,
) -> std::result::Result<CapabilityRequest, RunReport> {
    if let Some(text) = stdin.filter(|s| !s.trim().is_empty()) {
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(RunReport::invalid_json)?;
        return serde_json::from_value(value).map_err(|e| {
            RunReport::error(
                format!("Error: {}", ShipmentError::invalid_request(e.to_string())),
                Some(super::request::UNKNOWN_CAPABILITY),
            )
        });
    }

    if argv.is_empty() {
        return Err(RunReport::usage());
    }

    let args = match CliArgs::try_parse_args(argv) {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return Err(RunReport::success(e.render().to_string().trim(), None));
        }
        Err(e) => {
            error!("Usage: {}", USAGE_CLI);
            return Err(RunReport::error(
                e.render().to_string().trim().to_string(),
                Some(CAPABILITY_NAME),
            ));
        }
    };

    if !args.has_required() {
        error!("Usage: {}", USAGE_CLI);
        return Err(RunReport::error(
            "Missing required arguments: -source, -type, -output",
            Some(CAPABILITY_NAME),
        ));
    }

    Ok(args.into())
}

/// Route a request to its capability.
pub async fn dispatch(request: CapabilityRequest, resolver: &ConfigResolver) -> RunReport {
    match request.capability.as_deref() {
        Some(CAPABILITY_NAME) => {
            let args = request.args.unwrap_or_default();
            process_shipment_update(&args, resolver).await
        }
        other => {
            let err = ShipmentError::UnknownCapability(other.unwrap_or("<none>").to_string());
            error!("{}", err);
            RunReport::error(err.to_string(), other)
        }
    }
}

/// Run the shipment update batch described by `args`.
pub async fn process_shipment_update(args: &RequestArgs, resolver: &ConfigResolver) -> RunReport {
    match try_process(args, resolver).await {
        Ok(report) => report,
        Err(e) => {
            error!("Error in shipment update run: {}", e);
            RunReport::error(e.to_string(), Some(CAPABILITY_NAME))
        }
    }
}

async fn try_process(args: &RequestArgs, resolver: &ConfigResolver) -> Result<RunReport> {
    let csv_path = args
        .csv_path
        .as_deref()
        .ok_or_else(|| ShipmentError::missing_argument("csv_path"))?;
    let output_path = args
        .output_path
        .as_deref()
        .ok_or_else(|| ShipmentError::missing_argument("output_path"))?;
    let operation = args.type_operation.as_deref().unwrap_or(DEFAULT_OPERATION);

    info!("Starting shipment {} run for {}", operation, csv_path);

    let (config, source) = resolver.resolve(args.config_path.as_deref().map(Path::new));
    debug!("Using {:?} from {:?}", config, source);

    let records = read_input_records(Path::new(csv_path))?;
    let client = ShipmentApiClient::new(&config)?;

    let batch = if records.is_empty() {
        warn!("No data rows found in CSV.");
        BatchReport::default()
    } else {
        RowProcessor::new(&client).process_all(&records).await
    };

    let output_dir = Path::new(output_path);
    let output_file = output_file_path(output_dir);
    // A failed write is logged only; the run still reports success.
    if let Err(e) = write_output(output_dir, &batch.records) {
        error!("Error writing CSV: {}, {}", output_file.display(), e);
    }

    let message = if records.is_empty() {
        "No data rows found in CSV".to_string()
    } else {
        format!("Processed {} records", batch.processed())
    };

    Ok(RunReport::success(
        message,
        Some(output_file.display().to_string()),
    ))
}

/// Process exit code for a report
pub fn exit_code(report: &RunReport) -> ExitCode {
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
