//! Command-line and stdin entry surface
//!
//! `args` parses the flag form, `request` defines the stdin envelope and the
//! status report, and `runner` picks between them and runs the batch.

pub mod args;
pub mod request;
pub mod runner;

pub use args::CliArgs;
pub use request::{CAPABILITY_NAME, CapabilityRequest, RequestArgs, RunReport, RunStatus};
pub use runner::{dispatch, exit_code, process_shipment_update, read_piped_stdin, run};
