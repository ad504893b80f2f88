//! # shipment-updater
//!
//! Batch utility that sets delivery appointments on shipments tracked by a
//! remote REST API.
//!
//! For every row of an input CSV the utility searches the API by purchase
//! order, and when a shipment is found it patches that shipment with the
//! row's delivery appointment date, time and number. One output row per
//! processed input row is written to `<output>/output.csv`, and the run ends
//! with a single JSON status object on stdout.
//!
//! ## Library use
//!
//! ```rust,no_run
//! use shipment_updater::cli::{RequestArgs, process_shipment_update};
//! use shipment_updater::config::ConfigResolver;
//!
//! #[tokio::main]
//! async fn main() {
//!     let args = RequestArgs {
//!         csv_path: Some("appointments.csv".to_string()),
//!         type_operation: Some("update".to_string()),
//!         output_path: Some("out".to_string()),
//!         config_path: Some("config.json".to_string()),
//!     };
//!     let report = process_shipment_update(&args, &ConfigResolver::new()).await;
//!     println!("{}", report.to_pretty_json().unwrap());
//! }
//! ```

#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

pub use cli::{CAPABILITY_NAME, RunReport, RunStatus};
pub use config::{ApiConfig, ConfigResolver, Decryptor};
pub use crate::core::{ApiResponse, RowOutcome, RowProcessor, ShipmentApi, ShipmentApiClient};
pub use utils::error::{Result, ShipmentError};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
