//! Structured request and status report
//!
//! Requests arrive on stdin as
//! `{"capability": "la_shipment_update", "args": {...}}`; every invocation
//! ends with exactly one pretty-printed [`RunReport`] on stdout.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::args::CliArgs;

/// The only capability this binary serves
pub const CAPABILITY_NAME: &str = "la_shipment_update";

/// Capability tag reported when the request could not be read
pub const UNKNOWN_CAPABILITY: &str = "unknown";

/// Command-line synopsis shown in usage reports
pub const USAGE_CLI: &str = "shipment-updater -source <input.csv> -type <type> -output <output_directory_path> [-config <config_path>]";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRequest {
    #[serde(default)]
    pub capability: Option<String>,
    #[serde(default)]
    pub args: Option<RequestArgs>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestArgs {
    #[serde(default)]
    pub csv_path: Option<String>,
    #[serde(default)]
    pub type_operation: Option<String>,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub config_path: Option<String>,
}

impl From<CliArgs> for CapabilityRequest {
    fn from(args: CliArgs) -> Self {
        Self {
            capability: Some(CAPABILITY_NAME.to_string()),
            args: Some(RequestArgs {
                csv_path: args.source,
                type_operation: args.operation,
                output_path: args.output,
                config_path: args.config,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

/// Final status object of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_json: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_cli: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    pub capability: Option<String>,
}

impl RunReport {
    pub fn success(message: impl Into<String>, output_file: Option<String>) -> Self {
        Self {
            status: RunStatus::Success,
            message: Some(message.into()),
            error: None,
            hint: None,
            usage_json: None,
            usage_cli: None,
            output_file,
            capability: Some(CAPABILITY_NAME.to_string()),
        }
    }

    pub fn error(error: impl Into<String>, capability: Option<&str>) -> Self {
        Self {
            status: RunStatus::Error,
            message: None,
            error: Some(error.into()),
            hint: None,
            usage_json: None,
            usage_cli: None,
            output_file: None,
            capability: capability.map(str::to_string),
        }
    }

    /// Report for stdin that is not valid JSON
    pub fn invalid_json(detail: impl std::fmt::Display) -> Self {
        Self {
            hint: Some("Provide JSON via stdin or use command-line arguments".to_string()),
            ..Self::error(
                format!("Invalid JSON input: {}", detail),
                Some(UNKNOWN_CAPABILITY),
            )
        }
    }

    /// Report for an invocation with neither stdin nor flags
    pub fn usage() -> Self {
        Self {
            usage_json: Some(json!({
                "capability": CAPABILITY_NAME,
                "args": {
                    "csv_path": "/path/to/input.csv",
                    "type_operation": "create or update",
                    "output_path": "/path/to/output",
                    "config_path": "/path/to/config.json (optional)"
                }
            })),
            usage_cli: Some(USAGE_CLI.to_string()),
            ..Self::error(
                "No input provided. Either pipe JSON via stdin or use command-line arguments.",
                Some(UNKNOWN_CAPABILITY),
            )
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
