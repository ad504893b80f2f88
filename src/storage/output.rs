//! Output CSV emission

use crate::utils::error::Result;
use csv::{Terminator, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File name written inside the output directory
pub const OUTPUT_FILE_NAME: &str = "output.csv";

/// Fixed header of the output file
pub const OUTPUT_HEADER: [&str; 6] = [
    "po",
    "Shipment Number",
    "Notification Reason",
    "API Response",
    "Request Json",
    "Response Json",
];

/// One output line per processed input row
///
/// `notification_reason` and `api_response` are never populated; the columns
/// are kept for consumers of the existing layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRecord {
    pub purchase_order: String,
    pub shipment_number: String,
    pub notification_reason: String,
    pub api_response: String,
    pub request_json: String,
    pub response_json: String,
}

impl OutputRecord {
    pub fn new(
        purchase_order: impl Into<String>,
        shipment_number: impl Into<String>,
        request_json: impl Into<String>,
        response_json: impl Into<String>,
    ) -> Self {
        Self {
            purchase_order: purchase_order.into(),
            shipment_number: shipment_number.into(),
            request_json: request_json.into(),
            response_json: response_json.into(),
            ..Default::default()
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.purchase_order.clone(),
            self.shipment_number.clone(),
            self.notification_reason.clone(),
            self.api_response.clone(),
            self.request_json.clone(),
            self.response_json.clone(),
        ]
    }
}

/// Path of the output file for a directory
pub fn output_file_path(output_dir: &Path) -> PathBuf {
    output_dir.join(OUTPUT_FILE_NAME)
}

/// Write `records` to `<output_dir>/output.csv`, creating the directory.
pub fn write_output(output_dir: &Path, records: &[OutputRecord]) -> Result<PathBuf> {
    let path = output_file_path(output_dir);
    write_rows(&path, records.iter().map(OutputRecord::to_row))?;
    Ok(path)
}

/// Write raw rows under the fixed header.
///
/// Rows that are not exactly as wide as the header are skipped with a
/// warning. The header is always written.
pub fn write_rows<I, R>(path: &Path, rows: I) -> Result<()>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[String]>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_path(path)?;

    writer.write_record(OUTPUT_HEADER)?;
    for row in rows {
        let row = row.as_ref();
        if row.len() == OUTPUT_HEADER.len() {
            writer.write_record(row)?;
        } else {
            warn!("Skipping invalid record: {:?}", row);
        }
    }
    writer.flush()?;

    info!("Records written successfully to {}", path.display());
    Ok(())
}
