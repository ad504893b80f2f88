//! Per-row orchestration
//!
//! For each data row: search by purchase order, and when a shipment is found
//! send the delivery appointment update. Rows are processed one at a time and
//! independently; whatever happens to one row never affects another.

use csv::StringRecord;
use tracing::{error, info, warn};

use super::client::{ApiResponse, ShipmentApi};
use super::lookup::{LookupMiss, extract_shipment_id};
use super::payload::{SearchPayload, UpdatePayload, to_wire_json};
use crate::storage::{InputRow, OutputRecord, RowSkip};
use crate::utils::error::Result;

/// What happened to one data row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Shipment found and the update call made
    Updated {
        record: OutputRecord,
        response: ApiResponse,
    },
    /// Search did not identify a shipment; no update call made
    NotFound {
        record: OutputRecord,
        reason: LookupMiss,
    },
    /// Row failed validation and produces no output
    Skipped(RowSkip),
}

impl RowOutcome {
    pub fn record(&self) -> Option<&OutputRecord> {
        match self {
            Self::Updated { record, .. } | Self::NotFound { record, .. } => Some(record),
            Self::Skipped(_) => None,
        }
    }
}

/// A row dropped because processing failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based data row number (header excluded)
    pub row: usize,
    pub reason: String,
}

/// Accumulated result of one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Output records in input order
    pub records: Vec<OutputRecord>,
    pub updated: usize,
    pub not_found: usize,
    pub skipped: Vec<(usize, RowSkip)>,
    pub failures: Vec<RowFailure>,
}

impl BatchReport {
    /// Number of rows that produced an output record
    pub fn processed(&self) -> usize {
        self.records.len()
    }
}

/// Drives the search/update sequence for each row
pub struct RowProcessor<'a, A: ShipmentApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: ShipmentApi + ?Sized> RowProcessor<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Process every data record in order.
    pub async fn process_all(&self, records: &[StringRecord]) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, record) in records.iter().enumerate() {
            let row = index + 1;
            match self.process_record(row, record).await {
                Ok(RowOutcome::Updated { record, .. }) => {
                    report.updated += 1;
                    report.records.push(record);
                }
                Ok(RowOutcome::NotFound { record, .. }) => {
                    report.not_found += 1;
                    report.records.push(record);
                }
                Ok(RowOutcome::Skipped(skip)) => report.skipped.push((row, skip)),
                Err(e) => {
                    error!("Error processing row {}: {}", row, e);
                    report.failures.push(RowFailure {
                        row,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Batch finished: {} updated, {} not found, {} skipped, {} failed",
            report.updated,
            report.not_found,
            report.skipped.len(),
            report.failures.len()
        );
        report
    }

    /// Validate and process one raw record.
    pub async fn process_record(&self, row: usize, record: &StringRecord) -> Result<RowOutcome> {
        match InputRow::from_record(record) {
            Ok(input) => {
                info!(
                    "Processing row {} with params: po='{}' date='{}' time='{}' appt='{}'",
                    row,
                    input.purchase_order,
                    input.delivery_appt_date,
                    input.delivery_appt_time,
                    input.delivery_appt_number
                );
                self.process_row(&input).await
            }
            Err(skip) => {
                warn!("Skipping invalid row {}: {}", row, skip);
                Ok(RowOutcome::Skipped(skip))
            }
        }
    }

    /// Search for the row's shipment and update it when found.
    pub async fn process_row(&self, input: &InputRow) -> Result<RowOutcome> {
        let search_payload = to_wire_json(&SearchPayload::new(input.purchase_order.as_str()))?;
        let search_response = self.api.search_shipment(&search_payload).await;

        match extract_shipment_id(&search_response.body) {
            Ok(shipment_id) => {
                let update = UpdatePayload::for_appointment(
                    &input.delivery_appt_date,
                    &input.delivery_appt_time,
                    &input.delivery_appt_number,
                );
                let update_payload = to_wire_json(&update)?;
                let response = self.api.update_shipment(&update_payload, &shipment_id).await;

                let record = OutputRecord::new(
                    input.purchase_order.as_str(),
                    shipment_id,
                    update_payload,
                    response.body.as_str(),
                );
                Ok(RowOutcome::Updated { record, response })
            }
            Err(reason) => {
                warn!(
                    "Shipment not found for PO {}: {}",
                    input.purchase_order, reason
                );
                let record = OutputRecord::new(
                    input.purchase_order.as_str(),
                    "",
                    search_payload,
                    search_response.body,
                );
                Ok(RowOutcome::NotFound { record, reason })
            }
        }
    }
}
