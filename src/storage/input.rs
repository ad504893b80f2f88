//! Input CSV ingestion
//!
//! Columns, positionally: id, purchase order, delivery appointment date
//! (`YYYYMMDD`), delivery appointment time (`HHMMSS`), appointment number.
//! The first record is a header and is ignored.

use crate::utils::error::{Result, ShipmentError};
use csv::{ReaderBuilder, StringRecord};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Minimum number of columns a data row needs
pub const MIN_COLUMNS: usize = 5;

/// One validated data row, fields trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    pub id: String,
    pub purchase_order: String,
    pub delivery_appt_date: String,
    pub delivery_appt_time: String,
    pub delivery_appt_number: String,
}

/// Why a data row was left out of the batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSkip {
    TooFewColumns { found: usize },
    MissingPurchaseOrder,
}

impl fmt::Display for RowSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewColumns { found } => write!(
                f,
                "expected at least {} columns, found {}",
                MIN_COLUMNS, found
            ),
            Self::MissingPurchaseOrder => write!(f, "missing purchase order"),
        }
    }
}

impl InputRow {
    pub fn from_record(record: &StringRecord) -> std::result::Result<Self, RowSkip> {
        if record.len() < MIN_COLUMNS {
            return Err(RowSkip::TooFewColumns {
                found: record.len(),
            });
        }

        let field = |i: usize| record.get(i).unwrap_or_default().trim().to_string();

        let purchase_order = field(1);
        if purchase_order.is_empty() {
            return Err(RowSkip::MissingPurchaseOrder);
        }

        Ok(Self {
            id: field(0),
            purchase_order,
            delivery_appt_date: field(2),
            delivery_appt_time: field(3),
            delivery_appt_number: field(4),
        })
    }
}

/// Raw data records of an input file, header removed.
///
/// Rows may be ragged; validation happens per row in the processor.
pub fn read_input_records(path: &Path) -> Result<Vec<StringRecord>> {
    if !path.exists() {
        return Err(ShipmentError::InputNotFound(path.display().to_string()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!("CSV file contents: {:?}", records);

    Ok(records.into_iter().skip(1).collect())
}
