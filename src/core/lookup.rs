//! Shipment lookup from search responses

use serde_json::Value;
use std::fmt;
use tracing::{error, warn};

/// Why a search response did not identify a shipment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupMiss {
    EmptyBody,
    InvalidJson(String),
    MissingShipments,
    EmptyShipments,
    MissingShipmentId,
}

impl fmt::Display for LookupMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "response body is empty"),
            Self::InvalidJson(e) => write!(f, "response body is not valid JSON: {}", e),
            Self::MissingShipments => write!(f, "'shipments' array is missing"),
            Self::EmptyShipments => write!(f, "'shipments' array is empty"),
            Self::MissingShipmentId => write!(f, "'shipment_id' field is missing"),
        }
    }
}

/// Extract `shipments[0].shipment_id` from a search response body.
///
/// A non-zero numeric id is accepted and rendered as its decimal text; zero
/// counts as missing, like an empty string.
pub fn extract_shipment_id(body: &str) -> Result<String, LookupMiss> {
    let result = lookup(body);
    match &result {
        Err(LookupMiss::InvalidJson(e)) => error!("Error parsing JSON for shipment_id: {}", e),
        Err(miss) => warn!("{}", miss),
        Ok(_) => {}
    }
    result
}

fn lookup(body: &str) -> Result<String, LookupMiss> {
    if body.trim().is_empty() {
        return Err(LookupMiss::EmptyBody);
    }

    let data: Value =
        serde_json::from_str(body).map_err(|e| LookupMiss::InvalidJson(e.to_string()))?;

    let shipments = data
        .get("shipments")
        .and_then(Value::as_array)
        .ok_or(LookupMiss::MissingShipments)?;

    let first = shipments.first().ok_or(LookupMiss::EmptyShipments)?;

    match first.get("shipment_id") {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Ok(n.to_string()),
        _ => Err(LookupMiss::MissingShipmentId),
    }
}
