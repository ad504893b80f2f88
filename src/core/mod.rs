//! Core shipment update pipeline
//!
//! - `sigv4`: request signing
//! - `client`: signed HTTP calls to the shipment API
//! - `payload`: search/update bodies and their wire format
//! - `lookup`: shipment id extraction from search responses
//! - `processor`: per-row search → update orchestration

pub mod client;
pub mod lookup;
pub mod payload;
pub mod processor;
pub mod sigv4;

pub use client::{ApiResponse, ShipmentApi, ShipmentApiClient};
pub use lookup::{LookupMiss, extract_shipment_id};
pub use payload::{DeliveryDates, SearchPayload, UpdatePayload, to_wire_json};
pub use processor::{BatchReport, RowFailure, RowOutcome, RowProcessor};
pub use sigv4::SigV4Signer;
