//! Utility modules for the shipment updater
//!
//! - **error**: crate error type and `Result` alias
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;

pub use error::{Result, ShipmentError};
pub use logging::init_logging;
