//! Common test utilities for shipment-updater
//!
//! All fixtures live in a per-test temporary directory, and the config
//! resolver is pointed at a fallback file inside it so the working
//! directory never leaks into a test.

pub mod fixtures;

pub use fixtures::{TestWorkspace, mount_search, mount_update, read_csv};
