//! Integration tests

pub mod batch_update_tests;
pub mod dispatch_tests;
