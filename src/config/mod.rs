//! Configuration for the shipment API
//!
//! `ApiConfig` is built once per run by [`loader::ConfigResolver`] and then
//! handed by reference to the API client. Nothing mutates it afterwards.

pub mod loader;

pub use loader::{ConfigResolver, ConfigSource, Decryptor, PassThroughDecryptor};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection and credential settings for the shipment-tracking API
///
/// Every field defaults to an empty string; a key missing from the
/// configuration document leaves its field empty rather than failing the load.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    /// AWS region used in the signing scope
    pub region: String,
    /// AWS service name used in the signing scope
    pub service: String,
    /// Prefix every resource path is appended to
    pub base_url: String,
    /// Value of the `x-api-key` header
    pub api_key: String,
    /// AWS access key id
    pub access_key: String,
    /// AWS secret access key
    pub secret_key: String,
}

impl ApiConfig {
    /// Parse a configuration document
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Full URL for a resource path
    pub fn url_for(&self, resource_path: &str) -> String {
        format!("{}{}", self.base_url, resource_path)
    }

    /// True when no field has been populated
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "" } else { "***" }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("region", &self.region)
            .field("service", &self.service)
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("access_key", &redact(&self.access_key))
            .field("secret_key", &redact(&self.secret_key))
            .finish()
    }
}
