//! Shipment API HTTP client
//!
//! Every call is signed with SigV4, carries the static `x-api-key` header and
//! is attempted exactly once. A received response is returned as-is whatever
//! its status; only a failure before any response leaves `code` unset.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use std::collections::BTreeMap;
use tracing::{debug, error, info};

use super::sigv4::SigV4Signer;
use crate::config::ApiConfig;
use crate::utils::error::{Result, ShipmentError};

/// Resource path of the search operation
pub const SEARCH_RESOURCE: &str = "search";
/// Static API key header
pub const API_KEY_HEADER: &str = "x-api-key";

/// Outcome of one API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status; `None` when the call did not complete
    pub code: Option<u16>,
    /// Response text, or the error description when `code` is `None`
    pub body: String,
}

impl ApiResponse {
    pub fn completed(code: u16, body: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            body: body.into(),
        }
    }

    pub fn failed(description: impl Into<String>) -> Self {
        Self {
            code: None,
            body: description.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.code.is_some()
    }
}

/// Operations the row processor needs from the remote service
#[async_trait]
pub trait ShipmentApi: Send + Sync {
    /// Send `payload` to `base_url + resource_path`.
    async fn call(&self, resource_path: &str, payload: &str, method: Method) -> ApiResponse;

    async fn search_shipment(&self, payload: &str) -> ApiResponse {
        self.call(SEARCH_RESOURCE, payload, Method::POST).await
    }

    async fn update_shipment(&self, payload: &str, shipment_id: &str) -> ApiResponse {
        self.call(shipment_id, payload, Method::PATCH).await
    }
}

/// reqwest-backed [`ShipmentApi`]
#[derive(Debug, Clone)]
pub struct ShipmentApiClient {
    http: Client,
    config: ApiConfig,
    signer: SigV4Signer,
}

impl ShipmentApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("{}/{}", crate::NAME, crate::VERSION))
            .build()?;

        Ok(Self {
            http,
            config: config.clone(),
            signer: SigV4Signer::from_config(config),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn build_headers(&self, method: &Method, url: &str, payload: &str) -> Result<HeaderMap> {
        let mut to_sign = BTreeMap::new();
        to_sign.insert(
            CONTENT_TYPE.as_str().to_string(),
            "application/json".to_string(),
        );

        let signed = self
            .signer
            .sign_request(method.as_str(), url, &to_sign, payload, Utc::now())?;

        let mut headers = HeaderMap::new();
        // reqwest derives Host from the URL
        for (key, value) in signed.iter().filter(|(k, _)| k.as_str() != "host") {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| ShipmentError::signing(format!("Invalid header name '{}': {}", key, e)))?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ShipmentError::signing(format!("Invalid header value for '{}': {}", key, e))
            })?;
            headers.insert(name, value);
        }

        let api_key = HeaderValue::from_str(&self.config.api_key)
            .map_err(|e| ShipmentError::config(format!("Invalid API key header value: {}", e)))?;
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        Ok(headers)
    }

    async fn try_call(&self, url: &str, payload: &str, method: Method) -> Result<ApiResponse> {
        let headers = self.build_headers(&method, url, payload)?;

        debug!("Request body: {}", payload);
        let response = self
            .http
            .request(method, url)
            .headers(headers)
            .body(payload.to_string())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to read response body: {}", e);
                e.to_string()
            }
        };
        Ok(ApiResponse::completed(status, body))
    }
}

#[async_trait]
impl ShipmentApi for ShipmentApiClient {
    async fn call(&self, resource_path: &str, payload: &str, method: Method) -> ApiResponse {
        let url = self.config.url_for(resource_path);
        let label = method.to_string();

        match self.try_call(&url, payload, method).await {
            Ok(response) => {
                info!(
                    "API call [{} {}] - Status: {}",
                    label,
                    url,
                    response.code.unwrap_or_default()
                );
                info!("Response body: {}", response.body);
                response
            }
            Err(e) => {
                error!("Error calling API [{} {}]: {}", label, url, e);
                ApiResponse::failed(e.to_string())
            }
        }
    }
}
