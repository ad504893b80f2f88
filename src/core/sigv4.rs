//! AWS SigV4 request signing
//!
//! Signature Version 4 (`AWS4-HMAC-SHA256`) for calls to the shipment API.
//! The signer needs five inputs: access key, secret key, region, service
//! name and the canonical request built from the outgoing call.

use crate::config::ApiConfig;
use crate::utils::error::{Result, ShipmentError};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Header carrying the hex SHA-256 of the body
pub const CONTENT_SHA256_HEADER: &str = "x-amz-content-sha256";
/// Header carrying the signing timestamp
pub const DATE_HEADER: &str = "x-amz-date";

/// AWS SigV4 signer
#[derive(Clone)]
pub struct SigV4Signer {
    access_key: String,
    secret_key: String,
    region: String,
    service: String,
}

impl std::fmt::Debug for SigV4Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigV4Signer")
            .field("region", &self.region)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl SigV4Signer {
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: region.into(),
            service: service.into(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(
            config.access_key.as_str(),
            config.secret_key.as_str(),
            config.region.as_str(),
            config.service.as_str(),
        )
    }

    /// Sign a request.
    ///
    /// `headers` are the headers to include in the signature. The returned
    /// map holds them plus `host`, `x-amz-date`, `x-amz-content-sha256` and
    /// `Authorization`, keyed in lower case except `Authorization`.
    pub fn sign_request(
        &self,
        method: &str,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<BTreeMap<String, String>> {
        let parsed_url = url::Url::parse(url)?;
        let host = canonical_host(&parsed_url)?;

        let amz_date = timestamp.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = timestamp.format("%Y%m%d").to_string();
        let payload_hash = hex::encode(Sha256::digest(body.as_bytes()));

        // BTreeMap keeps the canonical header order
        let mut canonical_headers: BTreeMap<String, String> = headers
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.trim().to_string()))
            .collect();
        canonical_headers.insert("host".to_string(), host);
        canonical_headers.insert(DATE_HEADER.to_string(), amz_date.clone());
        canonical_headers.insert(CONTENT_SHA256_HEADER.to_string(), payload_hash.clone());

        let canonical_headers_str: String = canonical_headers
            .iter()
            .map(|(k, v)| format!("{}:{}\n", k, v))
            .collect();

        let signed_headers = canonical_headers
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(";");

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method.to_uppercase(),
            canonical_uri(&parsed_url),
            canonical_query(&parsed_url),
            canonical_headers_str,
            signed_headers,
            payload_hash
        );

        let credential_scope = format!(
            "{}/{}/{}/aws4_request",
            date_stamp, self.region, self.service
        );
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            credential_scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signature = self.calculate_signature(&string_to_sign, &date_stamp)?;

        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, self.access_key, credential_scope, signed_headers, signature
        );

        let mut final_headers = canonical_headers;
        final_headers.insert("Authorization".to_string(), authorization);
        Ok(final_headers)
    }

    fn calculate_signature(&self, string_to_sign: &str, date_stamp: &str) -> Result<String> {
        let k_date = hmac_sha256(
            format!("AWS4{}", self.secret_key).as_bytes(),
            date_stamp.as_bytes(),
        )?;
        let k_region = hmac_sha256(&k_date, self.region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, self.service.as_bytes())?;
        let k_signing = hmac_sha256(&k_service, b"aws4_request")?;

        let signature = hmac_sha256(&k_signing, string_to_sign.as_bytes())?;
        Ok(hex::encode(signature))
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| ShipmentError::signing(format!("HMAC key error: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn canonical_host(url: &url::Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| ShipmentError::signing("Missing host in URL"))?;
    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

// Each path segment is URI-encoded twice, as non-S3 services expect
fn canonical_uri(url: &url::Url) -> String {
    let path = url.path();
    if path.is_empty() {
        return "/".to_string();
    }
    path.split('/')
        .map(|segment| {
            let raw = urlencoding::decode(segment)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| segment.to_string());
            uri_encode(&uri_encode(&raw))
        })
        .collect::<Vec<_>>()
        .join("/")
}

// Query parameters sorted by key then value
fn canonical_query(url: &url::Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (uri_encode(&k), uri_encode(&v)))
        .collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

fn uri_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
