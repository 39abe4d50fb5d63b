//! Connectivity checker
//!
//! Posts a `{"target": "<host>:<port>"}` document to a willitconnect service
//! and decodes its verdict.

use crate::{
    config::HttpConfig,
    error::{Result, WicError},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

/// Path of the check endpoint on the willitconnect route
pub const CHECK_PATH: &str = "/v2/willitconnect";

/// Host prefix of the willitconnect route on an organization domain
pub const CHECK_ROUTE: &str = "willitconnect.";

/// Build the check endpoint URL for an organization domain
#[must_use]
pub fn check_url(base_domain: &str) -> String {
    format!("https://{CHECK_ROUTE}{base_domain}{CHECK_PATH}")
}

/// Body of a check request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRequest {
    /// `<host>:<port>`, passed through as given
    pub target: String,
}

impl CheckRequest {
    #[must_use]
    pub fn new(host: &str, port: &str) -> Self {
        Self {
            target: format!("{host}:{port}"),
        }
    }
}

/// Reply of the willitconnect service.
///
/// Only `can_connect` drives the verdict. Absent fields decode to their
/// zero value, unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckResponse {
    pub last_checked: i64,
    pub entry: String,
    pub can_connect: bool,
    pub http_status: i64,
    pub valid_hostname: bool,
    pub valid_url: bool,
}

/// Outcome of a successful check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Reachable,
    Unreachable,
}

impl From<&CheckResponse> for Verdict {
    fn from(response: &CheckResponse) -> Self {
        if response.can_connect {
            Self::Reachable
        } else {
            Self::Unreachable
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reachable => f.write_str("I am able to connect"),
            Self::Unreachable => f.write_str("I am unable to connect"),
        }
    }
}

/// Something that can run a connectivity check against a willitconnect URL
pub trait ConnectivityCheck {
    fn check(&self, url: &str, request: &CheckRequest) -> Result<CheckResponse>;
}

/// Blocking HTTP implementation of [`ConnectivityCheck`]
#[derive(Debug, Clone)]
pub struct HttpChecker {
    client: reqwest::blocking::Client,
}

impl HttpChecker {
    /// Build the HTTP client from configuration
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str());

        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| WicError::config_with_source("failed to build HTTP client", e))?;

        Ok(Self { client })
    }
}

impl ConnectivityCheck for HttpChecker {
    #[instrument(skip(self))]
    fn check(&self, url: &str, request: &CheckRequest) -> Result<CheckResponse> {
        debug!("Posting check for {} to {}", request.target, url);

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .map_err(|e| WicError::unreachable(url, e))?;

        // Non-2xx replies still carry a body worth decoding.
        let status = response.status();
        debug!("willitconnect answered with status {}", status);

        let body = response.bytes().map_err(WicError::invalid_response)?;
        let decoded = decode_response(&body)?;

        if let Some(checked_at) = DateTime::<Utc>::from_timestamp_millis(decoded.last_checked) {
            debug!(
                entry = %decoded.entry,
                http_status = decoded.http_status,
                valid_hostname = decoded.valid_hostname,
                valid_url = decoded.valid_url,
                "Target last checked at {}",
                checked_at.to_rfc3339()
            );
        }

        Ok(decoded)
    }
}

/// Decode the first JSON value of a response body; trailing bytes are ignored
pub fn decode_response(body: &[u8]) -> Result<CheckResponse> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    CheckResponse::deserialize(&mut deserializer).map_err(WicError::invalid_response)
}
