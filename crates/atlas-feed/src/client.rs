//! disease.sh HTTP client
//!
//! Single GET against the countries endpoint (free, no API key).

use crate::{CountrySource, FetchError, Result};
use atlas_core::CountryRecord;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-country snapshot, nulls disallowed so counts are filled where the feed can
pub const DEFAULT_ENDPOINT: &str = "https://disease.sh/v3/covid-19/countries?allowNull=false";

/// Feed configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Countries endpoint returning a JSON array
    pub endpoint: String,
    /// Request timeout in seconds, 0 disables it
    pub timeout_sec: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_sec: 30,
        }
    }
}

impl FeedConfig {
    /// `None` when `timeout_sec` is 0, meaning no timeout
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.timeout_sec > 0).then(|| Duration::from_secs(self.timeout_sec))
    }
}

/// Live disease.sh client
pub struct DiseaseShClient {
    config: FeedConfig,
    client: reqwest::Client,
}

impl DiseaseShClient {
    pub fn new(config: FeedConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    async fn fetch_records(&self) -> Result<Vec<CountryRecord>> {
        info!("Fetching country snapshot from {}", self.config.endpoint);

        let response = self
            .client
            .get(&self.config.endpoint)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        debug!("Received {} bytes", body.len());

        parse_records(&body)
    }
}

impl CountrySource for DiseaseShClient {
    fn fetch(&self) -> impl Future<Output = Result<Vec<CountryRecord>>> + Send {
        self.fetch_records()
    }
}

/// Parse a response body as an array of country records.
///
/// The body must be a JSON array. Elements that do not decode as a record
/// are skipped.
pub fn parse_records(body: &[u8]) -> Result<Vec<CountryRecord>> {
    let elements: Vec<serde_json::Value> =
        serde_json::from_slice(body).map_err(|e| FetchError::Parse(e.to_string()))?;
    let total = elements.len();

    let records: Vec<CountryRecord> = elements
        .into_iter()
        .filter_map(|element| match serde_json::from_value(element) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("Skipping malformed record: {}", e);
                None
            }
        })
        .collect();

    if records.len() < total {
        warn!("Skipped {} of {} malformed records", total - records.len(), total);
    }
    Ok(records)
}
