//! exchangerate.host data source
//!
//! One GET against `/timeframe` per query. The provider is not asked for a
//! `source` currency, so values come back versus its default pivot (USD) and
//! base conversion happens locally.

use super::RateSource;
use crate::data::fx::{FxQuery, RawPayload};
use crate::error::{FxError, Result};
use reqwest::Client;
use std::time::Duration;

pub const EXCHANGERATE_HOST_BASE_URL: &str = "https://api.exchangerate.host";
pub const TIMEFRAME_ENDPOINT: &str = "/timeframe";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// exchangerate.host timeframe source
pub struct ExchangeRateHostSource {
    access_key: String,
    base_url: String,
    client: Client,
    /// Pause before each request, to stay within quota
    throttle: Duration,
}

impl ExchangeRateHostSource {
    /// Create a source against the public endpoint
    pub fn new(access_key: String) -> Result<Self> {
        Self::with_base_url(access_key, EXCHANGERATE_HOST_BASE_URL.to_string())
    }

    /// Create a source against a different host (mirrors, test servers)
    pub fn with_base_url(access_key: String, base_url: String) -> Result<Self> {
        if access_key.trim().is_empty() {
            return Err(FxError::MissingCredentials(
                "exchangerate.host requires an access key".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FxError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            access_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            throttle: Duration::ZERO,
        })
    }

    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, TIMEFRAME_ENDPOINT)
    }

    /// Query string parameters for a timeframe request
    pub fn request_params(&self, query: &FxQuery) -> Vec<(&'static str, String)> {
        let currencies = query
            .requested_currencies()
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(",");

        vec![
            ("access_key", self.access_key.clone()),
            ("start_date", query.start.format("%Y-%m-%d").to_string()),
            ("end_date", query.end.format("%Y-%m-%d").to_string()),
            ("currencies", currencies),
            ("format", "1".to_string()),
        ]
    }
}

impl RateSource for ExchangeRateHostSource {
    async fn fetch_timeframe(&self, query: &FxQuery) -> Result<RawPayload> {
        query.validate()?;

        if !self.throttle.is_zero() {
            tokio::time::sleep(self.throttle).await;
        }

        log::info!(
            "GET {} for {} .. {} ({} currencies)",
            self.url(),
            query.start,
            query.end,
            query.requested_currencies().len()
        );

        let response = self
            .client
            .get(self.url())
            .query(&self.request_params(query))
            .send()
            .await
            .map_err(|e| FxError::HttpError(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FxError::HttpError(format!(
                "exchangerate.host returned error: {}",
                status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FxError::HttpError(format!("Failed to read response body: {}", e)))?;

        let payload = RawPayload::from_slice(&body)?;
        log::debug!("Received {} date blocks", payload.len());
        Ok(payload)
    }

    fn endpoint(&self) -> &str {
        TIMEFRAME_ENDPOINT
    }
}
