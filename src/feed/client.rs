//! Blocking HTTP client for the NeoWs feed endpoint.

use std::time::Duration;

use reqwest::blocking::Client;

use super::{api_error_message, parse_page, DateRange, FeedError, FeedSource, NeoRecord};

/// NeoWs feed endpoint.
pub const FEED_URL: &str = "https://api.nasa.gov/neo/rest/v1/feed";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Feed source backed by the public NeoWs REST API.
pub struct NeoWsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NeoWsClient {
    /// Build a client for the given API key. Empty keys are rejected up front.
    pub fn new(api_key: impl Into<String>) -> Result<Self, FeedError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(FeedError::MissingApiKey);
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: FEED_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint (mirrors, local fixtures).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request_url(&self, range: &DateRange) -> String {
        format!(
            "{}?start_date={}&end_date={}&api_key={}",
            self.base_url, range.start, range.end, self.api_key
        )
    }
}

impl FeedSource for NeoWsClient {
    fn fetch_range(&self, range: &DateRange) -> Result<Vec<NeoRecord>, FeedError> {
        let response = self.client.get(self.request_url(range)).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        parse_page(&body)
    }
}
