//! Quote Fetcher: one bounded GET to the external pricing API.
//!
//! The fetcher derives its own deadline from the inbound request deadline,
//! issues a single request (no retries), and decodes the body strictly into a
//! [`QuoteEnvelope`]. The HTTP status is not inspected: an error page simply
//! fails to decode.
use std::time::Duration;

use log::debug;
use quote_common::deadline::FETCH_BUDGET;
use quote_common::net::PRICING_API_URL;
use quote_common::{Deadline, Quote, QuoteEnvelope, QuoteError, Result, Stage};
use reqwest::Client;

/// Client for the external pricing API.
#[derive(Debug, Clone)]
pub struct QuoteFetcher {
    http: Client,
    url: String,
    budget: Duration,
}

impl QuoteFetcher {
    /// Fetcher for `url` with a per-call `budget`.
    pub fn new(url: impl Into<String>, budget: Duration) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(QuoteError::transport)?;
        Ok(Self {
            http,
            url: url.into(),
            budget,
        })
    }

    /// Fetcher for the public pricing API with the standard 200ms budget.
    pub fn pricing_api() -> Result<Self> {
        Self::new(PRICING_API_URL, FETCH_BUDGET)
    }

    /// Fetches the current quote, abandoning the call when `parent` or the
    /// fetch budget expires.
    pub async fn fetch(&self, parent: Deadline) -> Result<Quote> {
        let deadline = parent.child(self.budget);
        deadline
            .run(Stage::Fetch, async {
                let response = self
                    .http
                    .get(&self.url)
                    .send()
                    .await
                    .map_err(QuoteError::transport)?;
                debug!("Pricing API answered {}", response.status());
                let body = response.bytes().await.map_err(QuoteError::transport)?;
                let envelope = QuoteEnvelope::from_json_bytes(&body)?;
                Ok(envelope.usd_brl)
            })
            .await
    }
}
