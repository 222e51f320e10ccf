use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::{debug, trace};

use crate::api::ViewerConfig;
use crate::core::{CurrencyPair, DataSeries, Period};
use crate::feed::wire::{
    currency_list_url, daily_quotes_url, live_quote_url, parse_currency_codes,
    parse_daily_series, parse_live_rate,
};
use crate::feed::{CurrencyListSource, DataFetcher, FeedError, FeedResult, LiveRateSource};

/// Blocking client for the pricing API.
///
/// Owned by whoever builds it and shared by reference (or `Arc`) with the
/// chart, the ticker and the currency catalog; dropping it closes its pooled
/// connections. Calls block, so UI code runs them on a worker thread.
#[derive(Debug, Clone)]
pub struct HttpRateClient {
    client: Client,
    base_url: String,
}

impl HttpRateClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> FeedResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| FeedError::Network(format!("http client setup failed: {err}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    pub fn from_config(config: &ViewerConfig) -> FeedResult<Self> {
        Self::new(config.api_base_url.clone(), config.request_timeout())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_text(&self, url: &str) -> FeedResult<String> {
        trace!(%url, "GET");
        let response = self.client.get(url).send()?;
        let status = response.status();
        if status != StatusCode::OK {
            debug!(%url, status = status.as_u16(), "unexpected http status");
            return Err(FeedError::HttpStatus(status.as_u16()));
        }
        Ok(response.text()?)
    }
}

impl DataFetcher for HttpRateClient {
    fn fetch_daily(&self, pair: &CurrencyPair, period: Period) -> FeedResult<DataSeries> {
        let body = self.get_text(&daily_quotes_url(&self.base_url, pair, period))?;
        parse_daily_series(&body)
    }
}

impl LiveRateSource for HttpRateClient {
    fn fetch_live_rate(&self, pair: &CurrencyPair) -> FeedResult<f64> {
        let body = self.get_text(&live_quote_url(&self.base_url, pair))?;
        parse_live_rate(&body, pair)
    }
}

impl CurrencyListSource for HttpRateClient {
    fn fetch_currency_codes(&self) -> FeedResult<Vec<String>> {
        let body = self.get_text(&currency_list_url(&self.base_url))?;
        parse_currency_codes(&body)
    }
}
