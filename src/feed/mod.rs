//! Rate data sources: the pricing API client, its wire formats and the
//! small stateful helpers built on top of it.

pub mod catalog;
#[cfg(feature = "http-client")]
pub mod client;
pub mod error;
pub mod ticker;
pub mod wire;

pub use catalog::{CurrencyCatalog, FALLBACK_CURRENCIES};
#[cfg(feature = "http-client")]
pub use client::HttpRateClient;
pub use error::{FeedError, FeedResult};
pub use ticker::{LIVE_RATE_ERROR_LABEL, LIVE_RATE_LOADING_LABEL, RateTicker, TickerTicket};
pub use wire::{
    format_live_rate, parse_currency_codes, parse_daily_series, parse_live_rate,
};

use crate::core::{CurrencyPair, DataSeries, Period};

/// Source of daily historical quotes.
///
/// Implementations block; callers that own a UI run them on a worker thread.
pub trait DataFetcher {
    fn fetch_daily(&self, pair: &CurrencyPair, period: Period) -> FeedResult<DataSeries>;
}

/// Source of the latest bid for a pair.
pub trait LiveRateSource {
    fn fetch_live_rate(&self, pair: &CurrencyPair) -> FeedResult<f64>;
}

/// Source of selectable currency codes.
pub trait CurrencyListSource {
    fn fetch_currency_codes(&self) -> FeedResult<Vec<String>>;
}

impl<T: DataFetcher + ?Sized> DataFetcher for &T {
    fn fetch_daily(&self, pair: &CurrencyPair, period: Period) -> FeedResult<DataSeries> {
        (**self).fetch_daily(pair, period)
    }
}

impl<T: DataFetcher + ?Sized> DataFetcher for std::sync::Arc<T> {
    fn fetch_daily(&self, pair: &CurrencyPair, period: Period) -> FeedResult<DataSeries> {
        (**self).fetch_daily(pair, period)
    }
}

impl<T: LiveRateSource + ?Sized> LiveRateSource for std::sync::Arc<T> {
    fn fetch_live_rate(&self, pair: &CurrencyPair) -> FeedResult<f64> {
        (**self).fetch_live_rate(pair)
    }
}

impl<T: CurrencyListSource + ?Sized> CurrencyListSource for std::sync::Arc<T> {
    fn fetch_currency_codes(&self) -> FeedResult<Vec<String>> {
        (**self).fetch_currency_codes()
    }
}
