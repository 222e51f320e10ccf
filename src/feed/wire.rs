//! Wire formats of the pricing API and their conversion into chart data.

use std::str::FromStr;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::{CurrencyPair, DataSeries, Period, decimal_to_f64, unix_seconds_to_local_date};
use crate::feed::{FeedError, FeedResult};

/// Numeric field the API sends either as a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericText {
    Text(String),
    Number(serde_json::Number),
}

impl NumericText {
    fn raw(&self) -> String {
        match self {
            Self::Text(text) => text.trim().to_owned(),
            Self::Number(number) => number.to_string(),
        }
    }

    pub fn to_decimal(&self, field_name: &str) -> FeedResult<Decimal> {
        let raw = self.raw();
        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|err| FeedError::Parse(format!("invalid {field_name} `{raw}`: {err}")))
    }

    pub fn to_f64(&self, field_name: &str) -> FeedResult<f64> {
        let decimal = self.to_decimal(field_name)?;
        Ok(decimal_to_f64(decimal, field_name)?)
    }

    pub fn to_unix_seconds(&self, field_name: &str) -> FeedResult<i64> {
        match self {
            Self::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|value| value.trunc() as i64))
                .ok_or_else(|| FeedError::Parse(format!("invalid {field_name} `{number}`"))),
            Self::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|err| FeedError::Parse(format!("invalid {field_name} `{text}`: {err}"))),
        }
    }
}

/// One row of `/json/daily/{pair}/{days}`. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyQuoteWire {
    pub bid: NumericText,
    pub timestamp: NumericText,
}

/// One entry of the `/last/{pair}` object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LiveQuoteWire {
    pub bid: NumericText,
}

#[must_use]
pub fn daily_quotes_url(base_url: &str, pair: &CurrencyPair, period: Period) -> String {
    format!(
        "{}/json/daily/{}/{}",
        base_url.trim_end_matches('/'),
        pair.api_path(),
        period.days()
    )
}

#[must_use]
pub fn live_quote_url(base_url: &str, pair: &CurrencyPair) -> String {
    format!("{}/last/{}", base_url.trim_end_matches('/'), pair.api_path())
}

#[must_use]
pub fn currency_list_url(base_url: &str) -> String {
    format!("{}/json/available/uniq", base_url.trim_end_matches('/'))
}

/// Decodes a daily quotes body into a chronological series.
///
/// The API lists the newest quote first; the series is built oldest first.
pub fn parse_daily_series(body: &str) -> FeedResult<DataSeries> {
    let quotes: Vec<DailyQuoteWire> = serde_json::from_str(body)?;
    daily_series_from_quotes(quotes)
}

pub fn daily_series_from_quotes(quotes: Vec<DailyQuoteWire>) -> FeedResult<DataSeries> {
    if quotes.is_empty() {
        return Err(FeedError::EmptyData);
    }

    let mut values = Vec::with_capacity(quotes.len());
    let mut dates = Vec::with_capacity(quotes.len());
    for quote in quotes.iter().rev() {
        values.push(quote.bid.to_f64("bid")?);
        dates.push(unix_seconds_to_local_date(
            quote.timestamp.to_unix_seconds("timestamp")?,
        )?);
    }

    Ok(DataSeries::new(values, dates)?)
}

/// Extracts the bid for `pair` from a `/last/{pair}` body.
pub fn parse_live_rate(body: &str, pair: &CurrencyPair) -> FeedResult<f64> {
    let quotes: IndexMap<String, LiveQuoteWire> = serde_json::from_str(body)?;
    let key = pair.quote_key();
    let quote = quotes
        .get(&key)
        .ok_or_else(|| FeedError::Parse(format!("response has no `{key}` quote")))?;
    quote.bid.to_f64("bid")
}

/// Currency codes (the object keys) in alphabetical order.
pub fn parse_currency_codes(body: &str) -> FeedResult<Vec<String>> {
    let entries: IndexMap<String, serde_json::Value> = serde_json::from_str(body)?;
    if entries.is_empty() {
        return Err(FeedError::EmptyData);
    }
    let mut codes: Vec<String> = entries.into_keys().collect();
    codes.sort();
    Ok(codes)
}

/// Panel label text, e.g. `1 USD = 5.123 BRL`.
#[must_use]
pub fn format_live_rate(pair: &CurrencyPair, rate: f64) -> String {
    format!("1 {} = {rate:.3} {}", pair.base(), pair.target())
}
