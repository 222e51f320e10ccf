use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// History window offered by the daily quotes endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Period {
    Week,
    #[default]
    Month,
    TwoMonths,
}

impl Period {
    /// Selector order used by toolbars and dropdowns.
    pub const ALL: [Self; 3] = [Self::Week, Self::Month, Self::TwoMonths];

    #[must_use]
    pub const fn days(self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::TwoMonths => 60,
        }
    }

    pub fn from_days(days: u32) -> ChartResult<Self> {
        Self::ALL
            .into_iter()
            .find(|period| period.days() == days)
            .ok_or_else(|| {
                ChartError::InvalidData(format!("unsupported period: {days} days (use 7, 30 or 60)"))
            })
    }

    #[must_use]
    pub fn label(self) -> String {
        format!("{} days", self.days())
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Week => 0,
            Self::Month => 1,
            Self::TwoMonths => 2,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.days())
    }
}

/// Accepts both the bare day count (`"30"`) and the selector label (`"30 days"`).
impl FromStr for Period {
    type Err = ChartError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let leading = raw.split_whitespace().next().unwrap_or_default();
        let days = leading
            .parse::<u32>()
            .map_err(|_| ChartError::InvalidData(format!("invalid period `{raw}`")))?;
        Self::from_days(days)
    }
}

/// Base/target currency codes, normalized to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    base: String,
    target: String,
}

impl CurrencyPair {
    pub fn new(base: impl AsRef<str>, target: impl AsRef<str>) -> ChartResult<Self> {
        Ok(Self {
            base: normalize_code(base.as_ref(), "base")?,
            target: normalize_code(target.as_ref(), "target")?,
        })
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Path segment used by the pricing API, e.g. `USD-BRL`.
    #[must_use]
    pub fn api_path(&self) -> String {
        format!("{}-{}", self.base, self.target)
    }

    /// Key of the live quote object, e.g. `USDBRL`.
    #[must_use]
    pub fn quote_key(&self) -> String {
        format!("{}{}", self.base, self.target)
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.target)
    }
}

fn normalize_code(raw: &str, role: &str) -> ChartResult<String> {
    let code = raw.trim();
    if code.is_empty() {
        return Err(ChartError::InvalidData(format!(
            "{role} currency code must not be empty"
        )));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ChartError::InvalidData(format!(
            "{role} currency code `{code}` must be ASCII alphanumeric"
        )));
    }
    Ok(code.to_ascii_uppercase())
}

/// Chronological (oldest first) daily rates with one date label per value.
///
/// A series is replaced wholesale on every successful fetch and never edited
/// in place, so the constructor is the only place the invariants are checked.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DataSeries {
    values: Vec<f64>,
    dates: Vec<String>,
}

impl DataSeries {
    pub fn new(values: Vec<f64>, dates: Vec<String>) -> ChartResult<Self> {
        if values.len() != dates.len() {
            return Err(ChartError::InvalidData(format!(
                "series has {} values but {} dates",
                values.len(),
                dates.len()
            )));
        }
        if let Some(index) = values
            .iter()
            .position(|value| !value.is_finite() || *value < 0.0)
        {
            return Err(ChartError::InvalidData(format!(
                "rate at index {index} must be finite and >= 0"
            )));
        }
        Ok(Self { values, dates })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<(&str, f64)> {
        let value = *self.values.get(index)?;
        let date = self.dates.get(index)?;
        Some((date.as_str(), value))
    }

    #[must_use]
    pub fn first_value(&self) -> Option<f64> {
        self.values.first().copied()
    }

    #[must_use]
    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Change from the first to the last rate, in percent.
    ///
    /// `None` for an empty series or when the first rate is zero.
    #[must_use]
    pub fn percent_change(&self) -> Option<f64> {
        let first = self.first_value()?;
        let last = self.last_value()?;
        if first == 0.0 {
            return None;
        }
        let change = (last - first) / first * 100.0;
        change.is_finite().then_some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::{CurrencyPair, DataSeries, Period};

    fn dates(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("2024-01-{:02}", i + 1)).collect()
    }

    #[test]
    fn series_rejects_mismatched_lengths() {
        let err = DataSeries::new(vec![1.0, 2.0], dates(3)).expect_err("length mismatch");
        assert!(err.to_string().contains("2 values but 3 dates"));
    }

    #[test]
    fn series_rejects_negative_and_non_finite_rates() {
        assert!(DataSeries::new(vec![1.0, -0.5], dates(2)).is_err());
        assert!(DataSeries::new(vec![f64::NAN], dates(1)).is_err());
    }

    #[test]
    fn percent_change_handles_zero_first_rate() {
        let series = DataSeries::new(vec![0.0, 1.0], dates(2)).expect("series");
        assert_eq!(series.percent_change(), None);
        assert_eq!(DataSeries::empty().percent_change(), None);
    }

    #[test]
    fn period_parses_selector_labels() {
        assert_eq!("7 days".parse::<Period>().expect("7"), Period::Week);
        assert_eq!("60".parse::<Period>().expect("60"), Period::TwoMonths);
        assert!("14 days".parse::<Period>().is_err());
        assert_eq!(Period::default().to_string(), "30 days");
        assert_eq!(Period::from_index(Period::Month.index()), Some(Period::Month));
    }

    #[test]
    fn currency_pair_normalizes_codes() {
        let pair = CurrencyPair::new(" usd", "brl ").expect("pair");
        assert_eq!(pair.api_path(), "USD-BRL");
        assert_eq!(pair.quote_key(), "USDBRL");
        assert_eq!(pair.to_string(), "USD/BRL");
        assert!(CurrencyPair::new("", "BRL").is_err());
        assert!(CurrencyPair::new("US/D", "BRL").is_err());
    }
}
