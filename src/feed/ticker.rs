use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::core::CurrencyPair;
use crate::feed::wire::format_live_rate;
use crate::feed::{FeedResult, LiveRateSource};

pub const LIVE_RATE_LOADING_LABEL: &str = "Loading...";
pub const LIVE_RATE_ERROR_LABEL: &str = "Error fetching rate";

/// Outstanding live-rate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerTicket {
    generation: u64,
    pair: CurrencyPair,
}

impl TickerTicket {
    #[must_use]
    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    pub fn fetch_with<S>(&self, source: &S) -> FeedResult<f64>
    where
        S: LiveRateSource + ?Sized,
    {
        source.fetch_live_rate(&self.pair)
    }
}

/// Periodically refreshed "1 BASE = x TARGET" label.
///
/// The ticker owns no timer. The host asks `is_refresh_due` from its own
/// clock (a GLib timeout, a CLI loop) and feeds results back in.
#[derive(Debug, Clone)]
pub struct RateTicker {
    pair: CurrencyPair,
    refresh_interval: Duration,
    last_refresh: Option<Instant>,
    label: String,
    generation: u64,
}

impl RateTicker {
    #[must_use]
    pub fn new(pair: CurrencyPair, refresh_interval: Duration) -> Self {
        Self {
            pair,
            refresh_interval,
            last_refresh: None,
            label: LIVE_RATE_LOADING_LABEL.to_owned(),
            generation: 0,
        }
    }

    #[must_use]
    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    #[must_use]
    pub fn is_refresh_due(&self, now: Instant) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.refresh_interval,
        }
    }

    /// Switches pair. Returns `true` when it changed; the next check is then
    /// due immediately and older requests are ignored.
    pub fn set_pair(&mut self, pair: CurrencyPair) -> bool {
        if pair == self.pair {
            return false;
        }
        self.pair = pair;
        self.last_refresh = None;
        self.generation += 1;
        self.label = LIVE_RATE_LOADING_LABEL.to_owned();
        true
    }

    pub fn begin_refresh(&mut self, now: Instant) -> TickerTicket {
        self.generation += 1;
        self.last_refresh = Some(now);
        TickerTicket {
            generation: self.generation,
            pair: self.pair.clone(),
        }
    }

    /// Applies a result. Returns `false` for a superseded ticket.
    pub fn complete_refresh(&mut self, ticket: &TickerTicket, result: FeedResult<f64>) -> bool {
        if ticket.generation != self.generation {
            debug!(ticket = ticket.generation, current = self.generation, "dropping stale live rate");
            return false;
        }
        match result {
            Ok(rate) => self.label = format_live_rate(&self.pair, rate),
            Err(err) => {
                warn!(error = %err, pair = %self.pair, "live rate fetch failed");
                self.label = LIVE_RATE_ERROR_LABEL.to_owned();
            }
        }
        true
    }

    /// Synchronous refresh, for callers that already run off the UI thread.
    pub fn refresh_with<S>(&mut self, source: &S, now: Instant) -> &str
    where
        S: LiveRateSource + ?Sized,
    {
        let ticket = self.begin_refresh(now);
        let result = ticket.fetch_with(source);
        self.complete_refresh(&ticket, result);
        &self.label
    }
}
