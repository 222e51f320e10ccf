use chrono::NaiveDateTime;
use tracing::{debug, trace, warn};

use crate::api::{ChartRenderer, ChartScene, RenderStyle, ViewerConfig};
use crate::core::{
    CurrencyPair, DataSeries, DisplayState, Period, ViewState, Viewport, ZoomAction,
};
use crate::error::ChartResult;
use crate::feed::{DataFetcher, FeedResult};
use crate::interaction::hit_test;
use crate::render::{RenderFrame, Renderer};

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

/// Handle for one outstanding fetch.
///
/// Carries everything a worker needs to run the request, plus the generation
/// the controller uses to recognise stale completions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pair: CurrencyPair,
    period: Period,
}

impl FetchTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    #[must_use]
    pub fn period(&self) -> Period {
        self.period
    }

    /// Runs the request this ticket describes. Safe to call off the UI thread.
    pub fn fetch_with<F>(&self, fetcher: &F) -> FeedResult<DataSeries>
    where
        F: DataFetcher + ?Sized,
    {
        fetcher.fetch_daily(&self.pair, self.period)
    }
}

/// Owns the series and view state of one chart and drives the renderer.
///
/// All mutation happens through this type on the UI thread. Fetch results
/// come back through `complete_fetch`, which drops anything but the newest
/// request so a slow response can never overwrite a newer one.
pub struct ChartController<R: Renderer> {
    renderer: R,
    chart_renderer: ChartRenderer,
    pair: CurrencyPair,
    series: DataSeries,
    view: ViewState,
    generation: u64,
    status: String,
}

impl<R: Renderer> ChartController<R> {
    pub fn new(
        renderer: R,
        pair: CurrencyPair,
        config: &ViewerConfig,
        style: RenderStyle,
    ) -> ChartResult<Self> {
        Ok(Self {
            renderer,
            chart_renderer: ChartRenderer::new(style)?,
            pair,
            series: DataSeries::empty(),
            view: ViewState::new(config.default_period, config.zoom)?,
            generation: 0,
            status: String::new(),
        })
    }

    #[must_use]
    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    #[must_use]
    pub fn series(&self) -> &DataSeries {
        &self.series
    }

    #[must_use]
    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Starts a fetch for the current pair and period.
    pub fn refresh(&mut self) -> FetchTicket {
        self.generation += 1;
        self.view.set_loading();
        self.status = "Loading data...".to_owned();
        debug!(
            pair = %self.pair,
            days = self.view.period().days(),
            generation = self.generation,
            "starting rate fetch"
        );
        FetchTicket {
            generation: self.generation,
            pair: self.pair.clone(),
            period: self.view.period(),
        }
    }

    /// Switches period; returns a fetch ticket only when the period changed.
    pub fn set_period(&mut self, period: Period) -> Option<FetchTicket> {
        if !self.view.set_period(period) {
            return None;
        }
        debug!(days = period.days(), "period changed");
        Some(self.refresh())
    }

    /// Switches to another currency pair; returns a fetch ticket only when the
    /// pair changed. The previous pair's series is dropped right away.
    pub fn set_pair(&mut self, pair: CurrencyPair) -> Option<FetchTicket> {
        if pair == self.pair {
            return None;
        }
        debug!(from = %self.pair, to = %pair, "pair changed");
        self.pair = pair;
        self.series = DataSeries::empty();
        Some(self.refresh())
    }

    /// Applies a fetch result. Returns `false` when the ticket is stale.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: FeedResult<DataSeries>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping stale fetch result"
            );
            return false;
        }

        match result {
            Ok(series) => {
                self.status = format!("Showing {} data points", series.len());
                debug!(points = series.len(), pair = %self.pair, "rate fetch finished");
                self.series = series;
                self.view.set_ready();
            }
            Err(err) => {
                warn!(error = %err, pair = %self.pair, "rate fetch failed");
                let message = err.to_string();
                self.status = format!("Error: {message}");
                self.view.set_error(message);
            }
        }
        true
    }

    /// Invalidates any in-flight fetch, e.g. when the window closes.
    pub fn cancel_pending(&mut self) {
        self.generation += 1;
        if matches!(self.view.display(), DisplayState::Loading) {
            self.view.set_ready();
        }
        debug!(generation = self.generation, "cancelled pending fetches");
    }

    pub fn apply_zoom(&mut self, action: ZoomAction) -> f64 {
        let zoom_level = self.view.apply_zoom(action);
        trace!(?action, zoom_level, "zoom changed");
        zoom_level
    }

    /// Resolves a click to a data point and updates the status text.
    ///
    /// Only answers while a series is being displayed.
    pub fn inspect_at(&mut self, x: f64, y: f64, viewport: Viewport) -> Option<&str> {
        if !matches!(self.view.display(), DisplayState::Ready) {
            return None;
        }
        let index = hit_test(x, y, viewport, self.series.len())?;
        let (date, value) = self.series.get(index)?;
        self.status = format!(
            "{date}: {value:.4} {}/{}",
            self.pair.base(),
            self.pair.target()
        );
        Some(&self.status)
    }

    pub fn build_frame(
        &self,
        viewport: Viewport,
        updated_at: NaiveDateTime,
    ) -> ChartResult<RenderFrame> {
        let scene = ChartScene {
            pair: &self.pair,
            series: &self.series,
            view: &self.view,
            updated_at,
        };
        self.chart_renderer.render(&scene, viewport)
    }

    pub fn render(&mut self, viewport: Viewport, updated_at: NaiveDateTime) -> ChartResult<()> {
        let frame = self.build_frame(viewport, updated_at)?;
        self.renderer.render(&frame)
    }

    /// Renders into an external cairo context, as GTK draw callbacks do.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(
        &mut self,
        context: &cairo::Context,
        viewport: Viewport,
        updated_at: NaiveDateTime,
    ) -> ChartResult<()>
    where
        R: CairoContextRenderer,
    {
        let frame = self.build_frame(viewport, updated_at)?;
        self.renderer.render_on_cairo_context(context, &frame)
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
