use std::cell::Cell;

use chrono::NaiveDate;
use rate_chart::api::{ChartController, LOADING_MESSAGE, RenderStyle, ViewerConfig};
use rate_chart::core::{
    CurrencyPair, DataSeries, DisplayState, Period, PlotLayout, Viewport, ZoomAction,
};
use rate_chart::feed::{DataFetcher, FeedError, FeedResult};
use rate_chart::render::NullRenderer;

/// Serves a fixed series and records the requested period.
struct StubFetcher {
    values: Vec<f64>,
    last_days: Cell<u32>,
}

impl StubFetcher {
    fn new(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
            last_days: Cell::new(0),
        }
    }
}

impl DataFetcher for StubFetcher {
    fn fetch_daily(&self, _pair: &CurrencyPair, period: Period) -> FeedResult<DataSeries> {
        self.last_days.set(period.days());
        let dates = (0..self.values.len())
            .map(|i| format!("2024-01-{:02}", i + 1))
            .collect();
        Ok(DataSeries::new(self.values.clone(), dates)?)
    }
}

fn controller() -> ChartController<NullRenderer> {
    ChartController::new(
        NullRenderer::default(),
        CurrencyPair::new("USD", "BRL").expect("pair"),
        &ViewerConfig::default(),
        RenderStyle::default(),
    )
    .expect("controller")
}

fn updated_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 31)
        .and_then(|date| date.and_hms_opt(18, 0, 0))
        .expect("timestamp")
}

#[test]
fn refresh_then_complete_shows_series() {
    let fetcher = StubFetcher::new(&[5.0, 5.1, 5.2]);
    let mut controller = controller();

    let ticket = controller.refresh();
    assert_eq!(controller.view_state().display(), &DisplayState::Loading);
    assert_eq!(controller.status_text(), LOADING_MESSAGE);
    assert_eq!(ticket.period(), Period::Month);

    let result = ticket.fetch_with(&fetcher);
    assert_eq!(fetcher.last_days.get(), 30);
    assert!(controller.complete_fetch(&ticket, result));
    assert_eq!(controller.view_state().display(), &DisplayState::Ready);
    assert_eq!(controller.status_text(), "Showing 3 data points");
    assert_eq!(controller.series().len(), 3);

    controller
        .render(Viewport::new(700, 500), updated_at())
        .expect("render");
    let renderer = controller.into_renderer();
    assert_eq!(renderer.render_count, 1);
    let frame = renderer.last_frame.expect("frame");
    assert_eq!(frame.circles.len(), 3);
}

#[test]
fn stale_ticket_is_ignored() {
    let fetcher = StubFetcher::new(&[5.0, 5.1]);
    let mut controller = controller();

    let stale = controller.refresh();
    let current = controller.refresh();

    assert!(!controller.complete_fetch(&stale, stale.fetch_with(&fetcher)));
    assert_eq!(controller.view_state().display(), &DisplayState::Loading);
    assert!(controller.series().is_empty());

    assert!(controller.complete_fetch(&current, current.fetch_with(&fetcher)));
    assert_eq!(controller.series().len(), 2);
}

#[test]
fn slow_old_period_cannot_overwrite_new_period() {
    let mut controller = controller();
    let month = controller.refresh();
    let week = controller.set_period(Period::Week).expect("period changed");
    assert!(controller.set_period(Period::Week).is_none());

    let fetcher = StubFetcher::new(&[1.0, 1.1]);
    assert!(controller.complete_fetch(&week, week.fetch_with(&fetcher)));
    assert_eq!(fetcher.last_days.get(), 7);

    let slow = StubFetcher::new(&[9.0, 9.0, 9.0]);
    assert!(!controller.complete_fetch(&month, month.fetch_with(&slow)));
    assert_eq!(controller.series().values(), &[1.0, 1.1]);
    assert_eq!(controller.view_state().period(), Period::Week);
}

#[test]
fn pair_change_refetches_and_drops_old_pair_results() {
    let mut controller = controller();
    let usd = controller.refresh();
    let fetcher = StubFetcher::new(&[5.0, 5.1]);
    assert!(controller.complete_fetch(&usd, usd.fetch_with(&fetcher)));

    let eur_brl = CurrencyPair::new("EUR", "BRL").expect("pair");
    assert!(controller.set_pair(CurrencyPair::new("usd", "brl").expect("pair")).is_none());
    let eur = controller.set_pair(eur_brl.clone()).expect("pair changed");
    assert_eq!(eur.pair(), &eur_brl);
    assert_eq!(controller.pair(), &eur_brl);
    assert!(controller.series().is_empty());
    assert_eq!(controller.view_state().display(), &DisplayState::Loading);

    let latest = controller.refresh();
    assert!(!controller.complete_fetch(&eur, eur.fetch_with(&fetcher)));

    let fresh = StubFetcher::new(&[6.0, 6.1, 6.2]);
    assert!(controller.complete_fetch(&latest, latest.fetch_with(&fresh)));
    assert_eq!(controller.series().values(), &[6.0, 6.1, 6.2]);

    let frame = controller
        .build_frame(Viewport::new(700, 500), updated_at())
        .expect("frame");
    assert!(frame.find_text("Exchange Rate: EUR/BRL - 30 days").is_some());
}

#[test]
fn cancel_discards_in_flight_fetch() {
    let fetcher = StubFetcher::new(&[5.0]);
    let mut controller = controller();
    let ticket = controller.refresh();

    controller.cancel_pending();
    assert!(!controller.complete_fetch(&ticket, ticket.fetch_with(&fetcher)));
    assert!(controller.series().is_empty());
    assert_ne!(controller.view_state().display(), &DisplayState::Loading);
}

#[test]
fn fetch_error_becomes_display_error() {
    let mut controller = controller();
    let ticket = controller.refresh();

    assert!(controller.complete_fetch(&ticket, Err(FeedError::HttpStatus(500))));
    assert_eq!(
        controller.view_state().display(),
        &DisplayState::Error("HTTP error: 500".to_owned())
    );
    assert_eq!(controller.status_text(), "Error: HTTP error: 500");

    let frame = controller
        .build_frame(Viewport::new(700, 500), updated_at())
        .expect("frame");
    assert!(frame.find_text("Error: HTTP error: 500").is_some());
}

#[test]
fn inspect_reports_nearest_point() {
    let fetcher = StubFetcher::new(&[5.0, 5.1, 5.2]);
    let mut controller = controller();
    let viewport = Viewport::new(700, 500);
    let layout = PlotLayout::for_viewport(viewport);

    let ticket = controller.refresh();
    let y = layout.plot_top() + 20.0;
    assert!(controller.inspect_at(layout.plot_right(), y, viewport).is_none());

    controller.complete_fetch(&ticket, ticket.fetch_with(&fetcher));
    let x = layout.index_to_x(1, 3) + 3.0;
    assert_eq!(
        controller.inspect_at(x, y, viewport),
        Some("2024-01-02: 5.1000 USD/BRL")
    );
    assert_eq!(controller.status_text(), "2024-01-02: 5.1000 USD/BRL");

    assert!(controller.inspect_at(layout.plot_left() - 5.0, y, viewport).is_none());
    assert_eq!(controller.status_text(), "2024-01-02: 5.1000 USD/BRL");
}

#[test]
fn zoom_actions_update_legend() {
    let fetcher = StubFetcher::new(&[5.0, 5.1, 5.2]);
    let mut controller = controller();
    let ticket = controller.refresh();
    controller.complete_fetch(&ticket, ticket.fetch_with(&fetcher));

    controller.apply_zoom(ZoomAction::In);
    let zoom = controller.apply_zoom(ZoomAction::In);
    assert!((zoom - 1.44).abs() < 1e-12);
    let frame = controller
        .build_frame(Viewport::new(700, 500), updated_at())
        .expect("frame");
    assert!(frame.find_text("Zoom: 1.4x").is_some());

    for _ in 0..10 {
        controller.apply_zoom(ZoomAction::Out);
    }
    assert_eq!(controller.view_state().zoom_level(), 0.5);
    assert_eq!(controller.apply_zoom(ZoomAction::Reset), 1.0);
}
