//! GTK4 glue: a `DrawingArea` bound to a `ChartController`, a label bound
//! to a `RateTicker` and two dropdowns picking the currency pair.
//!
//! Network calls run through `gio::spawn_blocking` and complete on the GTK
//! main context; everything else happens on the UI thread.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use gtk4 as gtk;
use gtk4::prelude::*;
use gtk4::{gio, glib};
use tracing::{debug, warn};

use crate::api::{ChartController, FetchTicket, Theme};
use crate::core::{CurrencyPair, Period, Viewport, ZoomAction};
use crate::feed::{
    CurrencyCatalog, CurrencyListSource, DataFetcher, FeedError, FeedResult, LiveRateSource,
    RateTicker,
};
use crate::render::{CairoContextRenderer, Renderer};

pub type SharedFetcher = Arc<dyn DataFetcher + Send + Sync>;
pub type SharedLiveRateSource = Arc<dyn LiveRateSource + Send + Sync>;
pub type SharedCurrencyListSource = Arc<dyn CurrencyListSource + Send + Sync>;

/// Palette matching the current GTK theme.
#[must_use]
pub fn desktop_theme() -> Theme {
    let Some(settings) = gtk::Settings::default() else {
        return Theme::Light;
    };
    if settings.is_gtk_application_prefer_dark_theme() {
        return Theme::Dark;
    }
    let theme_name = settings.gtk_theme_name();
    Theme::from_theme_name(theme_name.as_deref())
}

async fn join_worker<T, P>(handle: impl Future<Output = Result<FeedResult<T>, P>>) -> FeedResult<T> {
    match handle.await {
        Ok(result) => result,
        Err(_) => Err(FeedError::Network("fetch worker panicked".to_owned())),
    }
}

pub struct GtkChartAdapter<R: Renderer> {
    drawing_area: gtk::DrawingArea,
    status_label: gtk::Label,
    controller: Rc<RefCell<ChartController<R>>>,
    fetcher: SharedFetcher,
}

impl<R> GtkChartAdapter<R>
where
    R: Renderer + CairoContextRenderer + 'static,
{
    #[must_use]
    pub fn new(controller: ChartController<R>, fetcher: SharedFetcher) -> Self {
        let drawing_area = gtk::DrawingArea::new();
        drawing_area.set_hexpand(true);
        drawing_area.set_vexpand(true);

        let status_label = gtk::Label::new(Some(controller.status_text()));
        status_label.set_xalign(0.0);

        let controller = Rc::new(RefCell::new(controller));
        let draw_controller = Rc::clone(&controller);
        drawing_area.set_draw_func(move |_, context, width, height| {
            let viewport = Viewport::from_signed(width, height);
            if !viewport.is_valid() {
                return;
            }
            let result = draw_controller.borrow_mut().render_on_cairo_context(
                context,
                viewport,
                Local::now().naive_local(),
            );
            if let Err(err) = result {
                warn!(error = %err, "chart draw failed");
            }
        });

        Self {
            drawing_area,
            status_label,
            controller,
            fetcher,
        }
    }

    #[must_use]
    pub fn drawing_area(&self) -> &gtk::DrawingArea {
        &self.drawing_area
    }

    #[must_use]
    pub fn status_label(&self) -> &gtk::Label {
        &self.status_label
    }

    #[must_use]
    pub fn controller(&self) -> Rc<RefCell<ChartController<R>>> {
        Rc::clone(&self.controller)
    }

    /// Mutates the controller, then syncs the status label and schedules a
    /// redraw.
    pub fn update_controller<T>(&self, update: impl FnOnce(&mut ChartController<R>) -> T) -> T {
        let output = {
            let mut controller = self.controller.borrow_mut();
            let output = update(&mut controller);
            self.status_label.set_text(controller.status_text());
            output
        };
        self.drawing_area.queue_draw();
        output
    }

    fn viewport(&self) -> Viewport {
        Viewport::from_signed(self.drawing_area.width(), self.drawing_area.height())
    }

    pub fn request_refresh(self: &Rc<Self>) {
        let ticket = self.update_controller(ChartController::refresh);
        self.spawn_fetch(ticket);
    }

    pub fn set_period(self: &Rc<Self>, period: Period) {
        if let Some(ticket) = self.update_controller(|controller| controller.set_period(period)) {
            self.spawn_fetch(ticket);
        }
    }

    pub fn set_pair(self: &Rc<Self>, pair: CurrencyPair) {
        if let Some(ticket) = self.update_controller(|controller| controller.set_pair(pair)) {
            self.spawn_fetch(ticket);
        }
    }

    pub fn apply_zoom(&self, action: ZoomAction) {
        self.update_controller(|controller| controller.apply_zoom(action));
    }

    pub fn cancel_pending(&self) {
        self.update_controller(ChartController::cancel_pending);
    }

    /// Wires pointer clicks to data point inspection.
    pub fn install_default_interaction(self: &Rc<Self>) {
        let click = gtk::GestureClick::new();
        let adapter = Rc::downgrade(self);
        click.connect_pressed(move |_, _, x, y| {
            let Some(adapter) = adapter.upgrade() else {
                return;
            };
            let viewport = adapter.viewport();
            let hit = adapter
                .controller
                .borrow_mut()
                .inspect_at(x, y, viewport)
                .is_some();
            if hit {
                let controller = adapter.controller.borrow();
                adapter.status_label.set_text(controller.status_text());
            }
        });
        self.drawing_area.add_controller(click);
    }

    fn spawn_fetch(self: &Rc<Self>, ticket: FetchTicket) {
        let fetcher = Arc::clone(&self.fetcher);
        let worker_ticket = ticket.clone();
        let handle = gio::spawn_blocking(move || worker_ticket.fetch_with(fetcher.as_ref()));

        let adapter = Rc::downgrade(self);
        glib::spawn_future_local(async move {
            let result = join_worker(handle).await;
            let Some(adapter) = adapter.upgrade() else {
                debug!(generation = ticket.generation(), "chart gone before fetch finished");
                return;
            };
            adapter.update_controller(|controller| controller.complete_fetch(&ticket, result));
        });
    }
}

/// Label showing `1 BASE = x TARGET`, refreshed on the ticker's interval.
pub struct GtkRateTicker {
    label: gtk::Label,
    ticker: RefCell<RateTicker>,
    source: SharedLiveRateSource,
    timer: RefCell<Option<glib::SourceId>>,
}

impl GtkRateTicker {
    #[must_use]
    pub fn new(ticker: RateTicker, source: SharedLiveRateSource) -> Rc<Self> {
        let label = gtk::Label::new(Some(ticker.label()));
        Rc::new(Self {
            label,
            ticker: RefCell::new(ticker),
            source,
            timer: RefCell::new(None),
        })
    }

    #[must_use]
    pub fn label(&self) -> &gtk::Label {
        &self.label
    }

    /// Polls once a second and fetches whenever the ticker says a refresh is
    /// due. The timer holds only a weak reference.
    pub fn start(self: &Rc<Self>) {
        self.stop();
        self.poll();
        let weak = Rc::downgrade(self);
        let source_id = glib::timeout_add_seconds_local(1, move || {
            let Some(ticker) = weak.upgrade() else {
                return glib::ControlFlow::Break;
            };
            ticker.poll();
            glib::ControlFlow::Continue
        });
        self.timer.replace(Some(source_id));
    }

    /// Follows a pair change; the new rate is fetched right away.
    pub fn set_pair(self: &Rc<Self>, pair: CurrencyPair) {
        {
            let mut ticker = self.ticker.borrow_mut();
            if !ticker.set_pair(pair) {
                return;
            }
            self.label.set_text(ticker.label());
        }
        self.poll();
    }

    pub fn stop(&self) {
        if let Some(source_id) = self.timer.take() {
            source_id.remove();
        }
    }

    fn poll(self: &Rc<Self>) {
        let now = Instant::now();
        let ticket = {
            let mut ticker = self.ticker.borrow_mut();
            if !ticker.is_refresh_due(now) {
                return;
            }
            ticker.begin_refresh(now)
        };

        let source = Arc::clone(&self.source);
        let worker_ticket = ticket.clone();
        let handle = gio::spawn_blocking(move || worker_ticket.fetch_with(source.as_ref()));

        let weak = Rc::downgrade(self);
        glib::spawn_future_local(async move {
            let result = join_worker(handle).await;
            let Some(this) = weak.upgrade() else {
                return;
            };
            let mut ticker = this.ticker.borrow_mut();
            if ticker.complete_refresh(&ticket, result) {
                this.label.set_text(ticker.label());
            }
        });
    }
}

/// Base and target dropdowns filled from the currency list.
///
/// Until the list arrives the dropdowns hold only the starting pair. Model
/// swaps do not count as user changes.
pub struct GtkPairSelector {
    base: gtk::DropDown,
    target: gtk::DropDown,
    catalog: RefCell<CurrencyCatalog>,
    updating: Cell<bool>,
}

impl GtkPairSelector {
    #[must_use]
    pub fn new(pair: &CurrencyPair) -> Rc<Self> {
        let selector = Rc::new(Self {
            base: gtk::DropDown::from_strings(&[]),
            target: gtk::DropDown::from_strings(&[]),
            catalog: RefCell::new(CurrencyCatalog::fallback()),
            updating: Cell::new(false),
        });
        selector.apply_catalog(CurrencyCatalog::from_codes([pair.base(), pair.target()]), pair);
        selector
    }

    #[must_use]
    pub fn base_dropdown(&self) -> &gtk::DropDown {
        &self.base
    }

    #[must_use]
    pub fn target_dropdown(&self) -> &gtk::DropDown {
        &self.target
    }

    /// Fetches the currency list off the UI thread, then preselects `pair`.
    pub fn load(self: &Rc<Self>, source: SharedCurrencyListSource, pair: CurrencyPair) {
        let handle = gio::spawn_blocking(move || CurrencyCatalog::load(source.as_ref()));
        let weak = Rc::downgrade(self);
        glib::spawn_future_local(async move {
            let catalog = handle.await.unwrap_or_else(|_| {
                warn!("currency list worker panicked, using fallback");
                CurrencyCatalog::fallback()
            });
            if let Some(selector) = weak.upgrade() {
                selector.apply_catalog(catalog, &pair);
            }
        });
    }

    /// Calls `on_change` whenever the user picks a different code in either
    /// dropdown.
    pub fn connect_pair_changed(self: &Rc<Self>, on_change: impl Fn(CurrencyPair) + 'static) {
        let on_change = Rc::new(on_change);
        for dropdown in [&self.base, &self.target] {
            let weak = Rc::downgrade(self);
            let on_change = Rc::clone(&on_change);
            dropdown.connect_selected_notify(move |_| {
                let Some(selector) = weak.upgrade() else {
                    return;
                };
                if selector.updating.get() {
                    return;
                }
                match selector.selected_pair() {
                    Some(pair) => on_change(pair),
                    None => debug!("ignoring incomplete currency selection"),
                }
            });
        }
    }

    #[must_use]
    pub fn selected_pair(&self) -> Option<CurrencyPair> {
        let catalog = self.catalog.borrow();
        let codes = catalog.codes();
        let base = codes.get(self.base.selected() as usize)?;
        let target = codes.get(self.target.selected() as usize)?;
        CurrencyPair::new(base, target).ok()
    }

    fn apply_catalog(&self, catalog: CurrencyCatalog, pair: &CurrencyPair) {
        let (base_index, target_index) = catalog.selection_for(pair.base(), pair.target());
        let codes: Vec<&str> = catalog.codes().iter().map(String::as_str).collect();

        self.updating.set(true);
        for (dropdown, index) in [(&self.base, base_index), (&self.target, target_index)] {
            dropdown.set_model(Some(&gtk::StringList::new(&codes)));
            dropdown.set_selected(u32::try_from(index).unwrap_or(0));
        }
        self.updating.set(false);

        debug!(
            count = codes.len(),
            fallback = catalog.is_fallback(),
            "currency selectors populated"
        );
        self.catalog.replace(catalog);
    }
}
