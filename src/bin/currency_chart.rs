use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;

use rate_chart::api::{ChartController, RenderStyle, ViewerConfig};
use rate_chart::cli::{CliCommand, CliError, parse_cli_args, usage_message};
use rate_chart::core::{CurrencyPair, Period, ZoomAction};
use rate_chart::feed::{CurrencyCatalog, HttpRateClient, RateTicker};
use rate_chart::platform_gtk::{
    GtkChartAdapter, GtkPairSelector, GtkRateTicker, SharedCurrencyListSource, SharedFetcher,
    SharedLiveRateSource, desktop_theme,
};
use rate_chart::render::CairoRenderer;

const APPLICATION_ID: &str = "io.github.rate_chart.CurrencyChart";
const CONFIG_ENV_VAR: &str = "RATE_CHART_CONFIG";
const INITIAL_FETCH_DELAY: Duration = Duration::from_millis(500);

fn main() -> ExitCode {
    let _ = rate_chart::telemetry::init_default_tracing();

    let command = match parse_cli_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(CliError::MissingArguments) => {
            println!("{}", usage_message());
            return ExitCode::FAILURE;
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{}", usage_message());
            return ExitCode::FAILURE;
        }
    };

    if command == CliCommand::Help {
        println!("{}", usage_message());
        return ExitCode::SUCCESS;
    }

    match run(command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: CliCommand) -> Result<ExitCode, String> {
    let config = load_config()?;
    let client = Arc::new(HttpRateClient::from_config(&config).map_err(|err| err.to_string())?);

    match command {
        CliCommand::Help => Ok(ExitCode::SUCCESS),
        CliCommand::ListCurrencies => {
            let catalog = CurrencyCatalog::load(client.as_ref());
            if catalog.is_fallback() {
                eprintln!("currency list unavailable, showing defaults");
            }
            for code in catalog.codes() {
                println!("{code}");
            }
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Live { pair } => {
            let mut ticker = RateTicker::new(pair, config.live_refresh_interval());
            loop {
                println!("{}", ticker.refresh_with(client.as_ref(), Instant::now()));
                std::thread::sleep(ticker.refresh_interval());
            }
        }
        CliCommand::Chart { pair } => Ok(run_window(pair, config, client)),
    }
}

fn load_config() -> Result<ViewerConfig, String> {
    let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
        return Ok(ViewerConfig::default());
    };
    let raw = std::fs::read_to_string(&path)
        .map_err(|err| format!("failed to read {}: {err}", path.to_string_lossy()))?;
    ViewerConfig::from_json_str(&raw).map_err(|err| err.to_string())
}

fn run_window(pair: CurrencyPair, config: ViewerConfig, client: Arc<HttpRateClient>) -> ExitCode {
    let app = gtk::Application::builder()
        .application_id(APPLICATION_ID)
        .build();

    app.connect_activate(move |app| {
        if let Err(err) = build_window(app, &pair, &config, Arc::clone(&client)) {
            eprintln!("failed to build chart window: {err}");
            app.quit();
        }
    });

    // Arguments were consumed above; GTK must not see them.
    if app.run_with_args::<&str>(&[]) == glib::ExitCode::SUCCESS {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn build_window(
    app: &gtk::Application,
    pair: &CurrencyPair,
    config: &ViewerConfig,
    client: Arc<HttpRateClient>,
) -> Result<(), String> {
    let theme = config.theme.unwrap_or_else(desktop_theme);
    let width = i32::try_from(config.window_width).map_err(|err| err.to_string())?;
    let height = i32::try_from(config.window_height).map_err(|err| err.to_string())?;

    let renderer = CairoRenderer::new(width, height).map_err(|err| err.to_string())?;
    let controller = ChartController::new(
        renderer,
        pair.clone(),
        config,
        RenderStyle::for_theme(theme),
    )
    .map_err(|err| err.to_string())?;

    let fetcher: SharedFetcher = client.clone();
    let adapter = Rc::new(GtkChartAdapter::new(controller, fetcher));
    adapter.install_default_interaction();

    let currency_source: SharedCurrencyListSource = client.clone();
    let live_source: SharedLiveRateSource = client;
    let ticker = GtkRateTicker::new(
        RateTicker::new(pair.clone(), config.live_refresh_interval()),
        live_source,
    );

    let refresh_button = gtk::Button::with_label("Refresh");
    {
        let adapter = Rc::clone(&adapter);
        refresh_button.connect_clicked(move |_| adapter.request_refresh());
    }

    let period_labels: Vec<String> = Period::ALL.iter().map(|period| period.label()).collect();
    let period_label_refs: Vec<&str> = period_labels.iter().map(String::as_str).collect();
    let period_dropdown = gtk::DropDown::from_strings(&period_label_refs);
    period_dropdown.set_selected(config.default_period.index() as u32);
    {
        let adapter = Rc::clone(&adapter);
        period_dropdown.connect_selected_notify(move |dropdown| {
            if let Some(period) = Period::from_index(dropdown.selected() as usize) {
                adapter.set_period(period);
            }
        });
    }

    let pair_selector = GtkPairSelector::new(pair);
    pair_selector.load(currency_source, pair.clone());

    let zoom_in_button = gtk::Button::with_label("+");
    let zoom_out_button = gtk::Button::with_label("-");
    let zoom_reset_button = gtk::Button::with_label("Reset Zoom");
    for (button, action) in [
        (&zoom_in_button, ZoomAction::In),
        (&zoom_out_button, ZoomAction::Out),
        (&zoom_reset_button, ZoomAction::Reset),
    ] {
        let adapter = Rc::clone(&adapter);
        button.connect_clicked(move |_| adapter.apply_zoom(action));
    }

    let live_label = ticker.label().clone();
    live_label.set_hexpand(true);
    live_label.set_xalign(1.0);

    let toolbar = gtk::Box::new(gtk::Orientation::Horizontal, 6);
    toolbar.append(&refresh_button);
    toolbar.append(pair_selector.base_dropdown());
    toolbar.append(&gtk::Label::new(Some("/")));
    toolbar.append(pair_selector.target_dropdown());
    toolbar.append(&gtk::Label::new(Some("Period:")));
    toolbar.append(&period_dropdown);
    toolbar.append(&zoom_in_button);
    toolbar.append(&zoom_out_button);
    toolbar.append(&zoom_reset_button);
    toolbar.append(&live_label);

    let layout = gtk::Box::new(gtk::Orientation::Vertical, 6);
    layout.set_margin_top(6);
    layout.set_margin_bottom(6);
    layout.set_margin_start(6);
    layout.set_margin_end(6);
    layout.append(&toolbar);
    layout.append(adapter.drawing_area());
    layout.append(adapter.status_label());

    let window = gtk::ApplicationWindow::builder()
        .application(app)
        .title(format!("Currency Chart - {pair}"))
        .default_width(width)
        .default_height(height)
        .build();
    window.set_child(Some(&layout));
    {
        let adapter = Rc::clone(&adapter);
        let ticker = Rc::clone(&ticker);
        let window = window.downgrade();
        pair_selector.connect_pair_changed(move |pair| {
            if let Some(window) = window.upgrade() {
                window.set_title(Some(&format!("Currency Chart - {pair}")));
            }
            ticker.set_pair(pair.clone());
            adapter.set_pair(pair);
        });
    }
    {
        let adapter = Rc::clone(&adapter);
        let ticker = Rc::clone(&ticker);
        window.connect_close_request(move |_| {
            adapter.cancel_pending();
            ticker.stop();
            glib::Propagation::Proceed
        });
    }
    window.present();

    ticker.start();
    glib::timeout_add_local_once(INITIAL_FETCH_DELAY, move || adapter.request_refresh());
    Ok(())
}
