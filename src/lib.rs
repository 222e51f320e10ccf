//! rate-chart: currency exchange-rate chart viewer.
//!
//! The chart core (`core`, `api::ChartRenderer`, `interaction`) is toolkit
//! independent and turns a daily rate series into a `render::RenderFrame`.
//! `feed` talks to the pricing API, `render` paints frames (headless or via
//! Cairo) and `platform_gtk` hosts the chart in a GTK4 window.

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod feed;
pub mod interaction;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{ChartController, ChartRenderer, RenderStyle, ViewerConfig};
pub use core::{CurrencyPair, DataSeries, Period};
pub use error::{ChartError, ChartResult};
pub use feed::{DataFetcher, FeedError, FeedResult};
