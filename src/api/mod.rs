//! Chart-level API: rendering a series into a frame, the controller that owns
//! chart state, styling and viewer configuration.

mod chart_controller;
mod chart_renderer;
mod render_style;
mod viewer_config;

pub use chart_controller::{ChartController, FetchTicket};
pub use chart_renderer::{
    ChartRenderer, ChartScene, LOADING_MESSAGE, NO_DATA_MESSAGE, format_percent_change,
};
pub use render_style::{RenderStyle, Theme};
pub use viewer_config::{DEFAULT_API_BASE_URL, ViewerConfig};
