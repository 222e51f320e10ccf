pub mod axis_scaler;
pub mod layout;
pub mod primitives;
pub mod series;
pub mod types;
pub mod view_state;

pub use axis_scaler::{
    MIN_VALUE_SPAN, Tick, TickList, ensure_span, nice_step, tick_positions, value_bounds,
    zoomed_range,
};
pub use layout::PlotLayout;
pub use primitives::{decimal_to_f64, unix_seconds_to_local_date};
pub use series::{CurrencyPair, DataSeries, Period};
pub use types::Viewport;
pub use view_state::{DisplayState, ViewState, ZoomAction, ZoomBehavior};
