use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::PlotLayout;

/// Smallest value span the scaler works with.
///
/// Flat or single-point series are widened to at least this span so tick
/// selection and value-to-pixel mapping never divide by zero.
pub const MIN_VALUE_SPAN: f64 = 0.000_001;

/// Relative span used to widen a flat series around its value.
const FLAT_SERIES_RELATIVE_SPAN: f64 = 0.002;

/// Zoomed bands never shrink below this fraction of their midpoint, so
/// `f64` still resolves the mapped pixel positions.
const MIN_RELATIVE_ZOOMED_SPAN: f64 = 1e-9;

/// Upper bound on generated ticks, guards against pathological step values.
const MAX_TICKS: usize = 256;

/// One horizontal grid position on the value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: f64,
    pub y: f64,
}

pub type TickList = SmallVec<[Tick; 16]>;

/// Human-friendly grid increment (1, 2, 5 or 10 times a power of ten) giving
/// roughly five intervals across `[min, max]`.
#[must_use]
pub fn nice_step(min: f64, max: f64) -> f64 {
    let range = max - min;
    let range = if range.is_finite() && range > MIN_VALUE_SPAN {
        range
    } else {
        MIN_VALUE_SPAN
    };

    let magnitude = 10f64.powf(range.log10().floor());
    let residual = range / magnitude;

    let nice_fraction = if residual < 1.5 {
        1.0
    } else if residual < 3.0 {
        2.0
    } else if residual < 7.0 {
        5.0
    } else {
        10.0
    };

    nice_fraction * magnitude / 5.0
}

/// Narrows (`zoom > 1`) or widens (`zoom < 1`) `[min, max]` around its midpoint.
///
/// The lower bound is clamped at zero since rates are never negative, so
/// zooming out stops growing downward once it reaches zero and only expands
/// upward from there. Non-finite or non-positive zoom factors act as `1.0`.
/// Zooming in stops narrowing once the band reaches `MIN_VALUE_SPAN` (or a
/// tiny fraction of the midpoint, whichever is larger).
#[must_use]
pub fn zoomed_range(min: f64, max: f64, zoom: f64) -> (f64, f64) {
    let zoom = if zoom.is_finite() && zoom > 0.0 {
        zoom
    } else {
        1.0
    };

    let span = max - min;
    let mid = min + span / 2.0;
    let min_span = MIN_VALUE_SPAN.max(mid.abs() * MIN_RELATIVE_ZOOMED_SPAN);
    let zoomed_span = (span / zoom).max(min_span.min(span));

    ((mid - zoomed_span / 2.0).max(0.0), mid + zoomed_span / 2.0)
}

/// Grid ticks for `[range_min, range_max]` that land inside the plot band.
///
/// Candidates run from `floor(min / step) * step` to `ceil(max / step) * step`
/// inclusive; anything whose pixel position falls outside the band is dropped.
#[must_use]
pub fn tick_positions(range_min: f64, range_max: f64, step: f64, layout: &PlotLayout) -> TickList {
    let mut ticks = TickList::new();
    if !step.is_finite() || step <= 0.0 || !(range_max > range_min) {
        return ticks;
    }

    let first = (range_min / step).floor();
    let last = (range_max / step).ceil();
    let count = ((last - first).max(0.0) as usize).min(MAX_TICKS);

    for k in 0..=count {
        let value = (first + k as f64) * step;
        let y = layout.value_to_y(value, range_min, range_max);
        if layout.contains_y(y) {
            ticks.push(Tick { value, y });
        }
    }

    ticks
}

/// Minimum and maximum over the finite values, `None` when there are none.
#[must_use]
pub fn value_bounds(values: &[f64]) -> Option<(f64, f64)> {
    let finite = || values.iter().copied().filter(|v| v.is_finite()).map(OrderedFloat);
    let min = finite().min()?;
    let max = finite().max()?;
    Some((min.into_inner(), max.into_inner()))
}

/// Widens a flat range symmetrically so it can be scaled.
#[must_use]
pub fn ensure_span(min: f64, max: f64) -> (f64, f64) {
    if max - min >= MIN_VALUE_SPAN {
        return (min, max);
    }
    let mid = min + (max - min) / 2.0;
    let half = (mid.abs() * FLAT_SERIES_RELATIVE_SPAN).max(MIN_VALUE_SPAN) / 2.0;
    (mid - half, mid + half)
}

#[cfg(test)]
mod tests {
    use super::{MIN_VALUE_SPAN, ensure_span, nice_step, tick_positions, value_bounds, zoomed_range};
    use crate::core::{PlotLayout, Viewport};

    #[test]
    fn nice_step_follows_fraction_thresholds() {
        assert!((nice_step(0.0, 1.0) - 0.2).abs() <= 1e-12);
        assert!((nice_step(0.0, 2.0) - 0.4).abs() <= 1e-12);
        assert!((nice_step(0.0, 5.0) - 1.0).abs() <= 1e-12);
        assert!((nice_step(0.0, 8.0) - 2.0).abs() <= 1e-12);
    }

    #[test]
    fn nice_step_thresholds_are_strict() {
        // a residual of exactly 1.5 is not `< 1.5`
        assert!((nice_step(0.0, 1.5) - 0.4).abs() <= 1e-12);
        assert!((nice_step(0.0, 3.0) - 1.0).abs() <= 1e-12);
        assert!((nice_step(0.0, 7.0) - 2.0).abs() <= 1e-12);
    }

    #[test]
    fn degenerate_range_does_not_divide_by_zero() {
        let step = nice_step(4.2, 4.2);
        assert!(step.is_finite() && step > 0.0);
        assert!(step <= MIN_VALUE_SPAN);
    }

    #[test]
    fn zoom_below_one_expands_upward_after_zero_clamp() {
        let (low, high) = zoomed_range(1.0, 3.0, 0.5);
        assert_eq!(low, 0.0);
        assert!((high - 4.0).abs() <= 1e-12);
    }

    #[test]
    fn extreme_zoom_keeps_a_resolvable_band() {
        let (low, high) = zoomed_range(4.0, 6.0, 1.2f64.powi(220));
        assert!(high > low);
        assert!((high - low - MIN_VALUE_SPAN).abs() <= 1e-12);
        assert!(low < 5.0 && high > 5.0);

        let (low, high) = zoomed_range(1.0e6, 1.0e6 + 10.0, 1.0e15);
        assert!(high - low >= 1.0e6 * 1e-9 - 1e-12);
    }

    #[test]
    fn invalid_zoom_acts_as_identity() {
        assert_eq!(zoomed_range(1.0, 3.0, 0.0), (1.0, 3.0));
        assert_eq!(zoomed_range(1.0, 3.0, f64::NAN), (1.0, 3.0));
    }

    #[test]
    fn ticks_stay_inside_plot_band() {
        let layout = PlotLayout::for_viewport(Viewport::new(700, 500));
        let ticks = tick_positions(1.03, 1.97, nice_step(1.03, 1.97), &layout);
        assert!(!ticks.is_empty());
        for tick in &ticks {
            assert!(tick.y >= layout.plot_top() && tick.y <= layout.plot_bottom());
            assert!(tick.value >= 1.03 - 1e-9 && tick.value <= 1.97 + 1e-9);
        }
        assert!(ticks.windows(2).all(|pair| pair[0].y > pair[1].y));
    }

    #[test]
    fn invalid_step_yields_no_ticks() {
        let layout = PlotLayout::for_viewport(Viewport::new(700, 500));
        assert!(tick_positions(0.0, 1.0, 0.0, &layout).is_empty());
        assert!(tick_positions(1.0, 1.0, 0.1, &layout).is_empty());
    }

    #[test]
    fn bounds_skip_non_finite_values() {
        assert_eq!(value_bounds(&[]), None);
        assert_eq!(value_bounds(&[2.0, f64::NAN, 1.0, 3.0]), Some((1.0, 3.0)));
    }

    #[test]
    fn flat_range_is_widened_around_value() {
        let (low, high) = ensure_span(5.0, 5.0);
        assert!(low < 5.0 && high > 5.0);
        assert!((high - low - 0.01).abs() <= 1e-9);

        let (low, high) = ensure_span(0.0, 0.0);
        assert!((high - low - MIN_VALUE_SPAN).abs() <= 1e-15);

        assert_eq!(ensure_span(1.0, 2.0), (1.0, 2.0));
    }
}
