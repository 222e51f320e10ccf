//! Pointer and zoom input handling.

pub use crate::core::ZoomAction;

use crate::core::{PlotLayout, Viewport};

/// Maps a click position to the nearest data index.
///
/// Uses the same `PlotLayout` as the chart renderer. Returns `None` for an
/// empty series, for positions outside the plot rectangle, and when the
/// viewport leaves no plot area at all.
#[must_use]
pub fn hit_test(x: f64, y: f64, viewport: Viewport, count: usize) -> Option<usize> {
    if count == 0 || !viewport.is_valid() || !x.is_finite() || !y.is_finite() {
        return None;
    }
    let layout = PlotLayout::for_viewport(viewport);
    if !layout.is_drawable() || !layout.contains(x, y) {
        return None;
    }
    layout.x_to_index(x, count)
}

#[cfg(test)]
mod tests {
    use super::hit_test;
    use crate::core::{PlotLayout, Viewport};

    #[test]
    fn rounds_to_nearest_index() {
        let viewport = Viewport::new(700, 500);
        let layout = PlotLayout::for_viewport(viewport);
        let spacing = layout.plot_width() / 4.0;
        let y = layout.plot_top() + 10.0;
        assert_eq!(hit_test(layout.plot_left() + spacing * 0.49, y, viewport, 5), Some(0));
        assert_eq!(hit_test(layout.plot_left() + spacing * 0.51, y, viewport, 5), Some(1));
        assert_eq!(hit_test(layout.plot_right(), y, viewport, 5), Some(4));
    }

    #[test]
    fn single_point_series_always_hits_index_zero() {
        let viewport = Viewport::new(700, 500);
        let layout = PlotLayout::for_viewport(viewport);
        assert_eq!(hit_test(layout.plot_right(), layout.plot_top(), viewport, 1), Some(0));
    }

    #[test]
    fn non_finite_pointer_is_ignored() {
        assert_eq!(hit_test(f64::NAN, 100.0, Viewport::new(700, 500), 3), None);
        assert_eq!(hit_test(100.0, 100.0, Viewport::new(0, 500), 3), None);
    }
}
