use proptest::prelude::*;
use rate_chart::core::{PlotLayout, Viewport, nice_step, zoomed_range};
use rate_chart::interaction::hit_test;

proptest! {
    #[test]
    fn nice_step_keeps_interval_count_in_band(
        min in 0.0f64..10_000.0,
        span in 0.000_01f64..1_000_000.0
    ) {
        let max = min + span;
        let step = nice_step(min, max);
        let intervals = span / step;

        prop_assert!(step > 0.0);
        prop_assert!(intervals >= 3.0 - 1e-9, "span {} step {} intervals {}", span, step, intervals);
        // Residuals just under the strict 1.5 threshold round down to 1, so
        // up to 7.5 intervals can occur.
        prop_assert!(intervals < 7.5 + 1e-9, "span {} step {} intervals {}", span, step, intervals);
    }

    #[test]
    fn zoomed_range_is_centered_and_non_negative(
        min in 0.0f64..1_000.0,
        span in 0.001f64..1_000.0,
        zoom in 0.1f64..10.0
    ) {
        let max = min + span;
        let (zoomed_min, zoomed_max) = zoomed_range(min, max, zoom);

        prop_assert!(zoomed_min >= 0.0);
        prop_assert!(zoomed_max > zoomed_min);
        let mid = min + span / 2.0;
        prop_assert!((zoomed_max - mid - span / zoom / 2.0).abs() <= 1e-9 * (1.0 + mid.abs()));
    }

    #[test]
    fn hit_test_recovers_point_index(
        count in 1usize..200,
        index_seed in 0usize..200,
        y_factor in 0.0f64..1.0,
        width in 300u32..2_000,
        height in 250u32..1_200
    ) {
        let index = index_seed % count;
        let viewport = Viewport::new(width, height);
        let layout = PlotLayout::for_viewport(viewport);
        let x = layout.index_to_x(index, count);
        let y = layout.plot_top() + y_factor * layout.plot_height();

        prop_assert_eq!(hit_test(x, y, viewport, count), Some(index));
    }

    #[test]
    fn hit_test_rejects_points_outside_plot(
        count in 1usize..200,
        dx in 1.0f64..50.0
    ) {
        let viewport = Viewport::new(700, 500);
        let layout = PlotLayout::for_viewport(viewport);
        let y = layout.plot_top() + 1.0;

        prop_assert_eq!(hit_test(layout.plot_left() - dx, y, viewport, count), None);
        prop_assert_eq!(hit_test(layout.plot_right() + dx, y, viewport, count), None);
        prop_assert_eq!(hit_test(layout.plot_left(), layout.plot_bottom() + dx, viewport, count), None);
    }
}
