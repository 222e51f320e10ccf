use chrono::{NaiveDate, NaiveDateTime};
use rate_chart::api::{
    ChartRenderer, ChartScene, LOADING_MESSAGE, NO_DATA_MESSAGE, RenderStyle,
};
use rate_chart::core::{
    CurrencyPair, DataSeries, Period, PlotLayout, ViewState, Viewport, ZoomAction, ZoomBehavior,
};
use rate_chart::render::TextHAlign;

fn updated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .expect("timestamp")
}

fn series(values: &[f64]) -> DataSeries {
    let dates = (0..values.len())
        .map(|i| format!("2024-02-{:02}", i + 1))
        .collect();
    DataSeries::new(values.to_vec(), dates).expect("series")
}

fn render(values: &[f64], view: &ViewState, viewport: Viewport) -> rate_chart::render::RenderFrame {
    let pair = CurrencyPair::new("USD", "BRL").expect("pair");
    let series = series(values);
    let scene = ChartScene {
        pair: &pair,
        series: &series,
        view,
        updated_at: updated_at(),
    };
    let frame = ChartRenderer::default()
        .render(&scene, viewport)
        .expect("frame");
    frame.validate().expect("valid frame");
    frame
}

#[test]
fn ready_chart_contains_every_section() {
    let view = ViewState::default();
    let frame = render(&[5.0, 5.05, 5.1, 5.02], &view, Viewport::new(700, 500));

    let title = frame.find_text("Exchange Rate:").expect("title");
    assert_eq!(title.text, "Exchange Rate: USD/BRL - 30 days");
    assert!(title.bold);
    assert_eq!(title.h_align, TextHAlign::Center);

    assert!(frame.find_text("Rate").is_some());
    assert!(frame.find_text("Zoom: 1.0x").is_some());
    assert!(frame.find_text("Current: 5.0200").is_some());
    assert!(frame.find_text("Min: 5.0000").is_some());
    assert!(frame.find_text("Max: 5.1000").is_some());
    assert!(frame.find_text("Change: 0.40%").is_some());
    assert!(frame.find_text("Updated: 2024-03-01 09:30:00").is_some());
    assert!(frame.find_text("2024-02-01").is_some());

    assert_eq!(frame.circles.len(), 4);
    assert_eq!(frame.polylines.len(), 1);
    assert_eq!(frame.polylines[0].points.len(), 4);
    // Background plus legend swatch.
    assert_eq!(frame.rects.len(), 2);
}

#[test]
fn percent_change_annotation_uses_direction_colors() {
    let style = RenderStyle::default();
    let view = ViewState::default();

    let frame = render(&[1.0, 1.0, 1.0, 1.1], &view, Viewport::new(700, 500));
    let change = frame.find_text("Change:").expect("change");
    assert_eq!(change.text, "Change: 10.00%");
    assert_eq!(change.color, style.positive_change_color);

    let frame = render(&[2.0, 1.8], &view, Viewport::new(700, 500));
    let change = frame.find_text("Change:").expect("change");
    assert_eq!(change.text, "Change: -10.00%");
    assert_eq!(change.color, style.negative_change_color);

    let frame = render(&[0.0, 1.0], &view, Viewport::new(700, 500));
    let change = frame.find_text("Change:").expect("change");
    assert_eq!(change.text, "Change: n/a");
    assert_eq!(change.color, style.series_color);
}

#[test]
fn off_scale_value_breaks_the_line() {
    let mut view = ViewState::default();
    view.apply_zoom(ZoomAction::In);
    view.apply_zoom(ZoomAction::In);
    view.apply_zoom(ZoomAction::In);
    view.apply_zoom(ZoomAction::In);
    // 1.2^4 ~= 2.07: the visible band is about [2.6, 7.4].
    let frame = render(&[0.0, 5.0, 5.0, 10.0, 5.0, 5.0], &view, Viewport::new(700, 500));

    assert_eq!(frame.polylines.len(), 2);
    assert!(frame.polylines.iter().all(|segment| segment.points.len() == 2));
    assert_eq!(frame.circles.len(), 4);
}

#[test]
fn zoom_of_two_yields_two_disjoint_segments() {
    let view = ViewState::new(Period::Week, ZoomBehavior { step: 2.0, min_level: 0.5 })
        .map(|mut view| {
            view.apply_zoom(ZoomAction::In);
            view
        })
        .expect("view");
    assert_eq!(view.zoom_level(), 2.0);

    let frame = render(&[0.0, 5.0, 5.0, 10.0, 5.0, 5.0], &view, Viewport::new(700, 500));
    assert_eq!(frame.polylines.len(), 2);
    let first_end = frame.polylines[0].points.last().expect("point").0;
    let second_start = frame.polylines[1].points[0].0;
    assert!(second_start > first_end);
}

#[test]
fn extreme_zoom_still_builds_a_valid_frame() {
    let mut view = ViewState::default();
    for _ in 0..220 {
        view.apply_zoom(ZoomAction::In);
    }
    assert!(view.zoom_level() > 1e17);

    let viewport = Viewport::new(700, 500);
    let frame = render(&[4.0, 5.0, 6.0], &view, viewport);
    let layout = PlotLayout::for_viewport(viewport);

    assert_eq!(frame.circles.len(), 1);
    let center = frame.circles[0];
    assert!(center.center_y.is_finite());
    assert!(center.center_y >= layout.plot_top() && center.center_y <= layout.plot_bottom());
}

#[test]
fn single_point_sits_on_left_edge() {
    let view = ViewState::default();
    let viewport = Viewport::new(700, 500);
    let frame = render(&[5.25], &view, viewport);
    let layout = PlotLayout::for_viewport(viewport);

    assert_eq!(frame.circles.len(), 1);
    assert_eq!(frame.circles[0].center_x, layout.plot_left());
    assert!(frame.find_text("Change: 0.00%").is_some());
}

#[test]
fn status_states_replace_the_plot() {
    let mut view = ViewState::default();
    view.set_loading();
    let frame = render(&[5.0, 5.1], &view, Viewport::new(700, 500));
    assert!(frame.find_text(LOADING_MESSAGE).is_some());
    assert!(frame.polylines.is_empty());
    assert!(frame.find_text("Exchange Rate:").is_some());

    view.set_error("HTTP error: 503");
    let frame = render(&[5.0, 5.1], &view, Viewport::new(700, 500));
    let message = frame.find_text("Error:").expect("error message");
    assert_eq!(message.text, "Error: HTTP error: 503");
    assert_eq!(message.color, RenderStyle::default().warning_color);
    assert!(frame.circles.is_empty());

    view.set_ready();
    let frame = render(&[], &view, Viewport::new(700, 500));
    assert!(frame.find_text(NO_DATA_MESSAGE).is_some());
    assert!(frame.lines.is_empty());
}

#[test]
fn tiny_viewport_draws_only_background_and_title() {
    let frame = render(&[5.0, 5.1], &ViewState::default(), Viewport::new(90, 100));
    assert_eq!(frame.rects.len(), 1);
    assert_eq!(frame.texts.len(), 1);
    assert!(frame.lines.is_empty());
}

#[test]
fn date_labels_are_thinned_to_plot_width() {
    let values: Vec<f64> = (0..60).map(|i| 5.0 + f64::from(i) * 0.01).collect();
    let viewport = Viewport::new(700, 500);
    let frame = render(&values, &ViewState::default(), viewport);
    let layout = PlotLayout::for_viewport(viewport);

    let max_labels = (layout.plot_width() / 80.0).floor() as usize;
    let step = 60 / max_labels;
    let date_labels = frame
        .texts
        .iter()
        .filter(|text| text.text.starts_with("2024-"))
        .count();
    assert_eq!(date_labels, 60_usize.div_ceil(step));
    assert!(
        frame
            .texts
            .iter()
            .filter(|text| text.text.starts_with("2024-"))
            .all(|text| text.rotation_rad < 0.0)
    );
}

#[test]
fn invalid_viewport_is_rejected() {
    let pair = CurrencyPair::new("USD", "BRL").expect("pair");
    let series = DataSeries::empty();
    let view = ViewState::default();
    let scene = ChartScene {
        pair: &pair,
        series: &series,
        view: &view,
        updated_at: updated_at(),
    };
    assert!(ChartRenderer::default().render(&scene, Viewport::new(0, 10)).is_err());
}
