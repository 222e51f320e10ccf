use chrono::NaiveDateTime;
use tracing::trace;

use crate::api::RenderStyle;
use crate::core::{
    CurrencyPair, DataSeries, DisplayState, PlotLayout, ViewState, Viewport, ensure_span,
    nice_step, tick_positions, value_bounds, zoomed_range,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, PolylinePrimitive, RectPrimitive, RenderFrame,
    TextHAlign, TextPrimitive,
};

pub const LOADING_MESSAGE: &str = "Loading data...";
pub const NO_DATA_MESSAGE: &str = "No data available";

const TITLE_BASELINE_Y: f64 = 30.0;
const VALUE_LABEL_GAP_PX: f64 = 6.0;
const VALUE_LABEL_BASELINE_OFFSET_PX: f64 = 3.0;
const DATE_LABEL_OFFSET_Y: f64 = 15.0;
const LEGEND_OFFSET_X: f64 = 100.0;
const LEGEND_SWATCH_WIDTH: f64 = 40.0;
const LEGEND_SWATCH_HEIGHT: f64 = 10.0;
const ANNOTATION_INSET_X: f64 = 10.0;
const FOOTER_OFFSET_X: f64 = 120.0;
const FOOTER_OFFSET_Y: f64 = 10.0;

/// Everything one paint needs besides the viewport, borrowed per call.
#[derive(Debug, Clone, Copy)]
pub struct ChartScene<'a> {
    pub pair: &'a CurrencyPair,
    pub series: &'a DataSeries,
    pub view: &'a ViewState,
    /// Wall-clock time shown in the "Updated" footer.
    pub updated_at: NaiveDateTime,
}

/// `Change: ...` annotation text for an optional percent change.
#[must_use]
pub fn format_percent_change(change: Option<f64>) -> String {
    match change {
        Some(change) => format!("Change: {change:.2}%"),
        None => "Change: n/a".to_owned(),
    }
}

/// Builds chart frames from a series and view state.
///
/// Rendering is a pure function of its inputs: the same scene and viewport
/// always produce the same frame, so it can run on every paint request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartRenderer {
    style: RenderStyle,
}

impl ChartRenderer {
    pub fn new(style: RenderStyle) -> ChartResult<Self> {
        Ok(Self {
            style: style.validate()?,
        })
    }

    #[must_use]
    pub fn style(&self) -> RenderStyle {
        self.style
    }

    pub fn render(&self, scene: &ChartScene<'_>, viewport: Viewport) -> ChartResult<RenderFrame> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let style = &self.style;
        let width = f64::from(viewport.width);
        let height = f64::from(viewport.height);

        let mut frame = RenderFrame::new(viewport)
            .with_rect(RectPrimitive::new(0.0, 0.0, width, height, style.background_color))
            .with_text(
                TextPrimitive::new(
                    format!(
                        "Exchange Rate: {}/{} - {} days",
                        scene.pair.base(),
                        scene.pair.target(),
                        scene.view.period().days()
                    ),
                    width / 2.0,
                    TITLE_BASELINE_Y,
                    style.title_font_size_px,
                    style.text_color,
                    TextHAlign::Center,
                )
                .bold(),
            );

        match scene.view.display() {
            DisplayState::Loading => {
                self.push_centered_message(&mut frame, LOADING_MESSAGE, style.text_color);
                return Ok(frame);
            }
            DisplayState::Error(message) => {
                self.push_centered_message(
                    &mut frame,
                    &format!("Error: {message}"),
                    style.warning_color,
                );
                return Ok(frame);
            }
            DisplayState::Ready => {}
        }

        let Some((min_val, max_val)) = value_bounds(scene.series.values()) else {
            self.push_centered_message(&mut frame, NO_DATA_MESSAGE, style.text_color);
            return Ok(frame);
        };

        let layout = PlotLayout::for_viewport(viewport);
        if !layout.is_drawable() {
            trace!(
                width = viewport.width,
                height = viewport.height,
                "viewport too small for plot area"
            );
            return Ok(frame);
        }

        let (scale_min, scale_max) = ensure_span(min_val, max_val);
        let (range_min, range_max) =
            zoomed_range(scale_min, scale_max, scene.view.zoom_level());

        self.push_value_grid(&mut frame, &layout, range_min, range_max);
        self.push_date_grid(&mut frame, &layout, scene.series);
        self.push_axes(&mut frame, &layout);
        self.push_series(&mut frame, &layout, scene.series, range_min, range_max);
        self.push_legend(&mut frame, &layout, scene.view.zoom_level());
        self.push_annotations(&mut frame, &layout, scene.series, min_val, max_val);
        frame.texts.push(TextPrimitive::new(
            format!("Updated: {}", scene.updated_at.format("%Y-%m-%d %H:%M:%S")),
            width - FOOTER_OFFSET_X,
            height - FOOTER_OFFSET_Y,
            style.footer_font_size_px,
            style.text_color,
            TextHAlign::Left,
        ));

        trace!(
            points = scene.series.len(),
            range_min,
            range_max,
            lines = frame.lines.len(),
            segments = frame.polylines.len(),
            "built chart frame"
        );
        Ok(frame)
    }

    fn push_centered_message(&self, frame: &mut RenderFrame, message: &str, color: Color) {
        let x = f64::from(frame.viewport.width) / 2.0;
        let y = f64::from(frame.viewport.height) / 2.0;
        frame.texts.push(TextPrimitive::new(
            message,
            x,
            y,
            self.style.message_font_size_px,
            color,
            TextHAlign::Center,
        ));
    }

    fn push_value_grid(
        &self,
        frame: &mut RenderFrame,
        layout: &PlotLayout,
        range_min: f64,
        range_max: f64,
    ) {
        let style = &self.style;
        let step = nice_step(range_min, range_max);
        for tick in tick_positions(range_min, range_max, step, layout) {
            frame.lines.push(LinePrimitive::new(
                layout.plot_left(),
                tick.y,
                layout.plot_right(),
                tick.y,
                style.grid_line_width,
                style.grid_line_color,
            ));
            frame.texts.push(TextPrimitive::new(
                format!("{:.4}", tick.value),
                layout.plot_left() - VALUE_LABEL_GAP_PX,
                tick.y + VALUE_LABEL_BASELINE_OFFSET_PX,
                style.value_label_font_size_px,
                style.text_color,
                TextHAlign::Right,
            ));
        }
    }

    fn push_date_grid(&self, frame: &mut RenderFrame, layout: &PlotLayout, series: &DataSeries) {
        let style = &self.style;
        let total_points = series.len();
        let max_labels = ((layout.plot_width() / style.date_label_spacing_px).floor() as usize).max(1);
        let step = (total_points / max_labels).max(1);

        for (index, date) in series.dates().iter().enumerate().step_by(step) {
            let x = layout.index_to_x(index, total_points);
            frame.lines.push(LinePrimitive::new(
                x,
                layout.plot_top(),
                x,
                layout.plot_bottom(),
                style.grid_line_width,
                style.grid_line_color,
            ));
            frame.texts.push(
                TextPrimitive::new(
                    date.as_str(),
                    x,
                    layout.plot_bottom() + DATE_LABEL_OFFSET_Y,
                    style.date_label_font_size_px,
                    style.text_color,
                    TextHAlign::Left,
                )
                .rotated(style.date_label_rotation_rad),
            );
        }
    }

    fn push_axes(&self, frame: &mut RenderFrame, layout: &PlotLayout) {
        let style = &self.style;
        frame.lines.push(LinePrimitive::new(
            layout.plot_left(),
            layout.plot_top(),
            layout.plot_left(),
            layout.plot_bottom(),
            style.axis_line_width,
            style.axis_color,
        ));
        frame.lines.push(LinePrimitive::new(
            layout.plot_left(),
            layout.plot_bottom(),
            layout.plot_right(),
            layout.plot_bottom(),
            style.axis_line_width,
            style.axis_color,
        ));
    }

    /// Emits one polyline per run of in-range values plus a marker per point.
    ///
    /// Off-scale values are skipped rather than clipped, and the line resumes
    /// as a new sub-path at the next in-range value.
    fn push_series(
        &self,
        frame: &mut RenderFrame,
        layout: &PlotLayout,
        series: &DataSeries,
        range_min: f64,
        range_max: f64,
    ) {
        let style = &self.style;
        let total_points = series.len();
        let mut run: Vec<(f64, f64)> = Vec::new();

        for (index, &value) in series.values().iter().enumerate() {
            if !(range_min..=range_max).contains(&value) {
                flush_run(frame, &mut run, style);
                continue;
            }
            let x = layout.index_to_x(index, total_points);
            let y = layout.value_to_y(value, range_min, range_max);
            run.push((x, y));
            frame.circles.push(CirclePrimitive::new(
                x,
                y,
                style.point_radius_px,
                style.series_color,
            ));
        }
        flush_run(frame, &mut run, style);
    }

    fn push_legend(&self, frame: &mut RenderFrame, layout: &PlotLayout, zoom_level: f64) {
        let style = &self.style;
        let legend_x = layout.plot_right() - LEGEND_OFFSET_X;
        frame.rects.push(RectPrimitive::new(
            legend_x,
            layout.plot_top() - 35.0,
            LEGEND_SWATCH_WIDTH,
            LEGEND_SWATCH_HEIGHT,
            style.series_color,
        ));
        frame.texts.push(TextPrimitive::new(
            "Rate",
            legend_x + LEGEND_SWATCH_WIDTH + 5.0,
            layout.plot_top() - 25.0,
            style.annotation_font_size_px,
            style.text_color,
            TextHAlign::Left,
        ));
        frame.texts.push(TextPrimitive::new(
            format!("Zoom: {zoom_level:.1}x"),
            legend_x,
            layout.plot_top() - 15.0,
            style.annotation_font_size_px,
            style.text_color,
            TextHAlign::Left,
        ));
    }

    fn push_annotations(
        &self,
        frame: &mut RenderFrame,
        layout: &PlotLayout,
        series: &DataSeries,
        min_val: f64,
        max_val: f64,
    ) {
        let style = &self.style;
        let Some(current) = series.last_value() else {
            return;
        };
        let x = layout.plot_left() + ANNOTATION_INSET_X;
        let top = layout.plot_top();

        frame.texts.push(TextPrimitive::new(
            format!("Current: {current:.4}"),
            x,
            top + 20.0,
            style.current_value_font_size_px,
            style.series_color,
            TextHAlign::Left,
        ));
        for (offset, text) in [
            (35.0, format!("Min: {min_val:.4}")),
            (50.0, format!("Max: {max_val:.4}")),
        ] {
            frame.texts.push(TextPrimitive::new(
                text,
                x,
                top + offset,
                style.annotation_font_size_px,
                style.series_color,
                TextHAlign::Left,
            ));
        }

        let change = series.percent_change();
        let change_color = match change {
            Some(change) if change > 0.0 => style.positive_change_color,
            Some(change) if change < 0.0 => style.negative_change_color,
            _ => style.series_color,
        };
        frame.texts.push(TextPrimitive::new(
            format_percent_change(change),
            x,
            top + 65.0,
            style.annotation_font_size_px,
            change_color,
            TextHAlign::Left,
        ));
    }
}

fn flush_run(frame: &mut RenderFrame, run: &mut Vec<(f64, f64)>, style: &RenderStyle) {
    if run.is_empty() {
        return;
    }
    frame.polylines.push(PolylinePrimitive::new(
        std::mem::take(run),
        style.series_line_width,
        style.series_color,
    ));
}

#[cfg(test)]
mod tests {
    use super::{ChartRenderer, ChartScene, format_percent_change};
    use crate::core::{CurrencyPair, DataSeries, ViewState, Viewport};
    use chrono::NaiveDate;

    fn scene_parts(values: Vec<f64>) -> (CurrencyPair, DataSeries, ViewState) {
        let dates = (0..values.len())
            .map(|i| format!("2024-02-{:02}", i + 1))
            .collect();
        (
            CurrencyPair::new("USD", "BRL").expect("pair"),
            DataSeries::new(values, dates).expect("series"),
            ViewState::default(),
        )
    }

    #[test]
    fn percent_change_formatting() {
        assert_eq!(format_percent_change(Some(10.000_000_000_000_009)), "Change: 10.00%");
        assert_eq!(format_percent_change(Some(-9.999_999_999_999_998)), "Change: -10.00%");
        assert_eq!(format_percent_change(None), "Change: n/a");
    }

    #[test]
    fn single_point_series_renders_without_line() {
        let (pair, series, view) = scene_parts(vec![5.25]);
        let updated_at = NaiveDate::from_ymd_opt(2024, 2, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("timestamp");
        let scene = ChartScene {
            pair: &pair,
            series: &series,
            view: &view,
            updated_at,
        };
        let frame = ChartRenderer::default()
            .render(&scene, Viewport::new(700, 500))
            .expect("frame");
        frame.validate().expect("valid frame");
        assert_eq!(frame.circles.len(), 1);
        assert_eq!(frame.polylines.len(), 1);
        assert_eq!(frame.polylines[0].points.len(), 1);
        assert!(frame.find_text("Current: 5.2500").is_some());
    }
}
