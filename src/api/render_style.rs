use std::f64::consts::FRAC_PI_6;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Palette family picked from the desktop theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Dark when the toolkit theme name mentions "dark" in any casing.
    #[must_use]
    pub fn from_theme_name(theme_name: Option<&str>) -> Self {
        match theme_name {
            Some(name) if name.to_ascii_lowercase().contains("dark") => Self::Dark,
            _ => Self::Light,
        }
    }
}

/// Colors, stroke widths and font sizes of one chart frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub background_color: Color,
    pub grid_line_color: Color,
    pub text_color: Color,
    pub axis_color: Color,
    pub series_color: Color,
    pub warning_color: Color,
    pub positive_change_color: Color,
    pub negative_change_color: Color,
    pub grid_line_width: f64,
    pub axis_line_width: f64,
    pub series_line_width: f64,
    pub point_radius_px: f64,
    pub title_font_size_px: f64,
    pub message_font_size_px: f64,
    pub value_label_font_size_px: f64,
    pub date_label_font_size_px: f64,
    pub current_value_font_size_px: f64,
    pub annotation_font_size_px: f64,
    pub footer_font_size_px: f64,
    /// Date labels are tilted by this angle (negative tilts upward).
    pub date_label_rotation_rad: f64,
    /// Roughly one date label per this many pixels of plot width.
    pub date_label_spacing_px: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::light()
    }
}

impl RenderStyle {
    #[must_use]
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }

    #[must_use]
    pub fn light() -> Self {
        Self {
            background_color: Color::rgb(1.0, 1.0, 1.0),
            grid_line_color: Color::rgb(0.85, 0.85, 0.85),
            text_color: Color::rgb(0.0, 0.0, 0.0),
            axis_color: Color::rgb(0.2, 0.2, 0.2),
            series_color: Color::rgb(0.1, 0.6, 1.0),
            warning_color: Color::rgb(0.8, 0.2, 0.2),
            positive_change_color: Color::rgb(0.2, 0.8, 0.2),
            negative_change_color: Color::rgb(0.8, 0.2, 0.2),
            grid_line_width: 1.0,
            axis_line_width: 2.0,
            series_line_width: 2.0,
            point_radius_px: 3.0,
            title_font_size_px: 16.0,
            message_font_size_px: 14.0,
            value_label_font_size_px: 10.0,
            date_label_font_size_px: 9.0,
            current_value_font_size_px: 12.0,
            annotation_font_size_px: 10.0,
            footer_font_size_px: 8.0,
            date_label_rotation_rad: -FRAC_PI_6,
            date_label_spacing_px: 80.0,
        }
    }

    #[must_use]
    pub fn dark() -> Self {
        Self {
            background_color: Color::rgb(0.12, 0.12, 0.12),
            grid_line_color: Color::rgb(0.25, 0.25, 0.25),
            text_color: Color::rgb(1.0, 1.0, 1.0),
            axis_color: Color::rgb(0.7, 0.7, 0.7),
            ..Self::light()
        }
    }

    pub fn validate(self) -> ChartResult<Self> {
        for color in [
            self.background_color,
            self.grid_line_color,
            self.text_color,
            self.axis_color,
            self.series_color,
            self.warning_color,
            self.positive_change_color,
            self.negative_change_color,
        ] {
            color.validate()?;
        }

        for (name, value) in [
            ("grid_line_width", self.grid_line_width),
            ("axis_line_width", self.axis_line_width),
            ("series_line_width", self.series_line_width),
            ("point_radius_px", self.point_radius_px),
            ("title_font_size_px", self.title_font_size_px),
            ("message_font_size_px", self.message_font_size_px),
            ("value_label_font_size_px", self.value_label_font_size_px),
            ("date_label_font_size_px", self.date_label_font_size_px),
            ("current_value_font_size_px", self.current_value_font_size_px),
            ("annotation_font_size_px", self.annotation_font_size_px),
            ("footer_font_size_px", self.footer_font_size_px),
            ("date_label_spacing_px", self.date_label_spacing_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "render style `{name}` must be finite and > 0"
                )));
            }
        }

        if !self.date_label_rotation_rad.is_finite() {
            return Err(ChartError::InvalidData(
                "render style `date_label_rotation_rad` must be finite".to_owned(),
            ));
        }

        Ok(self)
    }
}
