use serde::{Deserialize, Serialize};

use crate::core::Period;
use crate::error::{ChartError, ChartResult};

/// Zoom factor tuning for the value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomBehavior {
    /// Multiplicative factor applied per zoom-in/zoom-out action.
    pub step: f64,
    /// Zoom-out floor. There is no zoom-in ceiling.
    pub min_level: f64,
}

impl Default for ZoomBehavior {
    fn default() -> Self {
        Self {
            step: 1.2,
            min_level: 0.5,
        }
    }
}

impl ZoomBehavior {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.step.is_finite() || self.step <= 1.0 {
            return Err(ChartError::InvalidData(
                "zoom step must be finite and > 1".to_owned(),
            ));
        }
        if !self.min_level.is_finite() || self.min_level <= 0.0 || self.min_level > 1.0 {
            return Err(ChartError::InvalidData(
                "minimum zoom level must be finite and in (0, 1]".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// User-triggered zoom command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomAction {
    In,
    Out,
    Reset,
}

/// What the chart viewport shows. Exactly one mode is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayState {
    Loading,
    Error(String),
    /// Draw the current series, or the "no data" notice when it is empty.
    #[default]
    Ready,
}

/// Per-chart view settings that survive data refreshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    zoom_level: f64,
    period: Period,
    display: DisplayState,
    zoom_behavior: ZoomBehavior,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom_level: 1.0,
            period: Period::default(),
            display: DisplayState::default(),
            zoom_behavior: ZoomBehavior::default(),
        }
    }
}

impl ViewState {
    pub fn new(period: Period, zoom_behavior: ZoomBehavior) -> ChartResult<Self> {
        Ok(Self {
            period,
            zoom_behavior: zoom_behavior.validate()?,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    #[must_use]
    pub fn period(&self) -> Period {
        self.period
    }

    #[must_use]
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    #[must_use]
    pub fn zoom_behavior(&self) -> ZoomBehavior {
        self.zoom_behavior
    }

    /// Applies `action` and returns the resulting zoom level.
    pub fn apply_zoom(&mut self, action: ZoomAction) -> f64 {
        self.zoom_level = match action {
            ZoomAction::In => self.zoom_level * self.zoom_behavior.step,
            ZoomAction::Out => {
                (self.zoom_level / self.zoom_behavior.step).max(self.zoom_behavior.min_level)
            }
            ZoomAction::Reset => 1.0,
        };
        self.zoom_level
    }

    /// Returns `true` when the period actually changed.
    pub fn set_period(&mut self, period: Period) -> bool {
        let changed = self.period != period;
        self.period = period;
        changed
    }

    pub fn set_loading(&mut self) {
        self.display = DisplayState::Loading;
    }

    pub fn set_ready(&mut self) {
        self.display = DisplayState::Ready;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.display = DisplayState::Error(message.into());
    }
}
