use crate::core::Viewport;

const PADDING_LEFT_MIN_PX: f64 = 60.0;
const PADDING_RIGHT_MIN_PX: f64 = 40.0;
const PADDING_TOP_MIN_PX: f64 = 50.0;
const PADDING_BOTTOM_MIN_PX: f64 = 80.0;

const PADDING_LEFT_RATIO: f64 = 0.08;
const PADDING_RIGHT_RATIO: f64 = 0.06;
const PADDING_TOP_RATIO: f64 = 0.10;
const PADDING_BOTTOM_RATIO: f64 = 0.16;

/// Plot rectangle inside a viewport.
///
/// Padding scales with the widget size but never drops below fixed floors.
/// Rendering and hit testing both derive their geometry from this type so the
/// two never disagree about where a data point lives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotLayout {
    pub width: f64,
    pub height: f64,
    pub padding_left: f64,
    pub padding_right: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,
}

impl PlotLayout {
    #[must_use]
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self::for_size(f64::from(viewport.width), f64::from(viewport.height))
    }

    #[must_use]
    pub fn for_size(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding_left: PADDING_LEFT_MIN_PX.max(width * PADDING_LEFT_RATIO),
            padding_right: PADDING_RIGHT_MIN_PX.max(width * PADDING_RIGHT_RATIO),
            padding_top: PADDING_TOP_MIN_PX.max(height * PADDING_TOP_RATIO),
            padding_bottom: PADDING_BOTTOM_MIN_PX.max(height * PADDING_BOTTOM_RATIO),
        }
    }

    #[must_use]
    pub fn plot_left(&self) -> f64 {
        self.padding_left
    }

    #[must_use]
    pub fn plot_right(&self) -> f64 {
        self.width - self.padding_right
    }

    #[must_use]
    pub fn plot_top(&self) -> f64 {
        self.padding_top
    }

    #[must_use]
    pub fn plot_bottom(&self) -> f64 {
        self.height - self.padding_bottom
    }

    #[must_use]
    pub fn plot_width(&self) -> f64 {
        self.width - self.padding_left - self.padding_right
    }

    #[must_use]
    pub fn plot_height(&self) -> f64 {
        self.height - self.padding_top - self.padding_bottom
    }

    /// Whether the padding floors still leave a non-empty plot area.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.plot_width() > 0.0 && self.plot_height() > 0.0
    }

    /// Inclusive containment test against the plot rectangle.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.plot_left() && x <= self.plot_right() && self.contains_y(y)
    }

    #[must_use]
    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.plot_top() && y <= self.plot_bottom()
    }

    /// Maps a value into the vertical band, larger values landing higher up.
    #[must_use]
    pub fn value_to_y(&self, value: f64, range_min: f64, range_max: f64) -> f64 {
        let normalized = (value - range_min) / (range_max - range_min);
        self.plot_bottom() - normalized * self.plot_height()
    }

    /// Horizontal position of data index `index` out of `count` points.
    ///
    /// A single point sits on the left edge of the plot.
    #[must_use]
    pub fn index_to_x(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return self.plot_left();
        }
        let ratio = index as f64 / (count - 1) as f64;
        (self.plot_left() + ratio * self.plot_width()).min(self.plot_right())
    }

    /// Nearest data index for a horizontal position, `None` outside `[0, count - 1]`.
    #[must_use]
    pub fn x_to_index(&self, x: f64, count: usize) -> Option<usize> {
        if count == 0 || !x.is_finite() || self.plot_width() <= 0.0 {
            return None;
        }
        let ratio = (x - self.plot_left()) / self.plot_width();
        let index = (ratio * (count - 1) as f64).round();
        if index < 0.0 || index > (count - 1) as f64 {
            return None;
        }
        Some(index as usize)
    }
}
