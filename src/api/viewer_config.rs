use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::Theme;
use crate::core::{Period, ZoomBehavior};
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_API_BASE_URL: &str = "https://economia.awesomeapi.com.br";

/// Viewer bootstrap configuration.
///
/// Serializable so a JSON file can override any subset of the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub default_period: Period,
    #[serde(default)]
    pub zoom: ZoomBehavior,
    #[serde(default = "default_live_refresh_secs")]
    pub live_refresh_secs: u64,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Forces a palette; `None` follows the desktop theme.
    #[serde(default)]
    pub theme: Option<Theme>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            default_period: Period::default(),
            zoom: ZoomBehavior::default(),
            live_refresh_secs: default_live_refresh_secs(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            theme: None,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(raw: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| ChartError::InvalidData(format!("invalid viewer config: {err}")))?;
        config.validate()
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| ChartError::InvalidData(format!("failed to encode viewer config: {err}")))
    }

    pub fn validate(self) -> ChartResult<Self> {
        let base_url = self.api_base_url.trim().trim_end_matches('/').to_owned();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ChartError::InvalidData(format!(
                "api base url `{}` must start with http:// or https://",
                self.api_base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ChartError::InvalidData(
                "request timeout must be > 0 seconds".to_owned(),
            ));
        }
        if self.live_refresh_secs == 0 {
            return Err(ChartError::InvalidData(
                "live refresh interval must be > 0 seconds".to_owned(),
            ));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ChartError::InvalidViewport {
                width: self.window_width,
                height: self.window_height,
            });
        }
        self.zoom.validate()?;
        Ok(Self {
            api_base_url: base_url,
            ..self
        })
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn live_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.live_refresh_secs)
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_owned()
}

fn default_request_timeout_secs() -> u64 {
    12
}

fn default_live_refresh_secs() -> u64 {
    30
}

fn default_window_width() -> u32 {
    700
}

fn default_window_height() -> u32 {
    500
}
