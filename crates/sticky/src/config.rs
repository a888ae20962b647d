//! Controller options and runtime configuration.
//!
//! [`StickyOptions`] is the per-sidebar options object, usually decoded from
//! JSON handed over by the page. [`StickyConfig`] holds host-wide settings
//! that can be loaded from environment variables.

use crate::margin::{MarginSpec, MarginSpecs};
use crate::mode::Mode;
use anyhow::{Context as _, Result};
use core::time::Duration;
use css_media_queries::WidthRange;
use serde::Deserialize;
use std::env;

/// Options for one sticky sidebar.
///
/// Every margin defaults to zero on its own; `before`/`after` never borrow
/// the top or bottom sources.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyOptions {
    /// Selector of the sidebar element.
    pub el: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub include_top: Option<MarginSpec>,
    #[serde(default)]
    pub include_bottom: Option<MarginSpec>,
    #[serde(default)]
    pub include_before: Option<MarginSpec>,
    #[serde(default)]
    pub include_after: Option<MarginSpec>,
    /// Viewport width range outside of which the behavior is disabled.
    #[serde(default)]
    pub on_media_query: Option<WidthRange>,
    /// Re-measure the container on every resize instead of keeping the
    /// construction-time snapshot.
    #[serde(default)]
    pub remeasure_on_resize: bool,
}

impl StickyOptions {
    pub fn new(el: impl Into<String>) -> Self {
        Self {
            el: el.into(),
            mode: Mode::Top,
            include_top: None,
            include_bottom: None,
            include_before: None,
            include_after: None,
            on_media_query: None,
            remeasure_on_resize: false,
        }
    }

    /// Decode an options object.
    ///
    /// # Errors
    /// Returns an error if `json` is not a valid options object.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid sticky sidebar options")
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn include_top(mut self, spec: impl Into<MarginSpec>) -> Self {
        self.include_top = Some(spec.into());
        self
    }

    #[must_use]
    pub fn include_bottom(mut self, spec: impl Into<MarginSpec>) -> Self {
        self.include_bottom = Some(spec.into());
        self
    }

    #[must_use]
    pub fn include_before(mut self, spec: impl Into<MarginSpec>) -> Self {
        self.include_before = Some(spec.into());
        self
    }

    #[must_use]
    pub fn include_after(mut self, spec: impl Into<MarginSpec>) -> Self {
        self.include_after = Some(spec.into());
        self
    }

    #[must_use]
    pub fn on_media_query(mut self, range: WidthRange) -> Self {
        self.on_media_query = Some(range);
        self
    }

    #[must_use]
    pub fn remeasure_on_resize(mut self, enabled: bool) -> Self {
        self.remeasure_on_resize = enabled;
        self
    }

    /// Margin sources with unset entries defaulted to zero.
    pub fn margin_specs(&self) -> MarginSpecs {
        MarginSpecs {
            top: self.include_top.clone().unwrap_or_default(),
            bottom: self.include_bottom.clone().unwrap_or_default(),
            before: self.include_before.clone().unwrap_or_default(),
            after: self.include_after.clone().unwrap_or_default(),
        }
    }
}

/// Default handler throttle window in milliseconds.
pub const DEFAULT_THROTTLE_MS: u64 = 10;

/// Host-wide settings for sticky controllers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StickyConfig {
    /// Scroll/resize throttle window in milliseconds
    pub throttle_ms: u64,
}

impl StickyConfig {
    /// Construct a config; the window is at least 1ms.
    #[inline]
    #[must_use]
    pub const fn new(throttle_ms: u64) -> Self {
        let throttle_ms = if throttle_ms < 1 { 1 } else { throttle_ms };
        Self { throttle_ms }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `STICKY_THROTTLE_MS` (default: 10, minimum 1).
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            throttle_ms: parse_throttle_ms(env::var("STICKY_THROTTLE_MS").ok()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

/// Parse a raw throttle window; unparsable or missing values use the default.
fn parse_throttle_ms(raw: Option<String>) -> u64 {
    raw.and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_THROTTLE_MS)
        .max(1)
}

impl Default for StickyConfig {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_MS)
    }
}
