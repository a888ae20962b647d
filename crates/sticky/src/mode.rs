//! Pinning modes.

use core::fmt;
use log::warn;
use serde::Deserialize;
use serde_json::Value;

/// How the sidebar follows the page.
///
/// Only `Top` pins anything; `Scroll` and `Bottom` are accepted and kept for
/// the controller's lifetime but evaluate to no change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "Option<Value>")]
pub enum Mode {
    /// Pin to the top of the viewport, park at the document bottom.
    #[default]
    Top,
    /// Reserved.
    Scroll,
    /// Reserved.
    Bottom,
}

impl Mode {
    /// Resolve a mode name; anything unrecognized falls back to `Top`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "top" => Self::Top,
            "scroll" => Self::Scroll,
            "bottom" => Self::Bottom,
            other => {
                warn!("unknown sticky mode `{other}`, using `top`");
                Self::Top
            }
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Scroll => "scroll",
            Self::Bottom => "bottom",
        }
    }
}

impl From<Option<Value>> for Mode {
    fn from(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Top,
            Some(Value::String(name)) => Self::from_name(&name),
            Some(other) => {
                warn!("sticky mode must be a name, got `{other}`, using `top`");
                Self::Top
            }
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
