//! Media Queries Level 4 — viewport width ranges.
//! Spec: <https://www.w3.org/TR/mediaqueries-4/#width>
//!
//! Only the width feature is modelled, as a half-open range `[from, to)`.
//! Page behaviors use it to switch themselves on and off when the viewport
//! crosses a breakpoint.

use core::fmt;
use serde::Deserialize;

/// Half-open viewport width range `[from, to)`; `to = None` is unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Option<f64>>")]
pub struct WidthRange {
    pub from: f64,
    pub to: Option<f64>,
}

impl WidthRange {
    pub const fn new(from: f64, to: Option<f64>) -> Self {
        Self { from, to }
    }

    /// Range with no upper bound.
    pub const fn at_least(from: f64) -> Self {
        Self { from, to: None }
    }

    /// True when `width` lies inside `[from, to)`.
    #[inline]
    pub fn contains(&self, width: f64) -> bool {
        width >= self.from && self.to.is_none_or(|to| width < to)
    }
}

impl fmt::Display for WidthRange {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to {
            Some(to) => write!(formatter, "[{}, {})", self.from, to),
            None => write!(formatter, "[{}, max)", self.from),
        }
    }
}

/// Decodes `[from]`, `[from, to]` and `[from, null]`.
impl TryFrom<Vec<Option<f64>>> for WidthRange {
    type Error = String;

    fn try_from(bounds: Vec<Option<f64>>) -> Result<Self, Self::Error> {
        match bounds.as_slice() {
            [Some(from)] | [Some(from), None] => Ok(Self::at_least(*from)),
            [Some(from), Some(to)] if to > from => Ok(Self::new(*from, Some(*to))),
            [Some(from), Some(to)] => Err(format!("empty width range [{from}, {to})")),
            _ => Err(format!(
                "width range expects [from] or [from, to], got {} bounds",
                bounds.len()
            )),
        }
    }
}
