//! Sticky sidebar behavior.
//!
//! Keeps a sidebar element in view while the page scrolls through its
//! container: the sidebar is pinned to the top of the viewport once its
//! container scrolls past, and parked at the bottom of the document once the
//! remaining travel runs out. Space reserved by fixed headers and footers is
//! described with [`MarginSpec`] values and resolved against the host
//! document. An optional [`WidthRange`] switches the behavior off outside a
//! viewport width breakpoint.
//!
//! The controller talks to its page only through [`dom::HostDocument`], and
//! receives scroll/resize notifications either directly or through an
//! [`EventPump`].

pub mod config;
pub use config::{StickyConfig, StickyOptions};

/// Pin state machine driven by scroll and resize.
pub mod controller;
pub use controller::{
    ContainerBox, FIXED_BOTTOM_CLASS, FIXED_TOP_CLASS, PinState, ScrollDirection, StickySidebar,
};

pub mod events;
pub use events::{EventPump, PageEvent, PumpStats};

pub mod margin;
pub use margin::{MarginSpec, MarginSpecs, Margins, resolve_margin};

pub mod mode;
pub use mode::Mode;

pub mod throttle;
pub use throttle::{Throttle, ThrottleState};

pub use css_media_queries::WidthRange;
