//! The sticky controller keeps one sidebar in one of three pin states and
//! moves between them as the page scrolls and resizes.
//!
//! State lives in the document as class markers (`ss-fixed-top`,
//! `ss-fixed-bottom`) so that page stylesheets can react to it; the
//! controller reads them back to decide which transitions are still due.

use crate::config::{StickyConfig, StickyOptions};
use crate::events::PageEvent;
use crate::margin::{MarginSpec, MarginSpecs, Margins, clamped};
use crate::mode::Mode;
use crate::throttle::Throttle;
use anyhow::{Context as _, Result, anyhow};
use css_media_queries::WidthRange;
use dom::{HostDocument, InlineStyle, NodeKey, Position, format_px};
use log::{debug, trace};
use std::time::Instant;

/// Marker class present while the sidebar is fixed to the viewport top.
pub const FIXED_TOP_CLASS: &str = "ss-fixed-top";
/// Marker class present while the sidebar is parked at the document bottom.
pub const FIXED_BOTTOM_CLASS: &str = "ss-fixed-bottom";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinState {
    Unpinned,
    PinnedTop,
    PinnedBottom,
}

/// Direction of the last observed scroll step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    #[default]
    Still,
    Up,
    Down,
}

/// Document-relative geometry of the sidebar's container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerBox {
    pub node: NodeKey,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerBox {
    /// Measure `node` against the current scroll position.
    ///
    /// # Errors
    /// Returns an error if the host has no layout box for `node`.
    pub fn measure<D: HostDocument + ?Sized>(document: &D, node: NodeKey) -> Result<Self> {
        let rect = document
            .document_rect(node)
            .ok_or_else(|| anyhow!("container {node} has no layout box"))?;
        Ok(Self {
            node,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        })
    }
}

/// Sticky behavior for one sidebar element.
pub struct StickySidebar<D: HostDocument> {
    document: D,
    sidebar: NodeKey,
    container: ContainerBox,
    mode: Mode,
    gate: Option<WidthRange>,
    /// Whether the viewport is inside the gate (always true without a gate).
    enabled: bool,
    remeasure_on_resize: bool,
    specs: MarginSpecs,
    margins: Margins,
    /// Inline style from before the current pin episode.
    saved_style: Option<InlineStyle>,
    last_scroll: Option<f64>,
    direction: ScrollDirection,
    scroll_throttle: Throttle,
    resize_throttle: Throttle,
}

impl<D: HostDocument> StickySidebar<D> {
    /// Attach to the sidebar selected by `options.el` using the default config.
    ///
    /// # Errors
    /// See [`StickySidebar::with_config`].
    pub fn new(document: D, options: StickyOptions) -> Result<Self> {
        Self::with_config(document, options, &StickyConfig::default())
    }

    /// Attach to the sidebar, capture its container, resolve margins and run
    /// the initial evaluation.
    ///
    /// # Errors
    /// Returns an error if no element matches `options.el`, if the sidebar has
    /// no parent element, or if the parent has no layout box.
    pub fn with_config(document: D, options: StickyOptions, config: &StickyConfig) -> Result<Self> {
        let sidebar = document
            .query_selector(&options.el)
            .ok_or_else(|| anyhow!("no element matches sidebar selector `{}`", options.el))?;
        let container_node = document
            .parent_of(sidebar)
            .ok_or_else(|| anyhow!("sidebar `{}` has no parent element", options.el))?;
        let container = ContainerBox::measure(&document, container_node)
            .with_context(|| format!("measuring container of `{}`", options.el))?;
        let specs = options.margin_specs();
        let margins = specs.resolve(&document);
        debug!(
            "sticky `{}`: mode {}, container {:?}, margins {:?}",
            options.el, options.mode, container, margins
        );

        let mut controller = Self {
            document,
            sidebar,
            container,
            mode: options.mode,
            gate: options.on_media_query,
            enabled: true,
            remeasure_on_resize: options.remeasure_on_resize,
            specs,
            margins,
            saved_style: None,
            last_scroll: None,
            direction: ScrollDirection::Still,
            scroll_throttle: Throttle::new(config.throttle_window()),
            resize_throttle: Throttle::new(config.throttle_window()),
        };
        controller.on_scroll();
        if controller.gate.is_some() {
            controller.on_resize();
        }
        Ok(controller)
    }

    pub const fn document(&self) -> &D {
        &self.document
    }

    /// Mutable access to the host, e.g. to feed layout or scroll updates.
    pub const fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub const fn sidebar(&self) -> NodeKey {
        self.sidebar
    }

    pub const fn container(&self) -> &ContainerBox {
        &self.container
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn margins(&self) -> Margins {
        self.margins
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn scroll_direction(&self) -> ScrollDirection {
        self.direction
    }

    /// Current pin state as recorded by the marker classes.
    pub fn pin_state(&self) -> PinState {
        if self.document.has_class(self.sidebar, FIXED_TOP_CLASS) {
            PinState::PinnedTop
        } else if self.document.has_class(self.sidebar, FIXED_BOTTOM_CLASS) {
            PinState::PinnedBottom
        } else {
            PinState::Unpinned
        }
    }

    /// Feed a page event through its throttle. Returns true if it was handled.
    pub fn handle(&mut self, event: PageEvent) -> bool {
        self.handle_at(event, Instant::now())
    }

    /// Same as [`StickySidebar::handle`] with an explicit clock reading.
    pub fn handle_at(&mut self, event: PageEvent, now: Instant) -> bool {
        match event {
            PageEvent::Scroll => {
                if !self.scroll_throttle.allow_at(now) {
                    return false;
                }
                self.on_scroll();
            }
            PageEvent::Resize => {
                // Without a gate nothing listens for resize.
                if self.gate.is_none() || !self.resize_throttle.allow_at(now) {
                    return false;
                }
                self.on_resize();
            }
        }
        true
    }

    /// Re-evaluate the pin state for the current scroll offset.
    pub fn on_scroll(&mut self) {
        let scroll = self.document.scroll_offset().y;
        self.track_direction(scroll);
        if !self.enabled {
            return;
        }
        match self.mode {
            Mode::Top => self.evaluate_top(scroll),
            Mode::Scroll | Mode::Bottom => {}
        }
    }

    /// Re-check the width gate and re-evaluate. No-op without a gate.
    pub fn on_resize(&mut self) {
        let Some(gate) = self.gate else {
            return;
        };
        if self.remeasure_on_resize {
            self.remeasure_container();
        }
        let width = self.document.viewport_width();
        let inside = gate.contains(width);
        if inside && !self.enabled {
            debug!("viewport width {width} entered {gate}, enabling");
            self.enabled = true;
            self.on_scroll();
        } else if !inside && self.enabled {
            debug!("viewport width {width} left {gate}, disabling");
            self.enabled = false;
            self.reset_pin();
        } else {
            self.reset_pin();
            self.on_scroll();
        }
    }

    /// Replace the top margin source (if given) and recompute it.
    pub fn set_top_margin(&mut self, spec: Option<MarginSpec>) -> f64 {
        if let Some(spec) = spec {
            self.specs.top = spec;
        }
        self.margins.top = clamped(&self.document, &self.specs.top);
        self.margins.top
    }

    /// Replace the bottom margin source (if given) and recompute it.
    pub fn set_bottom_margin(&mut self, spec: Option<MarginSpec>) -> f64 {
        if let Some(spec) = spec {
            self.specs.bottom = spec;
        }
        self.margins.bottom = clamped(&self.document, &self.specs.bottom);
        self.margins.bottom
    }

    /// Replace the before margin source (if given) and recompute it.
    pub fn set_before_margin(&mut self, spec: Option<MarginSpec>) -> f64 {
        if let Some(spec) = spec {
            self.specs.before = spec;
        }
        self.margins.before = clamped(&self.document, &self.specs.before);
        self.margins.before
    }

    /// Replace the after margin source (if given) and recompute it.
    pub fn set_after_margin(&mut self, spec: Option<MarginSpec>) -> f64 {
        if let Some(spec) = spec {
            self.specs.after = spec;
        }
        self.margins.after = clamped(&self.document, &self.specs.after);
        self.margins.after
    }

    /// Recompute all four margins from their current sources.
    pub fn recompute_margins(&mut self) -> Margins {
        self.margins = self.specs.resolve(&self.document);
        self.margins
    }

    fn remeasure_container(&mut self) {
        match ContainerBox::measure(&self.document, self.container.node) {
            Ok(container) => self.container = container,
            Err(err) => debug!("keeping previous container box: {err}"),
        }
    }

    fn track_direction(&mut self, scroll: f64) {
        let previous = self.last_scroll.unwrap_or(0.0);
        self.direction = if scroll > previous {
            ScrollDirection::Down
        } else if scroll < previous {
            ScrollDirection::Up
        } else {
            ScrollDirection::Still
        };
        self.last_scroll = Some(scroll);
    }

    fn evaluate_top(&mut self, scroll: f64) {
        let document_height = self.document.document_height();
        let sidebar_height = self.document.client_height(self.sidebar).unwrap_or(0.0);
        let Margins {
            top,
            bottom,
            before,
            after,
        } = self.margins;

        // Nothing to travel through.
        if sidebar_height >= document_height - before - after {
            trace!("sidebar {sidebar_height}px does not fit document {document_height}px");
            return;
        }

        let pin_from = self.container.y - top;
        let bottom_offset = document_height - bottom - sidebar_height;

        if scroll >= pin_from && scroll + top < bottom_offset && !self.has_marker(FIXED_TOP_CLASS)
        {
            self.pin_top();
        }
        if scroll < pin_from && self.has_marker(FIXED_TOP_CLASS) {
            self.reset_pin();
        }
        if scroll + top >= bottom_offset && !self.has_marker(FIXED_BOTTOM_CLASS) {
            self.pin_bottom(bottom_offset);
        }
    }

    fn has_marker(&self, class: &str) -> bool {
        self.document.has_class(self.sidebar, class)
    }

    fn pin_top(&mut self) {
        debug!("pinning {} to top at {}px", self.sidebar, self.margins.top);
        self.document.remove_class(self.sidebar, FIXED_BOTTOM_CLASS);
        self.document.add_class(self.sidebar, FIXED_TOP_CLASS);
        let style = self.pinned_style(Position::Fixed, self.margins.top);
        self.document.set_inline_style(self.sidebar, style);
    }

    fn pin_bottom(&mut self, offset: f64) {
        debug!("pinning {} to bottom at {offset}px", self.sidebar);
        self.document.remove_class(self.sidebar, FIXED_TOP_CLASS);
        self.document.add_class(self.sidebar, FIXED_BOTTOM_CLASS);
        let style = self.pinned_style(Position::Absolute, offset);
        self.document.set_inline_style(self.sidebar, style);
    }

    /// Clear both markers and put the original inline style back.
    fn reset_pin(&mut self) {
        self.document.remove_class(self.sidebar, FIXED_TOP_CLASS);
        self.document.remove_class(self.sidebar, FIXED_BOTTOM_CLASS);
        if let Some(original) = self.saved_style.take() {
            debug!("restoring {} style `{original}`", self.sidebar);
            self.document.set_inline_style(self.sidebar, original);
        }
    }

    /// Build the pinned style on top of the original, saving the original
    /// first if this is the first mutation since the last restore.
    fn pinned_style(&mut self, position: Position, top: f64) -> InlineStyle {
        let original = self
            .saved_style
            .get_or_insert_with(|| self.document.inline_style(self.sidebar));
        let mut style = original.clone();
        style.set("position", position.as_str());
        style.set("width", format_px(self.container.width));
        style.set("top", format_px(top));
        style
    }
}
