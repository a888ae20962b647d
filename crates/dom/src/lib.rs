//! Host document primitives shared by page behaviors.
//!
//! This crate centralizes the small set of layout and style operations a page
//! behavior needs from the document it runs in: selector lookup, element
//! geometry, computed margins, inline style access and class markers. Real
//! hosts implement [`HostDocument`]; headless hosts and tests use
//! [`MemoryDocument`], which mirrors a DOM from batches of [`DOMUpdate`].

use anyhow::Result;
use core::fmt;

/// In-memory document mirror driven by `DOMUpdate` batches.
pub mod memory;
pub use memory::MemoryDocument;

/// Inline style declarations (`style="..."` attribute contents).
pub mod style;
pub use style::{InlineStyle, Position, format_px};

// ============================
// Stable Node keys
// ============================

/// A 64-bit stable key for DOM nodes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeKey(pub u64);

impl NodeKey {
    /// The document node key (always present).
    pub const ROOT: Self = Self(0);
}

impl fmt::Display for NodeKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

// ============================
// Geometry
// ============================

/// An axis-aligned box in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Return a copy moved by the given deltas.
    #[inline]
    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Current scroll position of the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

/// Computed vertical margins of an element, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VerticalMargins {
    pub top: f64,
    pub bottom: f64,
}

/// Height candidates for the scrollable document.
///
/// Browsers disagree on which of these carries the real document height
/// depending on box-sizing and overflow, so the largest one wins.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DocumentMetrics {
    pub body_scroll_height: f64,
    pub body_offset_height: f64,
    pub root_client_height: f64,
    pub root_scroll_height: f64,
    pub root_offset_height: f64,
}

impl DocumentMetrics {
    /// All candidates set to the same height.
    pub const fn uniform(height: f64) -> Self {
        Self {
            body_scroll_height: height,
            body_offset_height: height,
            root_client_height: height,
            root_scroll_height: height,
            root_offset_height: height,
        }
    }

    /// Largest candidate across body and root element.
    pub fn document_height(&self) -> f64 {
        [
            self.body_scroll_height,
            self.body_offset_height,
            self.root_client_height,
            self.root_scroll_height,
            self.root_offset_height,
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }
}

// ============================
// DOM Update model + mirror pattern
// ============================

/// A batchable update applied to a document mirror.
#[derive(Debug, Clone)]
pub enum DOMUpdate {
    InsertElement {
        parent: NodeKey,
        node: NodeKey,
        tag: String,
        pos: usize,
    },
    SetAttr {
        node: NodeKey,
        name: String,
        value: String,
    },
    RemoveNode {
        node: NodeKey,
    },
    /// Layout result for an element: document-relative border box and
    /// client height.
    SetLayout {
        node: NodeKey,
        rect: Rect,
        client_height: f64,
    },
    /// Computed vertical margins for an element.
    SetMargins {
        node: NodeKey,
        margins: VerticalMargins,
    },
    SetViewport {
        width: f64,
        height: f64,
    },
    SetScroll {
        offset: ScrollOffset,
    },
    SetDocumentMetrics {
        metrics: DocumentMetrics,
    },
}

/// A subscriber that receives `DOMUpdate` values and mirrors them into its own state.
pub trait DOMSubscriber {
    /// Apply a single `DOMUpdate` to the subscriber state.
    ///
    /// # Errors
    /// Returns an error when the update references a node the subscriber does not know.
    fn apply_update(&mut self, update: DOMUpdate) -> Result<()>;
}

// ============================
// Host document facade
// ============================

/// Layout and style operations a page behavior consumes from its host.
///
/// Geometry getters return `None` for nodes the host does not know; callers
/// treat that as "no contribution" rather than failing.
pub trait HostDocument {
    /// First element matching `selector`, in document order.
    fn query_selector(&self, selector: &str) -> Option<NodeKey>;

    /// Parent element of `node`. The document node itself is not an element.
    fn parent_of(&self, node: NodeKey) -> Option<NodeKey>;

    /// Border box relative to the viewport (`getBoundingClientRect`).
    fn bounding_client_rect(&self, node: NodeKey) -> Option<Rect>;

    fn client_height(&self, node: NodeKey) -> Option<f64>;

    fn computed_margins(&self, node: NodeKey) -> Option<VerticalMargins>;

    fn viewport_width(&self) -> f64;

    fn scroll_offset(&self) -> ScrollOffset;

    /// Scrollable document height, the max of body/root scroll, offset and client heights.
    fn document_height(&self) -> f64;

    fn inline_style(&self, node: NodeKey) -> InlineStyle;

    /// Replace the inline style of `node` in one write.
    fn set_inline_style(&mut self, node: NodeKey, style: InlineStyle);

    fn has_class(&self, node: NodeKey, class: &str) -> bool;

    fn add_class(&mut self, node: NodeKey, class: &str);

    fn remove_class(&mut self, node: NodeKey, class: &str);

    /// Rendered box height: client height plus computed top and bottom margins.
    fn outer_height(&self, node: NodeKey) -> Option<f64> {
        let base = self.client_height(node)?;
        let margins = self.computed_margins(node).unwrap_or_default();
        Some(base + margins.top + margins.bottom)
    }

    /// Border box relative to the document origin.
    fn document_rect(&self, node: NodeKey) -> Option<Rect> {
        let scroll = self.scroll_offset();
        self.bounding_client_rect(node)
            .map(|rect| rect.translate(scroll.x, scroll.y))
    }
}
