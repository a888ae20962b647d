#![allow(clippy::excessive_nesting, reason = "Recursive tree walks")]
//! A headless document mirror for hosts without a real layout engine.
//!
//! The mirror applies `DOMUpdate` batches and keeps just enough state to
//! answer [`HostDocument`] queries: tree shape, id and class tokens, layout
//! boxes fed by the host, inline styles, viewport and scroll position.

use crate::{
    DOMSubscriber, DOMUpdate, DocumentMetrics, HostDocument, InlineStyle, NodeKey, Rect,
    ScrollOffset, VerticalMargins,
};
use anyhow::{Result, anyhow};
use log::debug;
use std::collections::{HashMap, HashSet};

/// In-memory `HostDocument` built from `DOMUpdate` batches.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    /// Map node -> tag name, lowercase.
    tag_by_key: HashMap<NodeKey, String>,
    /// Map node -> id attribute.
    id_by_key: HashMap<NodeKey, String>,
    /// Map node -> class tokens.
    classes_by_key: HashMap<NodeKey, HashSet<String>>,
    children_by_parent: HashMap<NodeKey, Vec<NodeKey>>,
    parent_by_child: HashMap<NodeKey, NodeKey>,
    id_index: HashMap<String, NodeKey>,
    /// Document-relative border boxes.
    rects: HashMap<NodeKey, Rect>,
    client_heights: HashMap<NodeKey, f64>,
    margins: HashMap<NodeKey, VerticalMargins>,
    styles: HashMap<NodeKey, InlineStyle>,
    viewport_width: f64,
    viewport_height: f64,
    scroll: ScrollOffset,
    metrics: DocumentMetrics,
    /// Number of `set_inline_style` calls observed.
    style_writes: u64,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a batch of updates in order, stopping at the first failure.
    ///
    /// # Errors
    /// Propagates the first error returned by [`DOMSubscriber::apply_update`].
    pub fn apply_all<I>(&mut self, updates: I) -> Result<()>
    where
        I: IntoIterator<Item = DOMUpdate>,
    {
        for update in updates {
            self.apply_update(update)?;
        }
        Ok(())
    }

    /// Number of inline style writes performed through the host facade.
    pub const fn style_writes(&self) -> u64 {
        self.style_writes
    }

    /// Class tokens of `node`, sorted for stable comparisons.
    pub fn classes_of(&self, node: NodeKey) -> Vec<String> {
        let mut classes: Vec<String> = self
            .classes_by_key
            .get(&node)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        classes.sort();
        classes
    }

    pub const fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn is_known(&self, node: NodeKey) -> bool {
        node == NodeKey::ROOT || self.tag_by_key.contains_key(&node)
    }

    fn ensure_known(&self, node: NodeKey) -> Result<()> {
        if self.is_known(node) {
            Ok(())
        } else {
            Err(anyhow!("update references unknown node {node}"))
        }
    }

    /// Remove a node (and its descendants) from all indices.
    fn remove_recursively(&mut self, node: NodeKey) {
        if let Some(children) = self.children_by_parent.remove(&node) {
            for child in children {
                self.remove_recursively(child);
            }
        }
        if let Some(parent) = self.parent_by_child.remove(&node) {
            if let Some(siblings) = self.children_by_parent.get_mut(&parent) {
                siblings.retain(|sibling| *sibling != node);
            }
        }
        if let Some(id) = self.id_by_key.remove(&node) {
            if self.id_index.get(&id) == Some(&node) {
                self.id_index.remove(&id);
            }
        }
        self.tag_by_key.remove(&node);
        self.classes_by_key.remove(&node);
        self.rects.remove(&node);
        self.client_heights.remove(&node);
        self.margins.remove(&node);
        self.styles.remove(&node);
    }

    fn set_id_for(&mut self, node: NodeKey, value: String) {
        if let Some(old) = self.id_by_key.remove(&node) {
            if self.id_index.get(&old) == Some(&node) {
                self.id_index.remove(&old);
            }
        }
        if !value.is_empty() {
            self.id_by_key.insert(node, value.clone());
            self.id_index.insert(value, node);
        }
    }

    /// Replace class tokens for a node from a whitespace-separated class attribute.
    fn set_classes_for(&mut self, node: NodeKey, class_attr: &str) {
        let set: HashSet<String> = class_attr
            .split_whitespace()
            .map(str::to_owned)
            .collect();
        if set.is_empty() {
            self.classes_by_key.remove(&node);
        } else {
            self.classes_by_key.insert(node, set);
        }
    }

    /// Walk elements in document order and return the first accepted by `matches`.
    fn find_first<F>(&self, matches: F) -> Option<NodeKey>
    where
        F: Fn(NodeKey) -> bool,
    {
        fn walk<F: Fn(NodeKey) -> bool>(
            doc: &MemoryDocument,
            node: NodeKey,
            matches: &F,
        ) -> Option<NodeKey> {
            if node != NodeKey::ROOT && matches(node) {
                return Some(node);
            }
            doc.children_by_parent
                .get(&node)?
                .iter()
                .find_map(|child| walk(doc, *child, matches))
        }
        walk(self, NodeKey::ROOT, &matches)
    }
}

impl DOMSubscriber for MemoryDocument {
    fn apply_update(&mut self, update: DOMUpdate) -> Result<()> {
        use DOMUpdate::*;
        match update {
            InsertElement {
                parent,
                node,
                tag,
                pos,
            } => {
                self.ensure_known(parent)?;
                self.parent_by_child.insert(node, parent);
                let siblings = self.children_by_parent.entry(parent).or_default();
                if !siblings.contains(&node) {
                    let index = pos.min(siblings.len());
                    siblings.insert(index, node);
                }
                self.tag_by_key.insert(node, tag.to_ascii_lowercase());
            }
            SetAttr { node, name, value } => {
                self.ensure_known(node)?;
                match name.to_ascii_lowercase().as_str() {
                    "id" => self.set_id_for(node, value),
                    "class" => self.set_classes_for(node, &value),
                    "style" => {
                        self.styles.insert(node, InlineStyle::parse(&value));
                    }
                    _ => {}
                }
            }
            RemoveNode { node } => {
                self.ensure_known(node)?;
                self.remove_recursively(node);
            }
            SetLayout {
                node,
                rect,
                client_height,
            } => {
                self.ensure_known(node)?;
                self.rects.insert(node, rect);
                self.client_heights.insert(node, client_height);
            }
            SetMargins { node, margins } => {
                self.ensure_known(node)?;
                self.margins.insert(node, margins);
            }
            SetViewport { width, height } => {
                self.viewport_width = width;
                self.viewport_height = height;
            }
            SetScroll { offset } => {
                self.scroll = offset;
            }
            SetDocumentMetrics { metrics } => {
                self.metrics = metrics;
            }
        }
        Ok(())
    }
}

impl HostDocument for MemoryDocument {
    /// Supports a single simple selector: `#id`, `.class` or a tag name.
    fn query_selector(&self, selector: &str) -> Option<NodeKey> {
        let selector = selector.trim();
        if selector.is_empty()
            || selector.contains(|ch: char| {
                ch.is_whitespace() || matches!(ch, '>' | '+' | '~' | '[' | ':' | ',')
            })
        {
            debug!("unsupported selector `{selector}`");
            return None;
        }
        if let Some(id) = selector.strip_prefix('#') {
            return self.id_index.get(id).copied();
        }
        if let Some(class) = selector.strip_prefix('.') {
            return self.find_first(|node| {
                self.classes_by_key
                    .get(&node)
                    .is_some_and(|classes| classes.contains(class))
            });
        }
        let tag = selector.to_ascii_lowercase();
        self.find_first(|node| self.tag_by_key.get(&node) == Some(&tag))
    }

    fn parent_of(&self, node: NodeKey) -> Option<NodeKey> {
        self.parent_by_child
            .get(&node)
            .copied()
            .filter(|parent| *parent != NodeKey::ROOT)
    }

    fn bounding_client_rect(&self, node: NodeKey) -> Option<Rect> {
        self.rects
            .get(&node)
            .map(|rect| rect.translate(-self.scroll.x, -self.scroll.y))
    }

    fn client_height(&self, node: NodeKey) -> Option<f64> {
        self.client_heights.get(&node).copied()
    }

    fn computed_margins(&self, node: NodeKey) -> Option<VerticalMargins> {
        if !self.tag_by_key.contains_key(&node) {
            return None;
        }
        Some(self.margins.get(&node).copied().unwrap_or_default())
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn scroll_offset(&self) -> ScrollOffset {
        self.scroll
    }

    fn document_height(&self) -> f64 {
        self.metrics.document_height()
    }

    fn inline_style(&self, node: NodeKey) -> InlineStyle {
        self.styles.get(&node).cloned().unwrap_or_default()
    }

    fn set_inline_style(&mut self, node: NodeKey, style: InlineStyle) {
        self.style_writes = self.style_writes.saturating_add(1);
        if style.is_empty() {
            self.styles.remove(&node);
        } else {
            self.styles.insert(node, style);
        }
    }

    fn has_class(&self, node: NodeKey, class: &str) -> bool {
        self.classes_by_key
            .get(&node)
            .is_some_and(|classes| classes.contains(class))
    }

    fn add_class(&mut self, node: NodeKey, class: &str) {
        self.classes_by_key
            .entry(node)
            .or_default()
            .insert(class.to_owned());
    }

    fn remove_class(&mut self, node: NodeKey, class: &str) {
        if let Some(classes) = self.classes_by_key.get_mut(&node) {
            classes.remove(class);
            if classes.is_empty() {
                self.classes_by_key.remove(&node);
            }
        }
    }
}
