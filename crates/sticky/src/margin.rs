//! Margin sources and their resolution against the host document.
//!
//! A margin is described once, when options are decoded, as a [`MarginSpec`]
//! tree. Resolving walks that tree and sums pixel contributions; element
//! contributions use the element's rendered box height (client height plus
//! computed top and bottom margins). Missing elements contribute nothing.

use dom::{HostDocument, NodeKey};
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Source of a reserved margin.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MarginSpec {
    /// Literal pixels.
    Px(f64),
    /// First element matching a selector.
    Selector(String),
    /// Sum of every member.
    List(Vec<MarginSpec>),
    /// Sum of every value; keys are labels only.
    Map(BTreeMap<String, MarginSpec>),
    /// Any other value; contributes nothing.
    Other(Value),
    /// A known element.
    #[serde(skip)]
    Element(NodeKey),
}

impl Default for MarginSpec {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

impl From<f64> for MarginSpec {
    fn from(pixels: f64) -> Self {
        Self::Px(pixels)
    }
}

impl From<&str> for MarginSpec {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_owned())
    }
}

impl From<NodeKey> for MarginSpec {
    fn from(node: NodeKey) -> Self {
        Self::Element(node)
    }
}

impl<T: Into<Self>> From<Vec<T>> for MarginSpec {
    fn from(members: Vec<T>) -> Self {
        Self::List(members.into_iter().map(Into::into).collect())
    }
}

/// Sum the pixel contribution of `spec`.
pub fn resolve_margin<D>(document: &D, spec: &MarginSpec) -> f64
where
    D: HostDocument + ?Sized,
{
    match spec {
        MarginSpec::Px(pixels) => *pixels,
        MarginSpec::Selector(selector) => {
            let Some(node) = document.query_selector(selector) else {
                debug!("margin selector `{selector}` matched nothing");
                return 0.0;
            };
            document.outer_height(node).unwrap_or(0.0)
        }
        MarginSpec::Element(node) => document.outer_height(*node).unwrap_or_else(|| {
            debug!("margin element {node} has no layout box");
            0.0
        }),
        MarginSpec::List(members) => members
            .iter()
            .map(|member| resolve_margin(document, member))
            .sum(),
        MarginSpec::Map(members) => members
            .values()
            .map(|member| resolve_margin(document, member))
            .sum(),
        MarginSpec::Other(value) => {
            debug!("ignoring margin source of unsupported type: {value}");
            0.0
        }
    }
}

/// The four margin sources a controller keeps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarginSpecs {
    /// Space reserved at the top of the viewport.
    pub top: MarginSpec,
    /// Space reserved at the bottom of the viewport.
    pub bottom: MarginSpec,
    /// Document space before the container.
    pub before: MarginSpec,
    /// Document space after the container.
    pub after: MarginSpec,
}

impl MarginSpecs {
    pub fn resolve<D>(&self, document: &D) -> Margins
    where
        D: HostDocument + ?Sized,
    {
        Margins {
            top: clamped(document, &self.top),
            bottom: clamped(document, &self.bottom),
            before: clamped(document, &self.before),
            after: clamped(document, &self.after),
        }
    }
}

/// Resolved margins in pixels, each at least zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub before: f64,
    pub after: f64,
}

pub(crate) fn clamped<D>(document: &D, spec: &MarginSpec) -> f64
where
    D: HostDocument + ?Sized,
{
    resolve_margin(document, spec).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use dom::{DOMUpdate, MemoryDocument, Rect, VerticalMargins};

    fn document_with_header() -> Result<MemoryDocument> {
        let mut doc = MemoryDocument::new();
        doc.apply_all([
            DOMUpdate::InsertElement {
                parent: NodeKey::ROOT,
                node: NodeKey(1),
                tag: "header".to_owned(),
                pos: 0,
            },
            DOMUpdate::SetAttr {
                node: NodeKey(1),
                name: "id".to_owned(),
                value: "header".to_owned(),
            },
            DOMUpdate::SetLayout {
                node: NodeKey(1),
                rect: Rect::new(0.0, 0.0, 1024.0, 30.0),
                client_height: 30.0,
            },
            DOMUpdate::SetMargins {
                node: NodeKey(1),
                margins: VerticalMargins {
                    top: 4.0,
                    bottom: 6.0,
                },
            },
        ])?;
        Ok(doc)
    }

    #[test]
    fn nested_collections_are_summed() -> Result<()> {
        let doc = document_with_header()?;
        let spec: MarginSpec = serde_json::from_str(r##"[50, "#header", {"a": 20, "b": 30}]"##)?;
        assert!((resolve_margin(&doc, &spec) - 140.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn unsupported_members_contribute_zero() -> Result<()> {
        let doc = document_with_header()?;
        let spec: MarginSpec = serde_json::from_str(r##"[50, true, null, {"flag": false}]"##)?;
        assert_eq!(
            spec,
            MarginSpec::List(vec![
                MarginSpec::Px(50.0),
                MarginSpec::Other(Value::Bool(true)),
                MarginSpec::Other(Value::Null),
                MarginSpec::Map(BTreeMap::from([(
                    "flag".to_owned(),
                    MarginSpec::Other(Value::Bool(false)),
                )])),
            ])
        );
        assert!((resolve_margin(&doc, &spec) - 50.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn unresolved_sources_contribute_zero() -> Result<()> {
        let doc = document_with_header()?;
        let spec = MarginSpec::List(vec![
            MarginSpec::from("#missing"),
            MarginSpec::Element(NodeKey(42)),
            MarginSpec::from(12.0),
        ]);
        assert!((resolve_margin(&doc, &spec) - 12.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn element_reference_uses_box_height() -> Result<()> {
        let doc = document_with_header()?;
        let spec = MarginSpec::from(NodeKey(1));
        assert!((resolve_margin(&doc, &spec) - 40.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn negative_totals_clamp_to_zero() -> Result<()> {
        let doc = document_with_header()?;
        let specs = MarginSpecs {
            top: MarginSpec::from(-25.0),
            bottom: MarginSpec::from(vec![-10.0, 15.0]),
            ..MarginSpecs::default()
        };
        let margins = specs.resolve(&doc);
        assert!(margins.top.abs() < f64::EPSILON);
        assert!((margins.bottom - 5.0).abs() < f64::EPSILON);
        Ok(())
    }
}
