//! Inline style declarations as found in an element's `style` attribute.
//!
//! Only the declaration list is modelled: names are lowercased, values are
//! kept verbatim, and the order of first appearance is preserved so that a
//! saved style serializes back to what the page authored.

use core::fmt;

/// CSS `position` keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

impl Position {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Relative => "relative",
            Self::Absolute => "absolute",
            Self::Fixed => "fixed",
            Self::Sticky => "sticky",
        }
    }

    /// Parse a `position` value (ASCII case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "static" => Some(Self::Static),
            "relative" => Some(Self::Relative),
            "absolute" => Some(Self::Absolute),
            "fixed" => Some(Self::Fixed),
            "sticky" => Some(Self::Sticky),
            _ => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Format a pixel length the way the CSSOM serializes it (`2350px`, `20.5px`).
pub fn format_px(value: f64) -> String {
    format!("{value}px")
}

/// Ordered list of inline declarations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub const fn new() -> Self {
        Self {
            declarations: Vec::new(),
        }
    }

    /// Parse a `style` attribute. Malformed declarations are skipped.
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self::new();
        for declaration in css_text.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }
            style.set(name, value);
        }
        style
    }

    /// Value of the declaration named `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        let needle = name.to_ascii_lowercase();
        self.declarations
            .iter()
            .find(|(existing, _)| *existing == needle)
            .map(|(_, value)| value.as_str())
    }

    /// Typed view of the `position` declaration.
    pub fn position(&self) -> Option<Position> {
        self.get("position").and_then(Position::parse)
    }

    /// Set a declaration, replacing an existing one in place.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        if let Some(slot) = self
            .declarations
            .iter_mut()
            .find(|(existing, _)| *existing == name)
        {
            slot.1 = value;
        } else {
            self.declarations.push((name, value));
        }
    }

    /// Remove a declaration and return its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let needle = name.to_ascii_lowercase();
        let index = self
            .declarations
            .iter()
            .position(|(existing, _)| *existing == needle)?;
        Some(self.declarations.remove(index).1)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Serialize back to `name: value; name: value` form.
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.css_text())
    }
}
