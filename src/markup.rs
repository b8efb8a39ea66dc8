//! Declarative description of the page mutations the layer performs.
//!
//! Handlers never touch a DOM directly. They describe new elements with
//! [`ElementSpec`] and changes to existing ones with [`Patch`], and the
//! [`Host`](crate::host::Host) decides how to attach them. Tests inspect the
//! resulting structure instead of simulating a rendering engine.

#[cfg(test)]
#[path = "markup_test.rs"]
mod markup_test;

use std::fmt;

/// Opaque handle to an element owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a newly created element is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// The page root (`<body>`).
    Root,
    /// The document head.
    Head,
    /// An existing element.
    Node(NodeId),
}

/// Ordered list of inline style declarations.
///
/// Later declarations for the same property replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    decls: Vec<(&'static str, String)>,
}

impl InlineStyle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a declaration.
    #[must_use]
    pub fn with(mut self, property: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        if let Some(slot) = self.decls.iter_mut().find(|(p, _)| *p == property) {
            slot.1 = value;
        } else {
            self.decls.push((property, value));
        }
        self
    }

    /// Add a declaration only when `value` is present.
    #[must_use]
    pub fn with_opt(self, property: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.with(property, v),
            None => self,
        }
    }

    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.decls.iter().find(|(p, _)| *p == property).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.decls.iter().map(|(p, v)| (*p, v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

/// A new element to create and attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpec {
    pub tag: &'static str,
    pub class: Option<&'static str>,
    pub text: Option<String>,
    pub attributes: Vec<(&'static str, String)>,
    pub style: InlineStyle,
}

impl ElementSpec {
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self { tag, class: None, text: None, attributes: Vec::new(), style: InlineStyle::new() }
    }

    #[must_use]
    pub fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn attribute(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn style(mut self, style: InlineStyle) -> Self {
        self.style = style;
        self
    }
}

/// A change to an existing element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    AddClass { node: NodeId, class: &'static str },
    RemoveClass { node: NodeId, class: &'static str },
    ToggleClass { node: NodeId, class: &'static str },
    SetAttribute { node: NodeId, name: &'static str, value: String },
    RemoveAttribute { node: NodeId, name: &'static str },
    SetText { node: NodeId, text: String },
    /// Apply every declaration of `style` on top of the element's inline style.
    SetStyle { node: NodeId, style: InlineStyle },
    /// Clear the listed properties back to the stylesheet default.
    ClearStyle { node: NodeId, properties: &'static [&'static str] },
    Remove { node: NodeId },
}

impl Patch {
    /// The element the patch targets.
    #[must_use]
    pub fn node(&self) -> NodeId {
        match self {
            Self::AddClass { node, .. }
            | Self::RemoveClass { node, .. }
            | Self::ToggleClass { node, .. }
            | Self::SetAttribute { node, .. }
            | Self::RemoveAttribute { node, .. }
            | Self::SetText { node, .. }
            | Self::SetStyle { node, .. }
            | Self::ClearStyle { node, .. }
            | Self::Remove { node } => *node,
        }
    }
}
