//! ARIA roles used by the widgets

use fos_dom::{DomTree, NodeId};

/// ARIA role subset the widgets read or write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    Tab,
    TabList,
    TabPanel,
    Dialog,
    AlertDialog,
    Heading,
}

impl AriaRole {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "tab" => Self::Tab,
            "tablist" => Self::TabList,
            "tabpanel" => Self::TabPanel,
            "dialog" => Self::Dialog,
            "alertdialog" => Self::AlertDialog,
            "heading" => Self::Heading,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tab => "tab",
            Self::TabList => "tablist",
            Self::TabPanel => "tabpanel",
            Self::Dialog => "dialog",
            Self::AlertDialog => "alertdialog",
            Self::Heading => "heading",
        }
    }

    /// Explicit role of an element
    pub fn of(tree: &DomTree, id: NodeId) -> Option<Self> {
        tree.get_attribute(id, "role").and_then(Self::parse)
    }

    pub fn is_dialog(&self) -> bool {
        matches!(self, Self::Dialog | Self::AlertDialog)
    }
}

/// Element acts as a heading: `h1`-`h6` or `role="heading"`
pub fn is_heading(tree: &DomTree, id: NodeId) -> bool {
    matches!(tree.tag_name(id), Some("h1" | "h2" | "h3" | "h4" | "h5" | "h6"))
        || AriaRole::of(tree, id) == Some(AriaRole::Heading)
}

/// ARIA boolean attribute value
pub fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
