//! Widget configuration
//!
//! Accordion and dialog options come from presence-based flags on the
//! container (`multiple`, or `data-multiple`). Host-wide defaults live in
//! `HostConfig`.

use fos_dom::{DomTree, NodeId};

/// Presence-based flag, bare or `data-` prefixed
pub(crate) fn flag(tree: &DomTree, id: NodeId, name: &str) -> bool {
    tree.has_attribute(id, name) || tree.has_attribute(id, &format!("data-{name}"))
}

fn value<'a>(tree: &'a DomTree, id: NodeId, name: &str) -> Option<&'a str> {
    tree.get_attribute(id, name)
        .or_else(|| tree.get_attribute(id, &format!("data-{name}")))
}

/// Accordion options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccordionConfig {
    /// Panels start expanded
    pub expanded: bool,
    /// Several panels may be open at once
    pub multiple: bool,
    /// Roving focus wraps at the first and last heading
    pub wrap_focus: bool,
}

impl AccordionConfig {
    /// Read `expanded`, `multiple` and `wrap-focus` from a container
    pub fn from_element(tree: &DomTree, container: NodeId) -> Self {
        Self {
            expanded: flag(tree, container, "expanded"),
            multiple: flag(tree, container, "multiple"),
            wrap_focus: flag(tree, container, "wrap-focus"),
        }
    }
}

/// Dialog trapping mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogMode {
    /// Traps focus and locks page scrolling while open
    #[default]
    Modal,
    /// Leaves the page interactive
    Modeless,
}

/// How a modal dialog makes the rest of the page unreachable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrapStrategy {
    /// Mark the siblings of every ancestor `inert`
    #[default]
    Inert,
    /// Pull every outside element out of the tab order on the next
    /// macrotask and intercept outside pointer-downs
    TabOrder,
}

impl TrapStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inert" => Some(Self::Inert),
            "tabindex" | "tab-order" => Some(Self::TabOrder),
            _ => None,
        }
    }
}

/// Dialog options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogConfig {
    pub mode: DialogMode,
    /// Escape closes the dialog
    pub close_on_escape: bool,
    pub trap: TrapStrategy,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            mode: DialogMode::Modal,
            close_on_escape: true,
            trap: TrapStrategy::Inert,
        }
    }
}

impl DialogConfig {
    /// Read `modeless`, `no-escape` and `trap` from a container
    pub fn from_element(tree: &DomTree, container: NodeId, default_trap: TrapStrategy) -> Self {
        Self {
            mode: if flag(tree, container, "modeless") {
                DialogMode::Modeless
            } else {
                DialogMode::Modal
            },
            close_on_escape: !flag(tree, container, "no-escape"),
            trap: value(tree, container, "trap")
                .and_then(TrapStrategy::parse)
                .unwrap_or(default_trap),
        }
    }

    pub fn is_modal(&self) -> bool {
        self.mode == DialogMode::Modal
    }
}

/// Host-wide configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Prefix for every generated element id
    pub id_prefix: String,
    /// Trap strategy for dialogs whose container does not pick one
    pub default_trap: TrapStrategy,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            id_prefix: "fos".to_string(),
            default_trap: TrapStrategy::Inert,
        }
    }
}
