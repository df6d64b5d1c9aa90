//! fOS DOM - Document Object Model
//!
//! Arena-based DOM tree with the focus, interactivity and event plumbing
//! the accessible widgets are built on.

mod document;
mod error;
mod events;
mod focus;
mod interner;
mod listeners;
mod node;
mod tree;

pub use document::Document;
pub use error::{DomError, DomResult};
pub use events::{DomEvent, ListenerId};
pub use focus::{TabIndex, is_natively_focusable};
pub use interner::{InternedString, StringInterner};
pub use listeners::{ListenKind, ListenerRegistry, Subscription};
pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::{Ancestors, Children, Descendants, DomTree};

use std::fmt;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
