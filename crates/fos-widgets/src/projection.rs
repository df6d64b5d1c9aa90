//! Writing widget state back into the DOM
//!
//! Attributes are a projection of the typed widget state. Writes target nodes
//! that were validated at enhancement, so a failure only means the node went
//! away; it is logged and skipped.

use fos_dom::{Document, DomEvent, NodeId};

use crate::aria::bool_attr;

pub(crate) fn set(doc: &mut Document, id: NodeId, name: &str, value: &str) {
    if let Err(err) = doc.tree_mut().set_attribute(id, name, value) {
        tracing::warn!(%err, attribute = name, "projection skipped");
    }
}

pub(crate) fn set_bool(doc: &mut Document, id: NodeId, name: &str, value: bool) {
    set(doc, id, name, bool_attr(value));
}

pub(crate) fn remove(doc: &mut Document, id: NodeId, name: &str) {
    if let Err(err) = doc.tree_mut().remove_attribute(id, name) {
        tracing::warn!(%err, attribute = name, "projection skipped");
    }
}

/// Put an attribute back to a recorded value (`None` = absent)
pub(crate) fn restore(doc: &mut Document, id: NodeId, name: &str, value: Option<&str>) {
    if let Err(err) = doc.tree_mut().restore_attribute(id, name, value) {
        tracing::warn!(%err, attribute = name, "restore skipped");
    }
}

/// Widget notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    Expanded,
    Collapsed,
    Focused,
    Blurred,
    Opened,
    Closed,
}

impl Notification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expanded => "expanded",
            Self::Collapsed => "collapsed",
            Self::Focused => "focused",
            Self::Blurred => "blurred",
            Self::Opened => "opened",
            Self::Closed => "closed",
        }
    }
}

/// Dispatch a bubbling notification carrying `detail`
pub(crate) fn emit(doc: &mut Document, kind: Notification, target: NodeId, detail: NodeId) {
    doc.dispatch_event(DomEvent::custom(kind.as_str(), target, Some(detail)));
}
