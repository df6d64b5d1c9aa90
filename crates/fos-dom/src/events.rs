//! DOM Events
//!
//! Custom notification events. An event is dispatched at a target and
//! bubbles through its ancestors up to the document node.

use crate::NodeId;

/// Handle for an element-level event listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// DOM event
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    /// Event name, e.g. `expanded`
    pub event_type: String,
    /// Node the event was dispatched at
    pub target: NodeId,
    /// Node whose listeners are currently running
    pub current_target: Option<NodeId>,
    /// Element carried as payload
    pub detail: Option<NodeId>,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl DomEvent {
    /// Bubbling, non-cancelable custom event carrying an element payload
    pub fn custom(event_type: &str, target: NodeId, detail: Option<NodeId>) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: None,
            detail,
            bubbles: true,
            cancelable: false,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Builder: make the event cancelable
    pub fn cancelable(mut self) -> Self {
        self.cancelable = true;
        self
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prevent_default_requires_cancelable() {
        let mut event = DomEvent::custom("opened", NodeId(3), Some(NodeId(3)));
        event.prevent_default();
        assert!(!event.is_default_prevented());

        let mut event = event.cancelable();
        event.prevent_default();
        assert!(event.is_default_prevented());
        assert!(event.bubbles);
    }
}
