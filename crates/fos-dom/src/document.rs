//! Document - High-level document API
//!
//! Wraps the tree with the browser-side state widgets depend on: the focused
//! element, event dispatch and the page-level listener registry.

use std::fmt;

use crate::{
    DomEvent, DomTree, ListenKind, ListenerId, ListenerRegistry, NodeId, Subscription, TabIndex,
    is_natively_focusable,
};

type EventCallback = Box<dyn FnMut(&mut DomEvent)>;

struct EventListener {
    id: ListenerId,
    node: NodeId,
    event_type: String,
    callback: EventCallback,
}

/// HTML Document
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    /// Currently focused element
    focused: Option<NodeId>,
    /// Page-level subscriptions
    listeners: ListenerRegistry,
    event_listeners: Vec<EventListener>,
    next_listener: u64,
    /// Every dispatched event, in dispatch order
    event_log: Vec<DomEvent>,
}

impl Document {
    /// Create a new document with html/head/body
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let tree = &mut doc.tree;

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes cannot fail to attach
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        doc.finalize();
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            focused: None,
            listeners: ListenerRegistry::new(),
            event_listeners: Vec::new(),
            next_listener: 0,
            event_log: Vec::new(),
        }
    }

    /// Locate the html, head and body elements after the tree was built
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        let find = |parent: NodeId, tag: &str| {
            tree.element_children(parent)
                .find(|&id| tree.tag_name(id) == Some(tag))
                .unwrap_or(NodeId::NONE)
        };

        self.html_element = find(tree.root(), "html");
        if self.html_element.is_valid() {
            self.head_element = find(self.html_element, "head");
            self.body_element = find(self.html_element, "body");
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element, falling back to the document node
    pub fn body(&self) -> NodeId {
        if self.body_element.is_valid() {
            self.body_element
        } else {
            self.tree.root()
        }
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .element_descendants(self.tree.root())
            .find(|&n| self.tree.get_attribute(n, "id") == Some(id))
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Focused element, or body when nothing (connected) has focus
    pub fn active_element(&self) -> NodeId {
        match self.focused {
            Some(id) if self.tree.is_connected(id) => id,
            _ => self.body(),
        }
    }

    /// Focused element, if any
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|&id| self.tree.is_connected(id))
    }

    /// Move focus. Returns false (and leaves focus alone) if `id` is not
    /// focusable.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.is_focusable(id) {
            tracing::trace!("focus rejected for {}", id);
            return false;
        }
        tracing::trace!("focus -> {}", id);
        self.focused = Some(id);
        true
    }

    /// Drop focus back to the body
    pub fn blur(&mut self) {
        self.focused = None;
    }

    // ------------------------------------------------------------------
    // Interactivity
    // ------------------------------------------------------------------

    fn self_or_ancestor_has(&self, id: NodeId, attr: &str) -> bool {
        self.tree.has_attribute(id, attr) || self.tree.ancestors(id).any(|a| self.tree.has_attribute(a, attr))
    }

    /// Element or an ancestor carries `inert`
    pub fn is_inert(&self, id: NodeId) -> bool {
        self.self_or_ancestor_has(id, "inert")
    }

    /// Element or an ancestor is hidden (`hidden` attribute or `display: none`)
    pub fn is_hidden(&self, id: NodeId) -> bool {
        std::iter::once(id)
            .chain(self.tree.ancestors(id))
            .any(|n| {
                self.tree.has_attribute(n, "hidden")
                    || self
                        .tree
                        .get_attribute(n, "style")
                        .is_some_and(|s| s.replace(' ', "").contains("display:none"))
            })
    }

    /// Parsed `tabindex` of an element
    pub fn tab_index(&self, id: NodeId) -> Option<TabIndex> {
        self.tree.get_attribute(id, "tabindex").and_then(TabIndex::parse)
    }

    /// Can receive focus, by script at least
    pub fn is_focusable(&self, id: NodeId) -> bool {
        let Some(tag) = self.tree.tag_name(id) else {
            return false;
        };
        if !self.tree.is_connected(id) || self.is_inert(id) || self.is_hidden(id) {
            return false;
        }
        if self.tree.has_attribute(id, "disabled") && is_natively_focusable(tag, false) {
            return false;
        }
        self.tab_index(id).is_some()
            || is_natively_focusable(tag, self.tree.has_attribute(id, "href"))
    }

    /// Reachable with sequential (Tab) navigation
    pub fn is_tabbable(&self, id: NodeId) -> bool {
        if !self.is_focusable(id) {
            return false;
        }
        match self.tab_index(id) {
            Some(t) => t.is_sequential(),
            None => true,
        }
    }

    /// Elements reachable with Tab under `root`, in document order
    pub fn tabbable_elements(&self, root: NodeId) -> Vec<NodeId> {
        self.tree
            .element_descendants(root)
            .filter(|&n| self.is_tabbable(n))
            .collect()
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Add an element-level listener
    pub fn add_event_listener<F>(&mut self, node: NodeId, event_type: &str, callback: F) -> ListenerId
    where
        F: FnMut(&mut DomEvent) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.event_listeners.push(EventListener {
            id,
            node,
            event_type: event_type.to_string(),
            callback: Box::new(callback),
        });
        id
    }

    /// Remove an element-level listener
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        let before = self.event_listeners.len();
        self.event_listeners.retain(|l| l.id != id);
        self.event_listeners.len() != before
    }

    /// Dispatch at `event.target`, bubbling to the document node if the
    /// event bubbles. Returns the event after propagation.
    pub fn dispatch_event(&mut self, mut event: DomEvent) -> DomEvent {
        let mut path = vec![event.target];
        if event.bubbles {
            path.extend(self.tree.ancestors(event.target));
        }

        let event_type = event.event_type.clone();
        for node in path {
            event.current_target = Some(node);
            for listener in self
                .event_listeners
                .iter_mut()
                .filter(|l| l.node == node && l.event_type == event_type)
            {
                (listener.callback)(&mut event);
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
        event.current_target = None;

        tracing::trace!("dispatched '{}' at {}", event.event_type, event.target);
        self.event_log.push(event.clone());
        event
    }

    /// Events dispatched so far
    pub fn dispatched_events(&self) -> &[DomEvent] {
        &self.event_log
    }

    /// Drain the dispatched-event log
    pub fn take_events(&mut self) -> Vec<DomEvent> {
        std::mem::take(&mut self.event_log)
    }

    // ------------------------------------------------------------------
    // Page-level listeners
    // ------------------------------------------------------------------

    /// Subscribe `owner` to page-level input
    pub fn listen(&mut self, owner: NodeId, kinds: &[ListenKind]) -> Subscription {
        self.listeners.listen(owner, kinds)
    }

    /// Release a page-level subscription
    pub fn unlisten(&mut self, subscription: Subscription) -> bool {
        self.listeners.unlisten(subscription)
    }

    pub fn page_listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        self.tree.memory_usage() + self.url.capacity()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.url)
            .field("nodes", &self.tree.len())
            .field("focused", &self.focused)
            .field("page_listeners", &self.listeners.len())
            .field("event_listeners", &self.event_listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_structure() {
        let doc = Document::new("about:blank");
        assert_eq!(doc.tree().tag_name(doc.body()), Some("body"));
        assert_eq!(doc.tree().tag_name(doc.head()), Some("head"));
        assert_eq!(doc.active_element(), doc.body());
    }

    #[test]
    fn test_focus_rules() {
        let mut doc = Document::default();
        let body = doc.body();
        let div = doc.tree.create_element("div");
        let button = doc.tree.create_element("button");
        doc.tree.append_child(body, div).unwrap();
        doc.tree.append_child(body, button).unwrap();

        assert!(!doc.focus(div), "plain div is not focusable");
        assert!(doc.focus(button));
        assert_eq!(doc.active_element(), button);

        doc.tree.set_attribute(div, "tabindex", "-1").unwrap();
        assert!(doc.is_focusable(div));
        assert!(!doc.is_tabbable(div));

        doc.tree.set_attribute(body, "inert", "").unwrap();
        assert!(!doc.is_focusable(button));
        assert!(doc.is_inert(div));
    }

    #[test]
    fn test_detached_focus_falls_back_to_body() {
        let mut doc = Document::default();
        let body = doc.body();
        let button = doc.tree.create_element("button");
        doc.tree.append_child(body, button).unwrap();
        assert!(doc.focus(button));

        doc.tree.remove_child(body, button).unwrap();
        assert_eq!(doc.active_element(), body);
        assert_eq!(doc.focused(), None);
    }

    #[test]
    fn test_hidden_by_style() {
        let mut doc = Document::default();
        let body = doc.body();
        let wrap = doc.tree.create_element("div");
        let input = doc.tree.create_element("input");
        doc.tree.append_child(body, wrap).unwrap();
        doc.tree.append_child(wrap, input).unwrap();
        doc.tree.set_attribute(wrap, "style", "display: none").unwrap();
        assert!(doc.is_hidden(input));
        assert!(!doc.is_focusable(input));
    }

    #[test]
    fn test_event_bubbles_to_ancestor_listener() {
        let mut doc = Document::default();
        let body = doc.body();
        let div = doc.tree.create_element("div");
        doc.tree.append_child(body, div).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        doc.add_event_listener(body, "expanded", move |e| {
            sink.borrow_mut().push((e.target, e.current_target));
        });

        doc.dispatch_event(DomEvent::custom("expanded", div, Some(div)));
        doc.dispatch_event(DomEvent::custom("collapsed", div, Some(div)));

        assert_eq!(*seen.borrow(), vec![(div, Some(body))]);
        assert_eq!(doc.dispatched_events().len(), 2);
    }

    #[test]
    fn test_stop_propagation() {
        let mut doc = Document::default();
        let body = doc.body();
        let div = doc.tree.create_element("div");
        doc.tree.append_child(body, div).unwrap();

        let hits = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&hits);
        doc.add_event_listener(div, "opened", |e| e.stop_propagation());
        doc.add_event_listener(body, "opened", move |_| *sink.borrow_mut() += 1);

        let event = doc.dispatch_event(DomEvent::custom("opened", div, None));
        assert!(event.is_propagation_stopped());
        assert_eq!(*hits.borrow(), 0);
    }
}
