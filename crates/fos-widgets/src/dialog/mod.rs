//! Dialog
//!
//! Enhances one region as a modal or modeless dialog surface. Open and close
//! are idempotent. While open the dialog holds a page-level subscription for
//! its dismiss gestures; in modal mode it also holds a `FocusTrap`.
//!
//! Only one trap may be engaged at a time. When modal dialogs stack, the
//! host suspends the lower dialog's trap while a newer one is open and
//! resumes it when the newer one closes.

mod trap;

pub use trap::FocusTrap;

use fos_dom::{Document, ListenKind, NodeId, Subscription};

use crate::aria::{AriaRole, is_heading};
use crate::config::{DialogConfig, TrapStrategy};
use crate::ids::{WidgetIds, ensure_id};
use crate::input::{EventOutcome, Key, KeyEvent};
use crate::projection::{self, Notification, emit};
use crate::tasks::{Task, TaskQueue};
use crate::{WidgetError, WidgetResult};

/// Enhanced dialog
#[derive(Debug)]
pub struct Dialog {
    container: NodeId,
    surface: NodeId,
    scope: NodeId,
    config: DialogConfig,
    open: bool,
    /// Bumped on every open and close; deferred work carries it
    generation: u64,
    previously_focused: Option<NodeId>,
    trap: FocusTrap,
    /// Open, but a newer modal holds the page
    suspended: bool,
    subscription: Option<Subscription>,
}

/// The container itself when it is a dialog, else its first dialog descendant
fn find_surface(doc: &Document, container: NodeId) -> Option<NodeId> {
    let tree = doc.tree();
    let is_dialog = |n| AriaRole::of(tree, n).is_some_and(|r| r.is_dialog());
    if is_dialog(container) {
        return Some(container);
    }
    tree.element_descendants(container).find(|&n| is_dialog(n))
}

impl Dialog {
    /// Enhance `container` using the flags it carries
    pub fn enhance(
        doc: &mut Document,
        ids: &mut WidgetIds,
        container: NodeId,
        scope: Option<NodeId>,
    ) -> WidgetResult<Self> {
        let config = DialogConfig::from_element(doc.tree(), container, TrapStrategy::default());
        Self::enhance_with(doc, ids, container, scope, config)
    }

    /// Enhance `container` with explicit options
    pub fn enhance_with(
        doc: &mut Document,
        ids: &mut WidgetIds,
        container: NodeId,
        scope: Option<NodeId>,
        config: DialogConfig,
    ) -> WidgetResult<Self> {
        let surface = Self::discover_surface(doc, container)?;
        let scope = scope.unwrap_or_else(|| doc.body());

        let tree = doc.tree_mut();
        tree.set_attribute(surface, "tabindex", "-1")?;
        let style = match tree.get_attribute(surface, "style") {
            Some(s) if !s.trim().is_empty() => format!("{}; outline: none", s.trim().trim_end_matches(';')),
            _ => "outline: none".to_string(),
        };
        tree.set_attribute(surface, "style", &style)?;
        if config.is_modal() {
            tree.set_attribute(surface, "aria-modal", "true")?;
        }
        tree.set_attribute(surface, "hidden", "")?;

        let heading = doc
            .tree()
            .element_descendants(surface)
            .find(|&n| is_heading(doc.tree(), n));
        if let Some(heading) = heading {
            if !doc.tree().has_attribute(surface, "aria-labelledby") {
                let base = ids.next_instance();
                let heading_id = ensure_id(doc, scope, heading, format!("{base}-title"));
                doc.tree_mut().set_attribute(surface, "aria-labelledby", &heading_id)?;
            }
        }

        tracing::debug!("enhanced dialog {} (surface {}, {:?})", container, surface, config);
        Ok(Self {
            container,
            surface,
            scope,
            config,
            open: false,
            generation: 0,
            previously_focused: None,
            trap: FocusTrap::new(config.trap),
            suspended: false,
            subscription: None,
        })
    }

    /// Surface `container` would claim if enhanced
    pub fn discover_surface(doc: &Document, container: NodeId) -> WidgetResult<NodeId> {
        if !doc.tree().is_element(container) {
            return Err(WidgetError::NotAnElement(container));
        }
        find_surface(doc, container).ok_or(WidgetError::NoDialogRegion(container))
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The element carrying `role="dialog"`
    pub fn surface(&self) -> NodeId {
        self.surface
    }

    pub fn config(&self) -> DialogConfig {
        self.config
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Open with its trap lifted in favour of a newer modal
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Element focus returns to on close
    pub fn previously_focused(&self) -> Option<NodeId> {
        self.previously_focused
    }

    /// Elements the modal trap currently holds suppressed
    pub fn suppressed_nodes(&self) -> Vec<NodeId> {
        self.trap.suppressed_nodes()
    }

    /// Target or one of its ancestors is the surface
    pub fn contains(&self, doc: &Document, target: NodeId) -> bool {
        doc.tree().contains(self.surface, target)
    }

    /// First visible descendant marked `autofocus`
    fn autofocus_target(&self, doc: &Document) -> Option<NodeId> {
        doc.tree()
            .element_descendants(self.surface)
            .find(|&n| doc.tree().has_attribute(n, "autofocus") && !doc.is_hidden(n))
    }

    /// Open the dialog. Returns false if it was already open.
    pub fn open(&mut self, doc: &mut Document, tasks: &mut TaskQueue) -> bool {
        if self.open {
            return false;
        }

        self.previously_focused = doc.focused();
        self.generation += 1;
        self.suspended = false;

        if self.config.is_modal() {
            self.trap.lock_scroll(doc);
            match self.trap.strategy() {
                TrapStrategy::Inert => self.trap.make_siblings_inert(doc, self.surface, self.scope),
                TrapStrategy::TabOrder => tasks.schedule(Task::SuppressTabOrder {
                    surface: self.surface,
                    generation: self.generation,
                }),
            }
        }

        self.open = true;
        projection::remove(doc, self.surface, "hidden");
        self.subscription = Some(doc.listen(self.surface, &[ListenKind::KeyDown, ListenKind::PointerDown]));

        let focused = match self.autofocus_target(doc) {
            Some(target) => doc.focus(target),
            None => false,
        };
        if !focused {
            doc.focus(self.surface);
        }

        tracing::debug!("dialog {} opened", self.surface);
        emit(doc, Notification::Opened, self.surface, self.surface);
        true
    }

    /// Alias for `open`
    pub fn show(&mut self, doc: &mut Document, tasks: &mut TaskQueue) -> bool {
        self.open(doc, tasks)
    }

    /// Close the dialog. Returns false if it was already closed.
    pub fn close(&mut self, doc: &mut Document) -> bool {
        if !self.open {
            return false;
        }

        // Any deferred trap work for this session is now stale
        self.generation += 1;
        self.suspended = false;
        if self.config.is_modal() {
            self.trap.release(doc);
        }

        self.open = false;
        projection::set(doc, self.surface, "hidden", "");
        if let Some(subscription) = self.subscription.take() {
            doc.unlisten(subscription);
        }

        match self.previously_focused.take() {
            Some(previous) => {
                if !doc.focus(previous) {
                    tracing::warn!("cannot restore focus to {}, blurring", previous);
                    doc.blur();
                }
            }
            None => doc.blur(),
        }

        tracing::debug!("dialog {} closed", self.surface);
        emit(doc, Notification::Closed, self.surface, self.surface);
        true
    }

    /// Lift this modal's trap while a newer modal is open
    pub fn suspend(&mut self, doc: &mut Document) {
        if !self.open || !self.config.is_modal() || self.suspended {
            return;
        }
        self.trap.release(doc);
        self.suspended = true;
        tracing::debug!("dialog {} trap suspended", self.surface);
    }

    /// Re-engage a suspended trap at once
    pub fn resume(&mut self, doc: &mut Document) {
        if !self.open || !self.suspended {
            return;
        }
        self.suspended = false;
        self.trap.lock_scroll(doc);
        match self.trap.strategy() {
            TrapStrategy::Inert => self.trap.make_siblings_inert(doc, self.surface, self.scope),
            TrapStrategy::TabOrder => self.trap.remove_from_tab_order(doc, self.surface, self.scope),
        }
        tracing::debug!("dialog {} trap resumed", self.surface);
    }

    /// Run a deferred tab-order suppression scheduled by `open`
    pub fn run_deferred(&mut self, doc: &mut Document, generation: u64) -> bool {
        if !self.open || self.suspended || generation != self.generation {
            tracing::trace!("dropping stale trap task for {}", self.surface);
            return false;
        }
        self.trap.remove_from_tab_order(doc, self.surface, self.scope);
        true
    }

    /// Page-level key press while open
    pub fn handle_document_key(&mut self, doc: &mut Document, event: &KeyEvent) -> EventOutcome {
        if !self.open || event.key != Key::Escape || !self.config.close_on_escape {
            return EventOutcome::ignored();
        }
        self.close(doc);
        EventOutcome::prevented()
    }

    /// Page-level pointer press while open: presses outside dismiss
    pub fn handle_document_pointer(&mut self, doc: &mut Document, target: NodeId) -> EventOutcome {
        if !self.open || self.contains(doc, target) {
            return EventOutcome::ignored();
        }
        let outcome = if self.config.is_modal() && self.trap.strategy() == TrapStrategy::TabOrder {
            EventOutcome::intercepted()
        } else {
            EventOutcome::handled()
        };
        self.close(doc);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(config: DialogConfig) -> (Document, Dialog, NodeId) {
        let mut doc = Document::default();
        let body = doc.body();
        let opener = doc.tree.create_element("button");
        let surface = doc.tree.create_element("div");
        let title = doc.tree.create_element("h2");
        doc.tree.append_child(body, opener).unwrap();
        doc.tree.append_child(body, surface).unwrap();
        doc.tree.append_child(surface, title).unwrap();
        doc.tree.set_attribute(surface, "role", "dialog").unwrap();

        let mut ids = WidgetIds::sequential("dialog");
        let dialog = Dialog::enhance_with(&mut doc, &mut ids, surface, None, config).unwrap();
        (doc, dialog, opener)
    }

    #[test]
    fn test_enhance_projection() {
        let (doc, dialog, _) = build(DialogConfig::default());
        let tree = doc.tree();
        let surface = dialog.surface();
        assert_eq!(tree.get_attribute(surface, "tabindex"), Some("-1"));
        assert_eq!(tree.get_attribute(surface, "style"), Some("outline: none"));
        assert_eq!(tree.get_attribute(surface, "aria-modal"), Some("true"));
        assert_eq!(tree.get_attribute(surface, "aria-labelledby"), Some("dialog-1-title"));
        assert!(tree.has_attribute(surface, "hidden"));
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_open_close_idempotent() {
        let (mut doc, mut dialog, opener) = build(DialogConfig::default());
        let mut tasks = TaskQueue::new();
        assert!(doc.focus(opener));

        assert!(dialog.open(&mut doc, &mut tasks));
        assert!(!dialog.open(&mut doc, &mut tasks));
        assert_eq!(doc.active_element(), dialog.surface());
        assert_eq!(doc.page_listeners().len(), 1);

        assert!(dialog.close(&mut doc));
        assert!(!dialog.close(&mut doc));
        assert_eq!(doc.active_element(), opener);
        assert!(doc.page_listeners().is_empty());
        assert_eq!(dialog.previously_focused(), None);
    }

    #[test]
    fn test_stale_deferred_task_dropped() {
        let config = DialogConfig { trap: TrapStrategy::TabOrder, ..Default::default() };
        let (mut doc, mut dialog, opener) = build(config);
        let mut tasks = TaskQueue::new();

        dialog.open(&mut doc, &mut tasks);
        dialog.close(&mut doc);
        dialog.open(&mut doc, &mut tasks);
        assert_eq!(tasks.len(), 2);

        let Some(Task::SuppressTabOrder { generation: stale, .. }) = tasks.pop() else {
            panic!("expected trap task");
        };
        assert!(!dialog.run_deferred(&mut doc, stale));
        let Some(Task::SuppressTabOrder { generation: live, .. }) = tasks.pop() else {
            panic!("expected trap task");
        };
        assert!(dialog.run_deferred(&mut doc, live));
        assert_eq!(doc.tree().get_attribute(opener, "tabindex"), Some("-1"));
    }

    #[test]
    fn test_suspend_resume() {
        let (mut doc, mut dialog, opener) = build(DialogConfig::default());
        let mut tasks = TaskQueue::new();
        dialog.open(&mut doc, &mut tasks);
        assert!(doc.is_inert(opener));

        dialog.suspend(&mut doc);
        assert!(dialog.is_suspended());
        assert!(!doc.is_inert(opener));
        assert!(!doc.tree().has_attribute(doc.body(), "style"));

        dialog.resume(&mut doc);
        assert!(!dialog.is_suspended());
        assert!(doc.is_inert(opener));

        dialog.close(&mut doc);
        assert!(!doc.is_inert(opener));
    }

    #[test]
    fn test_no_dialog_region() {
        let mut doc = Document::default();
        let body = doc.body();
        let mut ids = WidgetIds::sequential("dialog");
        let err = Dialog::enhance(&mut doc, &mut ids, body, None).unwrap_err();
        assert!(matches!(err, WidgetError::NoDialogRegion(_)));
    }
}
