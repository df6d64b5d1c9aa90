//! Widget host
//!
//! Owns the document, the per-kind id generators, every enhanced widget and
//! the deferred task queue, and routes input to them the way a page would:
//! key presses reach widgets on the target path first and page-level
//! subscriptions after; pointer presses reach page-level subscriptions first
//! so a modal trap can intercept them.
//!
//! Open modal dialogs form a stack. Only the top one keeps its trap engaged.

use fos_dom::{Document, ListenKind, NodeId};

use crate::accordion::{Accordion, Navigation};
use crate::config::{DialogConfig, HostConfig};
use crate::dialog::Dialog;
use crate::ids::{IdGenerator, SequentialIds, WidgetIds};
use crate::input::{EventOutcome, Key, KeyEvent};
use crate::tasks::{Task, TaskQueue};
use crate::{WidgetError, WidgetResult};

/// Handle to an accordion owned by a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccordionHandle(usize);

/// Handle to a dialog owned by a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogHandle(usize);

/// Document plus the widgets enhancing it
#[derive(Debug)]
pub struct WidgetHost {
    document: Document,
    config: HostConfig,
    accordion_ids: WidgetIds,
    dialog_ids: WidgetIds,
    accordions: Vec<Accordion>,
    dialogs: Vec<Dialog>,
    /// Open modal dialogs, most recent last
    modal_stack: Vec<usize>,
    tasks: TaskQueue,
}

impl WidgetHost {
    pub fn new(document: Document) -> Self {
        Self::with_config(document, HostConfig::default())
    }

    pub fn with_config(document: Document, config: HostConfig) -> Self {
        Self::with_id_generators(
            document,
            config,
            Box::new(SequentialIds::new()),
            Box::new(SequentialIds::new()),
        )
    }

    /// Host with injected id generators for accordions and dialogs
    pub fn with_id_generators(
        document: Document,
        config: HostConfig,
        accordion_ids: Box<dyn IdGenerator>,
        dialog_ids: Box<dyn IdGenerator>,
    ) -> Self {
        let prefix = |kind: &str| {
            if config.id_prefix.is_empty() {
                kind.to_string()
            } else {
                format!("{}-{}", config.id_prefix, kind)
            }
        };
        Self {
            accordion_ids: WidgetIds::new(&prefix("accordion"), accordion_ids),
            dialog_ids: WidgetIds::new(&prefix("dialog"), dialog_ids),
            document,
            config,
            accordions: Vec::new(),
            dialogs: Vec::new(),
            modal_stack: Vec::new(),
            tasks: TaskQueue::new(),
        }
    }

    /// Parse markup and host the resulting document
    pub fn from_html(html: &str) -> WidgetResult<Self> {
        Ok(Self::new(fos_html::parse(html)?))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Element by id, for wiring markup to widgets
    pub fn element(&self, id: &str) -> Option<NodeId> {
        self.document.get_element_by_id(id)
    }

    fn is_enhanced(&self, container: NodeId) -> bool {
        self.accordions.iter().any(|a| a.container() == container)
            || self
                .dialogs
                .iter()
                .any(|d| d.container() == container || d.surface() == container)
    }

    // ------------------------------------------------------------------
    // Enhancement
    // ------------------------------------------------------------------

    pub fn enhance_accordion(&mut self, container: NodeId, scope: Option<NodeId>) -> WidgetResult<AccordionHandle> {
        if self.is_enhanced(container) {
            return Err(WidgetError::AlreadyEnhanced(container));
        }
        // Headings already owned by another accordion cannot be claimed twice
        let pairs = Accordion::discover(&self.document, container)?;
        if let Some(pair) = pairs.iter().find(|p| {
            self.accordions
                .iter()
                .any(|a| a.pairs().iter().any(|owned| owned.heading == p.heading))
        }) {
            return Err(WidgetError::AlreadyEnhanced(pair.heading));
        }
        let accordion = Accordion::enhance(&mut self.document, &mut self.accordion_ids, container, scope)?;
        self.accordions.push(accordion);
        Ok(AccordionHandle(self.accordions.len() - 1))
    }

    pub fn enhance_dialog(&mut self, container: NodeId, scope: Option<NodeId>) -> WidgetResult<DialogHandle> {
        if self.is_enhanced(container) {
            return Err(WidgetError::AlreadyEnhanced(container));
        }
        let surface = Dialog::discover_surface(&self.document, container)?;
        if self.dialogs.iter().any(|d| d.surface() == surface) {
            return Err(WidgetError::AlreadyEnhanced(surface));
        }
        let config = DialogConfig::from_element(self.document.tree(), container, self.config.default_trap);
        let dialog = Dialog::enhance_with(&mut self.document, &mut self.dialog_ids, container, scope, config)?;
        self.dialogs.push(dialog);
        Ok(DialogHandle(self.dialogs.len() - 1))
    }

    pub fn accordion(&self, handle: AccordionHandle) -> Option<&Accordion> {
        self.accordions.get(handle.0)
    }

    pub fn dialog(&self, handle: DialogHandle) -> Option<&Dialog> {
        self.dialogs.get(handle.0)
    }

    /// Accordion enhancing `container`
    pub fn accordion_for(&self, container: NodeId) -> Option<AccordionHandle> {
        self.accordions
            .iter()
            .position(|a| a.container() == container)
            .map(AccordionHandle)
    }

    /// Dialog whose surface or container is `element`
    pub fn dialog_for(&self, element: NodeId) -> Option<DialogHandle> {
        self.dialogs
            .iter()
            .position(|d| d.surface() == element || d.container() == element)
            .map(DialogHandle)
    }

    // ------------------------------------------------------------------
    // Widget operations
    // ------------------------------------------------------------------

    pub fn open_dialog(&mut self, handle: DialogHandle) -> bool {
        let Some(dialog) = self.dialogs.get(handle.0) else {
            return false;
        };
        if dialog.is_open() {
            return false;
        }
        let modal = dialog.config().is_modal();

        // The newcomer may sit inside what the current top modal suppressed
        if modal {
            if let Some(&top) = self.modal_stack.last() {
                self.dialogs[top].suspend(&mut self.document);
            }
        }
        let opened = self.dialogs[handle.0].open(&mut self.document, &mut self.tasks);
        if opened && modal {
            self.modal_stack.push(handle.0);
        }
        opened
    }

    /// Alias for `open_dialog`
    pub fn show_dialog(&mut self, handle: DialogHandle) -> bool {
        self.open_dialog(handle)
    }

    pub fn close_dialog(&mut self, handle: DialogHandle) -> bool {
        let closed = match self.dialogs.get_mut(handle.0) {
            Some(dialog) => dialog.close(&mut self.document),
            None => false,
        };
        self.settle_modals();
        closed
    }

    /// Drop closed dialogs from the modal stack and hand the page back to
    /// whichever modal is now on top
    fn settle_modals(&mut self) {
        let dialogs = &self.dialogs;
        self.modal_stack.retain(|&i| dialogs[i].is_open());
        if let Some(&top) = self.modal_stack.last() {
            self.dialogs[top].resume(&mut self.document);
        }
    }

    pub fn toggle_panel(&mut self, handle: AccordionHandle, index: usize) {
        if let Some(accordion) = self.accordions.get_mut(handle.0) {
            accordion.toggle(&mut self.document, index);
        }
    }

    pub fn navigate(&mut self, handle: AccordionHandle, nav: Navigation) {
        if let Some(accordion) = self.accordions.get_mut(handle.0) {
            accordion.navigate(&mut self.document, nav);
        }
    }

    // ------------------------------------------------------------------
    // Input routing
    // ------------------------------------------------------------------

    /// Key press at the focused element
    pub fn key_down(&mut self, event: impl Into<KeyEvent>) -> EventOutcome {
        let target = self.document.active_element();
        self.key_down_on(target, event)
    }

    /// Key press at `target`. Tab moves focus sequentially unless a handler
    /// suppressed the default action.
    pub fn key_down_on(&mut self, target: NodeId, event: impl Into<KeyEvent>) -> EventOutcome {
        let event = event.into();
        tracing::trace!(?event.key, %target, "key down");
        let mut outcome = EventOutcome::ignored();

        if !self.document.is_inert(target) {
            for accordion in &mut self.accordions {
                if self.document.tree().contains(accordion.container(), target) {
                    outcome.merge(accordion.handle_key(&mut self.document, target, &event));
                }
                if outcome.propagation_stopped {
                    return outcome;
                }
            }
        }

        for owner in self.document.page_listeners().subscribers(ListenKind::KeyDown) {
            if let Some(dialog) = self.dialogs.iter_mut().find(|d| d.surface() == owner) {
                let result = dialog.handle_document_key(&mut self.document, &event);
                outcome.merge(result);
                // Only the most recently opened dialog reacts
                if result.handled {
                    break;
                }
            }
        }
        self.settle_modals();

        if event.key == Key::Tab && !outcome.default_prevented {
            self.move_focus_sequentially(target, event.shift);
        }
        outcome
    }

    /// Pointer press at `target`
    pub fn pointer_down(&mut self, target: NodeId) -> EventOutcome {
        tracing::trace!(%target, "pointer down");
        let mut outcome = EventOutcome::ignored();
        // Decided before dismissal can release a trap
        let target_inert = self.document.is_inert(target);

        for owner in self.document.page_listeners().subscribers(ListenKind::PointerDown) {
            let Some(dialog) = self.dialogs.iter_mut().find(|d| d.surface() == owner) else {
                continue;
            };
            // A press inside a newer dialog belongs to it, not to the ones below
            if dialog.contains(&self.document, target) {
                break;
            }
            let result = dialog.handle_document_pointer(&mut self.document, target);
            outcome.merge(result);
            if result.handled {
                break;
            }
        }
        self.settle_modals();

        // Intercepted, or inert elements do not receive pointer input
        if outcome.propagation_stopped || target_inert {
            return outcome;
        }
        for accordion in &mut self.accordions {
            if self.document.tree().contains(accordion.container(), target) {
                outcome.merge(accordion.handle_pointer_down(&mut self.document, target));
            }
        }
        outcome
    }

    /// Default Tab action: focus the next (or previous) tabbable element in
    /// document order, wrapping at the ends
    fn move_focus_sequentially(&mut self, from: NodeId, backwards: bool) {
        let tree = self.document.tree();
        let tabbable = self.document.tabbable_elements(tree.root());
        if tabbable.is_empty() {
            return;
        }
        let len = tabbable.len();

        // Tabbable elements strictly before `from`
        let before = tree
            .descendants(tree.root())
            .take_while(|&n| n != from)
            .filter(|n| tabbable.contains(n))
            .count();
        let on_stop = tabbable.get(before) == Some(&from);

        let next = match (backwards, on_stop) {
            (false, true) => (before + 1) % len,
            (false, false) => before % len,
            (true, _) => (before + len - 1) % len,
        };
        self.document.focus(tabbable[next]);
    }

    // ------------------------------------------------------------------
    // Deferred work
    // ------------------------------------------------------------------

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Drain the macrotask queue. Returns how many tasks did work.
    pub fn run_deferred(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.tasks.pop() {
            match task {
                Task::SuppressTabOrder { surface, generation } => {
                    if let Some(dialog) = self.dialogs.iter_mut().find(|d| d.surface() == surface) {
                        if dialog.run_deferred(&mut self.document, generation) {
                            ran += 1;
                        }
                    }
                }
            }
        }
        ran
    }
}
