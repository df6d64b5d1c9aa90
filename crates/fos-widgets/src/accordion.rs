//! Accordion
//!
//! Turns a container of `tab` headings and `tabpanel` panels into a tablist
//! with a roving tab stop and expand/collapse state.
//!
//! Pairing is positional and fixed at enhancement: each heading owns the
//! panel that follows it with no other heading in between. The typed state
//! (`expanded`, `current`) is the source of truth; ARIA attributes are written
//! from it.

use fos_dom::{Document, NodeId};

use crate::aria::AriaRole;
use crate::config::AccordionConfig;
use crate::ids::{WidgetIds, ensure_id};
use crate::input::{EventOutcome, Key, KeyEvent};
use crate::projection::{self, Notification, emit};
use crate::{WidgetError, WidgetResult};

/// Heading and the panel it controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub heading: NodeId,
    pub panel: NodeId,
}

/// Roving focus movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Previous,
    Next,
    First,
    Last,
}

/// Enhanced accordion
#[derive(Debug)]
pub struct Accordion {
    container: NodeId,
    pairs: Vec<Pair>,
    expanded: Vec<bool>,
    current: usize,
    config: AccordionConfig,
}

enum Marker {
    Heading(NodeId),
    Panel(NodeId),
}

/// Headings and panels below `node` in document order. Does not descend into
/// either, so an accordion nested inside a panel stays separate.
fn collect_markers(doc: &Document, node: NodeId, out: &mut Vec<Marker>) {
    let tree = doc.tree();
    for child in tree.element_children(node) {
        match AriaRole::of(tree, child) {
            Some(AriaRole::Tab) => out.push(Marker::Heading(child)),
            Some(AriaRole::TabPanel) => out.push(Marker::Panel(child)),
            _ => collect_markers(doc, child, out),
        }
    }
}

fn pair_up(container: NodeId, markers: Vec<Marker>) -> WidgetResult<Vec<Pair>> {
    let mut pairs = Vec::new();
    let mut pending: Option<NodeId> = None;

    for marker in markers {
        match (marker, pending) {
            (Marker::Heading(heading), None) => pending = Some(heading),
            (Marker::Heading(_), Some(heading)) => {
                return Err(WidgetError::UnpairedHeading { heading });
            }
            (Marker::Panel(panel), Some(heading)) => {
                pairs.push(Pair { heading, panel });
                pending = None;
            }
            (Marker::Panel(panel), None) => return Err(WidgetError::OrphanPanel { panel }),
        }
    }

    if let Some(heading) = pending {
        return Err(WidgetError::UnpairedHeading { heading });
    }
    if pairs.is_empty() {
        return Err(WidgetError::EmptyAccordion(container));
    }
    Ok(pairs)
}

impl Accordion {
    /// Enhance `container` using the flags it carries
    pub fn enhance(
        doc: &mut Document,
        ids: &mut WidgetIds,
        container: NodeId,
        scope: Option<NodeId>,
    ) -> WidgetResult<Self> {
        let config = AccordionConfig::from_element(doc.tree(), container);
        Self::enhance_with(doc, ids, container, scope, config)
    }

    /// Enhance `container` with explicit options
    pub fn enhance_with(
        doc: &mut Document,
        ids: &mut WidgetIds,
        container: NodeId,
        scope: Option<NodeId>,
        config: AccordionConfig,
    ) -> WidgetResult<Self> {
        let pairs = Self::discover(doc, container)?;
        let scope = scope.unwrap_or_else(|| doc.tree().root());

        // Without `multiple` only the first panel may start open
        let expanded = (0..pairs.len())
            .map(|i| config.expanded && (config.multiple || i == 0))
            .collect();

        let base = ids.next_instance();
        let tree = doc.tree_mut();
        tree.set_attribute(container, "role", AriaRole::TabList.as_str())?;
        if config.multiple {
            tree.set_attribute(container, "aria-multiselectable", "true")?;
        }

        for (i, pair) in pairs.iter().enumerate() {
            let heading_id = ensure_id(doc, scope, pair.heading, format!("{base}-heading-{i}"));
            let panel_id = ensure_id(doc, scope, pair.panel, format!("{base}-panel-{i}"));

            let tree = doc.tree_mut();
            tree.set_attribute(pair.heading, "aria-controls", &panel_id)?;
            tree.set_attribute(pair.panel, "aria-labelledby", &heading_id)?;
        }

        let accordion = Self {
            container,
            pairs,
            expanded,
            current: 0,
            config,
        };
        for i in 0..accordion.pairs.len() {
            accordion.project_pair(doc, i);
        }

        tracing::debug!(
            "enhanced accordion {} with {} pairs ({:?})",
            container,
            accordion.pairs.len(),
            config
        );
        Ok(accordion)
    }

    /// Write the ARIA projection of pair `i`
    fn project_pair(&self, doc: &mut Document, i: usize) {
        let Pair { heading, panel } = self.pairs[i];
        let selected = i == self.current;
        let expanded = self.expanded[i];

        projection::set(doc, heading, "role", AriaRole::Tab.as_str());
        projection::set_bool(doc, heading, "aria-expanded", expanded);
        projection::set_bool(doc, heading, "aria-selected", selected);
        projection::set(doc, heading, "tabindex", if selected { "0" } else { "-1" });

        projection::set(doc, panel, "role", AriaRole::TabPanel.as_str());
        projection::set_bool(doc, panel, "aria-hidden", !expanded);
    }

    /// Heading/panel pairs `container` would claim if enhanced
    pub fn discover(doc: &Document, container: NodeId) -> WidgetResult<Vec<Pair>> {
        if !doc.tree().is_element(container) {
            return Err(WidgetError::NotAnElement(container));
        }
        let mut markers = Vec::new();
        collect_markers(doc, container, &mut markers);
        pair_up(container, markers)
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn config(&self) -> AccordionConfig {
        self.config
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Index of the heading holding the roving tab stop
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.get(index).copied().unwrap_or(false)
    }

    /// Indices of the open panels
    pub fn expanded_indices(&self) -> Vec<usize> {
        (0..self.pairs.len()).filter(|&i| self.expanded[i]).collect()
    }

    /// Index of the heading that is or contains `node`
    pub fn heading_index(&self, doc: &Document, node: NodeId) -> Option<usize> {
        self.pairs
            .iter()
            .position(|p| doc.tree().contains(p.heading, node))
    }

    // ------------------------------------------------------------------
    // Expand / collapse
    // ------------------------------------------------------------------

    fn set_expanded(&mut self, doc: &mut Document, index: usize, expanded: bool) {
        self.expanded[index] = expanded;
        self.project_pair(doc, index);

        let Pair { heading, panel } = self.pairs[index];
        tracing::debug!("accordion {} pair {} expanded={}", self.container, index, expanded);
        let kind = if expanded { Notification::Expanded } else { Notification::Collapsed };
        emit(doc, kind, heading, panel);
    }

    /// Flip pair `index`. Opening closes every other open pair first unless
    /// `multiple` is set.
    pub fn toggle(&mut self, doc: &mut Document, index: usize) {
        if index >= self.pairs.len() {
            return;
        }
        if self.expanded[index] {
            self.set_expanded(doc, index, false);
            return;
        }
        if !self.config.multiple {
            for other in 0..self.pairs.len() {
                if other != index && self.expanded[other] {
                    self.toggle(doc, other);
                }
            }
        }
        self.set_expanded(doc, index, true);
    }

    /// Toggle the pair under the roving tab stop
    pub fn activate(&mut self, doc: &mut Document) {
        self.toggle(doc, self.current);
    }

    // ------------------------------------------------------------------
    // Roving focus
    // ------------------------------------------------------------------

    /// Move the roving tab stop to `index`: blur the old heading, then
    /// select and focus the new one.
    pub fn focus_index(&mut self, doc: &mut Document, index: usize) {
        if index >= self.pairs.len() {
            return;
        }
        if index == self.current {
            doc.focus(self.pairs[index].heading);
            return;
        }

        let old = self.pairs[self.current].heading;
        self.current = index;

        projection::set_bool(doc, old, "aria-selected", false);
        projection::set(doc, old, "tabindex", "-1");
        emit(doc, Notification::Blurred, old, old);

        let new = self.pairs[index].heading;
        projection::set_bool(doc, new, "aria-selected", true);
        projection::set(doc, new, "tabindex", "0");
        doc.focus(new);
        tracing::trace!("accordion {} focus -> {}", self.container, index);
        emit(doc, Notification::Focused, new, new);
    }

    /// Target index of a movement, honouring `wrap_focus`
    pub fn target_index(&self, nav: Navigation) -> usize {
        let last = self.pairs.len() - 1;
        match nav {
            Navigation::First => 0,
            Navigation::Last => last,
            Navigation::Previous if self.current == 0 => {
                if self.config.wrap_focus { last } else { 0 }
            }
            Navigation::Previous => self.current - 1,
            Navigation::Next if self.current == last => {
                if self.config.wrap_focus { 0 } else { last }
            }
            Navigation::Next => self.current + 1,
        }
    }

    pub fn navigate(&mut self, doc: &mut Document, nav: Navigation) {
        let target = self.target_index(nav);
        self.focus_index(doc, target);
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Key press whose target is inside the container
    pub fn handle_key(&mut self, doc: &mut Document, target: NodeId, event: &KeyEvent) -> EventOutcome {
        if event.has_command_modifier() {
            return EventOutcome::ignored();
        }
        let Some(index) = self.heading_index(doc, target) else {
            return EventOutcome::ignored();
        };

        let nav = match event.key {
            Key::ArrowUp | Key::ArrowLeft => Some(Navigation::Previous),
            Key::ArrowDown | Key::ArrowRight => Some(Navigation::Next),
            Key::Home => Some(Navigation::First),
            Key::End => Some(Navigation::Last),
            Key::Enter | Key::Space => None,
            _ => return EventOutcome::ignored(),
        };

        // Focus may have reached a heading without moving the tab stop
        if index != self.current {
            self.focus_index(doc, index);
        }
        match nav {
            Some(nav) => self.navigate(doc, nav),
            None => self.activate(doc),
        }
        EventOutcome::prevented()
    }

    /// Pointer press: move the tab stop to the pressed heading, then toggle it
    pub fn handle_pointer_down(&mut self, doc: &mut Document, target: NodeId) -> EventOutcome {
        let Some(index) = self.heading_index(doc, target) else {
            return EventOutcome::ignored();
        };
        self.focus_index(doc, index);
        self.toggle(doc, index);
        EventOutcome::handled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(pairs: usize, config: AccordionConfig) -> (Document, Accordion) {
        let mut doc = Document::default();
        let body = doc.body();
        let container = doc.tree.create_element("div");
        doc.tree.append_child(body, container).unwrap();
        for _ in 0..pairs {
            let heading = doc.tree.create_element("h3");
            let panel = doc.tree.create_element("div");
            doc.tree.set_attribute(heading, "role", "tab").unwrap();
            doc.tree.set_attribute(panel, "role", "tabpanel").unwrap();
            doc.tree.append_child(container, heading).unwrap();
            doc.tree.append_child(container, panel).unwrap();
        }
        let mut ids = WidgetIds::sequential("accordion");
        let accordion = Accordion::enhance_with(&mut doc, &mut ids, container, None, config).unwrap();
        (doc, accordion)
    }

    #[test]
    fn test_target_index_clamps() {
        let (_, accordion) = build(3, AccordionConfig::default());
        assert_eq!(accordion.target_index(Navigation::Previous), 0);
        assert_eq!(accordion.target_index(Navigation::Next), 1);
        assert_eq!(accordion.target_index(Navigation::Last), 2);
    }

    #[test]
    fn test_target_index_wraps() {
        let config = AccordionConfig { wrap_focus: true, ..Default::default() };
        let (_, accordion) = build(3, config);
        assert_eq!(accordion.target_index(Navigation::Previous), 2);
    }

    #[test]
    fn test_ids_and_links() {
        let (doc, accordion) = build(2, AccordionConfig::default());
        let tree = doc.tree();
        let pair = accordion.pairs()[1];
        assert_eq!(tree.get_attribute(pair.heading, "id"), Some("accordion-1-heading-1"));
        assert_eq!(tree.get_attribute(pair.panel, "id"), Some("accordion-1-panel-1"));
        assert_eq!(tree.get_attribute(pair.heading, "aria-controls"), Some("accordion-1-panel-1"));
        assert_eq!(tree.get_attribute(pair.panel, "aria-labelledby"), Some("accordion-1-heading-1"));
        assert_eq!(tree.get_attribute(accordion.container(), "role"), Some("tablist"));
    }

    #[test]
    fn test_expanded_without_multiple_opens_first_only() {
        let config = AccordionConfig { expanded: true, ..Default::default() };
        let (_, accordion) = build(3, config);
        assert_eq!(accordion.expanded_indices(), vec![0]);
    }

    #[test]
    fn test_expanded_with_multiple_opens_all() {
        let config = AccordionConfig { expanded: true, multiple: true, ..Default::default() };
        let (doc, accordion) = build(3, config);
        assert_eq!(accordion.expanded_indices(), vec![0, 1, 2]);
        assert_eq!(
            doc.tree().get_attribute(accordion.container(), "aria-multiselectable"),
            Some("true")
        );
    }

    #[test]
    fn test_pair_up_errors() {
        let mut doc = Document::default();
        let body = doc.body();
        let heading = doc.tree.create_element("div");
        doc.tree.append_child(body, heading).unwrap();
        doc.tree.set_attribute(heading, "role", "tab").unwrap();

        let mut ids = WidgetIds::sequential("accordion");
        let err = Accordion::enhance(&mut doc, &mut ids, body, None).unwrap_err();
        assert!(matches!(err, WidgetError::UnpairedHeading { heading: h } if h == heading));

        let empty = doc.tree.create_element("div");
        doc.tree.append_child(body, empty).unwrap();
        let err = Accordion::enhance(&mut doc, &mut ids, empty, None).unwrap_err();
        assert!(matches!(err, WidgetError::EmptyAccordion(_)));
    }
}
