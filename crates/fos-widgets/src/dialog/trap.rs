//! Modal focus trap
//!
//! Records every attribute it touches together with the value it replaced,
//! so `release` puts each element back exactly as it was, including elements
//! that were already inert or out of the tab order before the dialog opened.

use std::collections::HashSet;

use fos_dom::{Document, NodeId};

use crate::config::TrapStrategy;
use crate::projection;

#[derive(Debug)]
struct Suppressed {
    node: NodeId,
    attr: &'static str,
    previous: Option<String>,
}

#[derive(Debug)]
struct ScrollLock {
    node: NodeId,
    previous_style: Option<String>,
}

/// Reversible record of what a modal dialog changed outside itself
#[derive(Debug)]
pub struct FocusTrap {
    strategy: TrapStrategy,
    suppressed: Vec<Suppressed>,
    scroll: Option<ScrollLock>,
}

impl FocusTrap {
    pub fn new(strategy: TrapStrategy) -> Self {
        Self {
            strategy,
            suppressed: Vec::new(),
            scroll: None,
        }
    }

    pub fn strategy(&self) -> TrapStrategy {
        self.strategy
    }

    /// Elements currently suppressed by this trap
    pub fn suppressed_nodes(&self) -> Vec<NodeId> {
        self.suppressed.iter().map(|s| s.node).collect()
    }

    fn suppress(&mut self, doc: &mut Document, node: NodeId, attr: &'static str, value: &str) {
        let previous = doc.tree().get_attribute(node, attr).map(str::to_string);
        self.suppressed.push(Suppressed { node, attr, previous });
        projection::set(doc, node, attr, value);
    }

    /// Stop the page behind the dialog from scrolling
    pub fn lock_scroll(&mut self, doc: &mut Document) {
        if self.scroll.is_some() {
            return;
        }
        let body = doc.body();
        let previous_style = doc.tree().get_attribute(body, "style").map(str::to_string);
        let locked = match &previous_style {
            Some(style) if !style.trim().is_empty() => {
                format!("{}; overflow: hidden", style.trim().trim_end_matches(';'))
            }
            _ => "overflow: hidden".to_string(),
        };
        projection::set(doc, body, "style", &locked);
        self.scroll = Some(ScrollLock { node: body, previous_style });
    }

    pub fn unlock_scroll(&mut self, doc: &mut Document) {
        if let Some(lock) = self.scroll.take() {
            projection::restore(doc, lock.node, "style", lock.previous_style.as_deref());
        }
    }

    /// Mark every sibling along the path from `surface` up to `scope` inert
    pub fn make_siblings_inert(&mut self, doc: &mut Document, surface: NodeId, scope: NodeId) {
        let mut node = surface;
        while node != scope {
            let Some(parent) = doc.tree().parent(node) else {
                break;
            };
            for sibling in doc.tree().element_siblings(node) {
                self.suppress(doc, sibling, "inert", "");
            }
            node = parent;
        }
        tracing::debug!("inert trap engaged on {} elements", self.suppressed.len());
    }

    /// Pull every element under `scope` outside `surface` out of the tab order.
    /// The surface's own ancestors are left alone.
    pub fn remove_from_tab_order(&mut self, doc: &mut Document, surface: NodeId, scope: NodeId) {
        let already: HashSet<NodeId> = self.suppressed.iter().map(|s| s.node).collect();
        let tree = doc.tree();
        let outside: Vec<NodeId> = tree
            .element_descendants(scope)
            .filter(|&n| !tree.contains(surface, n) && !tree.contains(n, surface))
            .filter(|n| !already.contains(n))
            .collect();

        for node in outside {
            self.suppress(doc, node, "tabindex", "-1");
        }
        tracing::debug!("tab-order trap engaged on {} elements", self.suppressed.len());
    }

    /// Undo everything, most recent change first
    pub fn release(&mut self, doc: &mut Document) {
        let count = self.suppressed.len();
        while let Some(record) = self.suppressed.pop() {
            projection::restore(doc, record.node, record.attr, record.previous.as_deref());
        }
        self.unlock_scroll(doc);
        tracing::debug!("trap released, {} elements restored", count);
    }
}
