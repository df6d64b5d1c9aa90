//! Element id generation
//!
//! Each widget kind owns its own generator, injected by the host, so two
//! hosts (or two test runs) never share a counter.

use fos_dom::{Document, NodeId};

/// Source of instance numbers
pub trait IdGenerator {
    fn next(&mut self) -> u64;
}

/// Monotonic counter starting at 1
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    last: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next(&mut self) -> u64 {
        self.last += 1;
        self.last
    }
}

impl<F: FnMut() -> u64> IdGenerator for F {
    fn next(&mut self) -> u64 {
        self()
    }
}

/// Prefixed id factory for one widget kind
pub struct WidgetIds {
    prefix: String,
    generator: Box<dyn IdGenerator>,
}

impl WidgetIds {
    pub fn new(prefix: &str, generator: Box<dyn IdGenerator>) -> Self {
        Self {
            prefix: prefix.to_string(),
            generator,
        }
    }

    /// Counter-backed ids
    pub fn sequential(prefix: &str) -> Self {
        Self::new(prefix, Box::new(SequentialIds::new()))
    }

    /// Base id for a new widget instance, e.g. `accordion-3`
    pub fn next_instance(&mut self) -> String {
        format!("{}-{}", self.prefix, self.generator.next())
    }
}

impl std::fmt::Debug for WidgetIds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetIds").field("prefix", &self.prefix).finish()
    }
}

/// `candidate`, suffixed until no element under `scope` already uses it
pub(crate) fn unique_id(doc: &Document, scope: NodeId, candidate: String) -> String {
    let tree = doc.tree();
    let taken = |id: &str| {
        tree.element_descendants(scope)
            .any(|n| tree.get_attribute(n, "id") == Some(id))
    };

    if !taken(&candidate) {
        return candidate;
    }
    let mut n = 2;
    loop {
        let id = format!("{candidate}-{n}");
        if !taken(&id) {
            return id;
        }
        n += 1;
    }
}

/// Existing id of `element`, or a fresh unique one written onto it
pub(crate) fn ensure_id(doc: &mut Document, scope: NodeId, element: NodeId, candidate: String) -> String {
    if let Some(existing) = doc.tree().get_attribute(element, "id").filter(|id| !id.is_empty()) {
        return existing.to_string();
    }
    let id = unique_id(doc, scope, candidate);
    crate::projection::set(doc, element, "id", &id);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential() {
        let mut ids = WidgetIds::sequential("accordion");
        assert_eq!(ids.next_instance(), "accordion-1");
        assert_eq!(ids.next_instance(), "accordion-2");
    }

    #[test]
    fn test_injected_closure() {
        let mut n: u64 = 40;
        let mut ids = WidgetIds::new("dialog", Box::new(move || {
            n += 2;
            n
        }));
        assert_eq!(ids.next_instance(), "dialog-42");
    }

    #[test]
    fn test_unique_id_suffixes_collisions() {
        let mut doc = Document::default();
        let body = doc.body();
        let taken = doc.tree.create_element("div");
        doc.tree.append_child(body, taken).unwrap();
        doc.tree.set_attribute(taken, "id", "accordion-1").unwrap();

        assert_eq!(unique_id(&doc, body, "accordion-1".into()), "accordion-1-2");
        assert_eq!(unique_id(&doc, body, "accordion-9".into()), "accordion-9");
    }
}
