//! Page-level listener registry
//!
//! Document-wide listeners (dismiss gestures and the like) are held as
//! subscriptions. `listen` hands out a `Subscription` that is neither `Clone`
//! nor `Copy`; `unlisten` consumes it, so each one is released at most once.

use crate::NodeId;

/// Kind of page-level input a subscriber wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenKind {
    KeyDown,
    PointerDown,
}

/// Owned handle for an active page-level subscription
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a Subscription leaks the listener until the document is dropped"]
pub struct Subscription {
    id: u64,
    owner: NodeId,
}

impl Subscription {
    /// Element the subscription was registered for
    pub fn owner(&self) -> NodeId {
        self.owner
    }
}

#[derive(Debug)]
struct Entry {
    id: u64,
    owner: NodeId,
    kinds: Vec<ListenKind>,
}

/// Registry of page-level subscriptions, in registration order
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    entries: Vec<Entry>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `owner` for the given kinds of page-level input
    pub fn listen(&mut self, owner: NodeId, kinds: &[ListenKind]) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            owner,
            kinds: kinds.to_vec(),
        });
        Subscription { id, owner }
    }

    /// Release a subscription. Returns false if it was already gone.
    pub fn unlisten(&mut self, subscription: Subscription) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != subscription.id);
        self.entries.len() != before
    }

    /// Owners subscribed to `kind`, most recent first
    pub fn subscribers(&self, kind: ListenKind) -> Vec<NodeId> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.kinds.contains(&kind))
            .map(|e| e.owner)
            .collect()
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
