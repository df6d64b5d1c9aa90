//! Deferred work
//!
//! A macrotask-style queue owned by the host. Work is fire-and-forget: the
//! code that schedules a task never waits for it.

use std::collections::VecDeque;

use fos_dom::NodeId;

/// Deferred unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Pull the page outside a modal dialog out of the tab order. Stale if the
    /// dialog's open generation moved on before the task ran.
    SuppressTabOrder { surface: NodeId, generation: u64 },
}

/// FIFO of deferred tasks
#[derive(Debug, Default)]
pub struct TaskQueue {
    queue: VecDeque<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: Task) {
        tracing::trace!(?task, "scheduled");
        self.queue.push_back(task);
    }

    pub fn pop(&mut self) -> Option<Task> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::Document;

    #[test]
    fn test_fifo() {
        let doc = Document::default();
        let body = doc.body();
        let mut tasks = TaskQueue::new();
        tasks.schedule(Task::SuppressTabOrder { surface: body, generation: 1 });
        tasks.schedule(Task::SuppressTabOrder { surface: body, generation: 2 });

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks.pop(), Some(Task::SuppressTabOrder { surface: body, generation: 1 }));
        assert_eq!(tasks.pop(), Some(Task::SuppressTabOrder { surface: body, generation: 2 }));
        assert!(tasks.is_empty());
    }
}
