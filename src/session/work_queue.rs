//! One-shot work distribution for a session's worker pool
//!
//! The queue is sized and filled once, before any worker starts, and never
//! refilled. An empty pop therefore means there is no more work, and workers
//! treat it as their signal to exit rather than waiting.

use crossbeam_queue::ArrayQueue;

use super::types::WorkItem;

/// Pre-populated FIFO with lock-free concurrent `pop`
#[derive(Debug)]
pub struct WorkQueue {
    items: ArrayQueue<WorkItem>,
    total: usize,
}

impl WorkQueue {
    /// Build a queue holding exactly `items`, in order
    #[must_use]
    pub fn populate(items: Vec<WorkItem>) -> Self {
        let total = items.len();
        let queue = ArrayQueue::new(total.max(1));
        for item in items {
            // Capacity equals the item count, so a push cannot fail.
            let pushed = queue.push(item).is_ok();
            debug_assert!(pushed, "work queue sized below its item count");
        }
        Self {
            items: queue,
            total,
        }
    }

    /// Claim the next item; `None` once the queue is drained
    pub fn pop(&self) -> Option<WorkItem> {
        self.items.pop()
    }

    /// Items not yet claimed
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items the queue was populated with
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }
}
