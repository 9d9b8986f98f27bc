// src/engine/frontier.rs
// =============================================================================
// This module is the work queue at the heart of the crawler.
//
// The frontier holds crawl tasks that have been discovered but not yet
// fetched. Any worker can push new tasks (every fetched page may discover
// more links) and any worker can pop the next one - an unbounded
// multi-producer multi-consumer FIFO.
//
// The hard part is knowing when the crawl is DONE. "The queue is empty"
// is not enough: a worker that is still fetching a page may push new
// tasks after the queue drains. So the frontier tracks a `pending` count
// covering both queued tasks AND tasks currently being processed. A task
// stays pending until its worker has pushed every child it discovered
// and called task_done(). Quiescence = queue empty AND pending == 0,
// and only then does next_task() tell workers to shut down.
//
// Idle workers park on a tokio Notify instead of polling with timeouts,
// so the pool never needs to be torn down and recreated mid-crawl.
// =============================================================================

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

// One unit of crawl work: a URL to check, and the page that linked to it.
//
// `parent` is None only for the seed. A task is created once when the
// link is discovered, consumed once by a worker, and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub parent: Option<String>,
    pub url: String,
}

/// Unbounded MPMC work queue with quiescence detection
pub struct Frontier {
    queue: Mutex<VecDeque<CrawlTask>>,
    /// Tasks enqueued but not yet fully processed (queued + in-flight)
    pending: AtomicUsize,
    /// Parked idle workers wait here for new work or for quiescence
    wakeup: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            pending: AtomicUsize::new(0),
            wakeup: Notify::new(),
        }
    }

    // Adds a task to the frontier.
    //
    // The pending count is bumped BEFORE the task becomes visible in the
    // queue. The other order would let a consumer pop the task, finish
    // it, and drive pending below zero - or worse, let a parked sibling
    // observe pending == 0 and shut down while work exists.
    pub fn push(&self, task: CrawlTask) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.lock_queue().push_back(task);
        self.wakeup.notify_one();
    }

    // Hands out the next task, parking until one arrives.
    //
    // Returns None exactly when the crawl is quiescent: nothing queued
    // and nothing in flight. That is the termination signal - a worker
    // receiving None exits its loop for good.
    pub async fn next_task(&self) -> Option<CrawlTask> {
        loop {
            // Register as a waiter BEFORE checking state. A wakeup that
            // fires between our empty-queue check and the await would
            // otherwise be lost, leaving this worker parked forever.
            let notified = self.wakeup.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(task) = self.lock_queue().pop_front() {
                return Some(task);
            }

            if self.pending.load(Ordering::SeqCst) == 0 {
                // Quiescent. Cascade the wakeup so every parked sibling
                // re-checks and drains out of the pool too.
                self.wakeup.notify_waiters();
                return None;
            }

            // Queue momentarily empty but fetches are still in flight -
            // one of them may push more work. Park until something
            // changes.
            notified.await;
        }
    }

    // Marks one task as fully processed.
    //
    // Must be called AFTER the worker has pushed all children discovered
    // by the task; pushing first keeps pending from ever touching zero
    // while follow-up work exists.
    pub fn task_done(&self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            // That was the last pending task anywhere - wake every
            // parked worker so they can observe quiescence and exit
            self.wakeup.notify_waiters();
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<CrawlTask>> {
        // A worker that panics mid-push must not wedge the whole pool;
        // the queue itself is still intact, so recover it
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}
