//! Worker pool and its controller
//!
//! The pool is a runtime-growing/shrinking list of live workers, appended at
//! the tail and retired from the tail (LIFO: the newest worker is the first
//! to go). Only the controller thread ever mutates the list. The scaling
//! decision itself is a pure function over a queue-occupancy snapshot, kept
//! separate from the control loop so it can be tested without threads.

mod controller;

pub use controller::ControllerHandle;
pub(crate) use controller::spawn_controller;

use std::io;
use std::sync::Arc;

use crate::item::Item;
use crate::queue::BoundedQueue;
use crate::transform::Transform;
use crate::worker::{spawn_worker, WorkerHandle};

// =============================================================================
// Scaling Policy
// =============================================================================

/// Outcome of one controller tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleAction {
    /// Start one new worker and append it to the pool
    Grow,

    /// Cancel and remove the most recently appended worker
    Shrink,

    /// Occupancy is inside the hysteresis band; do nothing
    Hold,
}

/// Decide the scale action for one tick
///
/// Compares the occupancy ratio `occupancy / capacity` against the two
/// percentage thresholds, in integer arithmetic to avoid float comparisons:
///
/// - ratio strictly above `high_threshold`% → [`ScaleAction::Grow`]
/// - ratio strictly below `low_threshold`% and pool size > 1 →
///   [`ScaleAction::Shrink`]
/// - otherwise → [`ScaleAction::Hold`]
///
/// The `pool_size > 1` guard means the pool never scales below one worker,
/// no matter how long occupancy stays under the low threshold. At most one
/// scale event results per tick, which bounds churn and gives hysteresis
/// between the two thresholds.
pub fn scale_action(
    occupancy: usize,
    capacity: usize,
    pool_size: usize,
    low_threshold: u8,
    high_threshold: u8,
) -> ScaleAction {
    debug_assert!(low_threshold < high_threshold);
    debug_assert!(capacity > 0);

    if occupancy * 100 > usize::from(high_threshold) * capacity {
        ScaleAction::Grow
    } else if occupancy * 100 < usize::from(low_threshold) * capacity && pool_size > 1 {
        ScaleAction::Shrink
    } else {
        ScaleAction::Hold
    }
}

// =============================================================================
// Worker Pool
// =============================================================================

/// Ordered collection of live worker handles
///
/// Owned and mutated exclusively by the controller thread. Invariant: once
/// the controller's startup [`grow`](Self::grow) has succeeded, the pool
/// holds at least one worker until [`drain`](Self::drain).
pub(crate) struct WorkerPool {
    workers: Vec<WorkerHandle>,
    next_id: usize,
    worker_queue: Arc<BoundedQueue<Item>>,
    output: Arc<BoundedQueue<Item>>,
    transform: Arc<dyn Transform>,
}

impl WorkerPool {
    pub(crate) fn new(
        worker_queue: Arc<BoundedQueue<Item>>,
        output: Arc<BoundedQueue<Item>>,
        transform: Arc<dyn Transform>,
    ) -> Self {
        Self { workers: Vec::new(), next_id: 0, worker_queue, output, transform }
    }

    /// Number of live workers
    pub(crate) fn len(&self) -> usize {
        self.workers.len()
    }

    /// The queue whose occupancy drives scaling decisions
    pub(crate) fn worker_queue(&self) -> &BoundedQueue<Item> {
        &self.worker_queue
    }

    /// Spawn one new worker and append it
    pub(crate) fn grow(&mut self) -> io::Result<()> {
        let handle = spawn_worker(
            self.next_id,
            Arc::clone(&self.worker_queue),
            Arc::clone(&self.output),
            Arc::clone(&self.transform),
        )?;
        self.next_id += 1;
        self.workers.push(handle);
        Ok(())
    }

    /// Cancel, join, and remove the most recently appended worker
    ///
    /// Callers must keep the pool above one worker; see [`scale_action`].
    pub(crate) fn shrink(&mut self) {
        debug_assert!(self.workers.len() > 1);
        if let Some(worker) = self.workers.pop() {
            worker.cancel();
            worker.join();
        }
    }

    /// Cancel every worker, then join them all (shutdown path)
    ///
    /// Cancelling first and joining second lets all workers wind down in
    /// parallel instead of one at a time.
    pub(crate) fn drain(&mut self) {
        for worker in &self.workers {
            worker.cancel();
        }
        for worker in self.workers.drain(..) {
            worker.join();
        }
    }
}
