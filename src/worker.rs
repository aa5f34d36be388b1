//! Worker (consumer) stage
//!
//! Workers drain the worker queue, apply the stage-B transform, and push the
//! result into the output queue. Workers are the only cancellable threads in
//! the pipeline, and only cooperatively: the cancellation flag is checked at
//! a safe point between items, never while an item is held.
//!
//! ## Cancellation guarantee
//!
//! The dequeue→transform→enqueue sequence is a non-cancellable window. An
//! item is either fully forwarded to the output queue or never removed from
//! the worker queue; cancelling a worker mid-processing cannot lose or
//! duplicate an item. The thread is joined after it observes the flag, never
//! killed.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::item::Item;
use crate::queue::BoundedQueue;
use crate::transform::Transform;

/// Back-off while the worker queue is empty, keeping cancellation responsive
const IDLE_POLL: Duration = Duration::from_micros(100);

/// Handle to a running worker thread
pub struct WorkerHandle {
    cancel: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl WorkerHandle {
    /// Set the cancellation flag
    ///
    /// The worker finishes any item currently inside its non-cancellable
    /// window, then observes the flag and exits.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// Wait for the worker thread to exit
    pub fn join(self) {
        let _ = self.thread.join();
    }
}

/// Spawn one worker thread
pub(crate) fn spawn_worker(
    id: usize,
    worker_queue: Arc<BoundedQueue<Item>>,
    output: Arc<BoundedQueue<Item>>,
    transform: Arc<dyn Transform>,
) -> io::Result<WorkerHandle> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    let thread = thread::Builder::new()
        .name(format!("pipeflow-worker-{id}"))
        .spawn(move || {
            tracing::debug!(id, "worker started");
            while !flag.load(Ordering::Acquire) {
                // Non-cancellable window: once try_take returns an item it is
                // always transformed and forwarded, even if the flag was set
                // in the meantime.
                match worker_queue.try_take() {
                    Some(item) => {
                        let value = transform.stage_b(item.opcode, item.value);
                        output.put(item.with_value(value));
                    }
                    None => thread::sleep(IDLE_POLL),
                }
            }
            tracing::debug!(id, "worker exiting");
        })?;

    Ok(WorkerHandle { cancel, thread })
}
