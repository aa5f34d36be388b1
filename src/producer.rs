//! Producer stage
//!
//! Producers drain the input queue, apply the stage-A transform, and push the
//! result into the worker queue. Several producers run the same loop
//! concurrently; the input queue's internal lock is the sole ordering
//! authority across them. No guarantee exists about which producer processes
//! which item, only that each item is processed exactly once.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::item::Item;
use crate::queue::BoundedQueue;
use crate::transform::Transform;

/// Back-off while the input queue is empty, keeping the stop flag responsive
const IDLE_POLL: Duration = Duration::from_micros(100);

/// Handle to a running producer thread
pub struct ProducerHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl ProducerHandle {
    /// Request a cooperative stop
    ///
    /// The flag is only observed between items; an item already taken from
    /// the input queue is always forwarded before the thread exits.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Wait for the producer thread to exit
    pub fn join(self) {
        let _ = self.thread.join();
    }
}

/// Spawn one producer thread
pub(crate) fn spawn_producer(
    id: usize,
    input: Arc<BoundedQueue<Item>>,
    worker_queue: Arc<BoundedQueue<Item>>,
    transform: Arc<dyn Transform>,
) -> io::Result<ProducerHandle> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);

    let thread = thread::Builder::new()
        .name(format!("pipeflow-producer-{id}"))
        .spawn(move || {
            tracing::debug!(id, "producer started");
            while !flag.load(Ordering::Acquire) {
                match input.try_take() {
                    Some(item) => {
                        let value = transform.stage_a(item.opcode, item.value);
                        worker_queue.put(item.with_value(value));
                    }
                    None => thread::sleep(IDLE_POLL),
                }
            }
            tracing::debug!(id, "producer exiting");
        })?;

    Ok(ProducerHandle { stop, thread })
}
