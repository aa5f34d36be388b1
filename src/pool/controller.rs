//! Pool controller
//!
//! A single monitoring loop that samples worker-queue occupancy on a fixed
//! period and grows or shrinks the worker pool to keep occupancy inside the
//! configured band. The occupancy sample is an advisory snapshot (see
//! [`BoundedQueue::len`]); the controller treats it as a heuristic, never as
//! ground truth.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::item::Item;
use crate::queue::BoundedQueue;
use crate::transform::Transform;

use super::{scale_action, ScaleAction, WorkerPool};

/// Granularity of the tick sleep, so a stop request is observed promptly
/// even under a long check period
const SLEEP_SLICE: Duration = Duration::from_millis(5);

/// Handle to the running controller thread
pub struct ControllerHandle {
    stop: Arc<AtomicBool>,
    pool_size: Arc<AtomicUsize>,
    thread: JoinHandle<()>,
}

impl ControllerHandle {
    /// Current number of live workers
    ///
    /// Read from a gauge the controller updates after each scale event; like
    /// queue occupancy, this is a momentary snapshot.
    pub fn worker_count(&self) -> usize {
        self.pool_size.load(Ordering::Acquire)
    }

    /// Stop the control loop, cancel and join all workers, then join the
    /// controller thread itself
    pub(crate) fn stop_and_join(self) {
        self.stop.store(true, Ordering::Release);
        let _ = self.thread.join();
    }
}

/// Spawn the controller thread
///
/// The controller starts the pool's first worker itself, retrying every tick
/// if the spawn fails, so worker creation errors never escape the control
/// loop.
pub(crate) fn spawn_controller(
    worker_queue: Arc<BoundedQueue<Item>>,
    output: Arc<BoundedQueue<Item>>,
    transform: Arc<dyn Transform>,
    config: &Config,
) -> io::Result<ControllerHandle> {
    let stop = Arc::new(AtomicBool::new(false));
    let pool_size = Arc::new(AtomicUsize::new(1));

    let flag = Arc::clone(&stop);
    let gauge = Arc::clone(&pool_size);
    let period = Duration::from_micros(config.check_period_us);
    let low = config.low_threshold;
    let high = config.high_threshold;

    let thread = thread::Builder::new()
        .name("pipeflow-controller".to_string())
        .spawn(move || {
            let mut pool = WorkerPool::new(worker_queue, output, transform);
            tracing::debug!(period_us = period.as_micros() as u64, low, high, "controller started");

            // The pool must never run empty: keep trying to start the first
            // worker until it sticks or we are asked to stop.
            while pool.len() == 0 && !flag.load(Ordering::Acquire) {
                if let Err(e) = pool.grow() {
                    tracing::warn!(error = %e, "initial worker spawn failed, retrying");
                    sleep_or_stop(period, &flag);
                }
            }
            gauge.store(pool.len().max(1), Ordering::Release);

            while !flag.load(Ordering::Acquire) {
                sleep_or_stop(period, &flag);
                if flag.load(Ordering::Acquire) {
                    break;
                }

                let occupancy = pool.worker_queue().len();
                let capacity = pool.worker_queue().capacity();
                match scale_action(occupancy, capacity, pool.len(), low, high) {
                    ScaleAction::Grow => {
                        let before = pool.len();
                        match pool.grow() {
                            Ok(()) => {
                                gauge.store(pool.len(), Ordering::Release);
                                tracing::info!(
                                    before,
                                    after = pool.len(),
                                    occupancy,
                                    "scaling up workers"
                                );
                            }
                            // Must not crash the control loop; retry next tick.
                            Err(e) => {
                                tracing::warn!(error = %e, "worker spawn failed, retrying next tick");
                            }
                        }
                    }
                    ScaleAction::Shrink => {
                        let before = pool.len();
                        pool.shrink();
                        gauge.store(pool.len(), Ordering::Release);
                        tracing::info!(before, after = pool.len(), occupancy, "scaling down workers");
                    }
                    ScaleAction::Hold => {}
                }
            }

            let live = pool.len();
            pool.drain();
            gauge.store(0, Ordering::Release);
            tracing::debug!(drained = live, "controller exiting");
        })?;

    Ok(ControllerHandle { stop, pool_size, thread })
}

/// Sleep for one check period, waking early if a stop was requested
fn sleep_or_stop(period: Duration, stop: &AtomicBool) {
    let deadline = Instant::now() + period;
    while !stop.load(Ordering::Acquire) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep((deadline - now).min(SLEEP_SLICE));
    }
}
