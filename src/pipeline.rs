//! Pipeline Module
//!
//! The coordinator that wires all components together.
//!
//! ## Responsibilities
//! - Validate configuration and build the three bounded queues
//! - Spawn producers and the pool controller (which owns the worker pool)
//! - Hand out queue handles for the external Reader and Writer
//! - Tear everything down cooperatively on shutdown
//!
//! ## Concurrency Model
//!
//! One OS thread per producer, per live worker, and one for the controller.
//! The only shared mutable state is each queue's internal lock, the per-thread
//! stop/cancel flags, and the controller's pool-size gauge. The worker list is
//! mutated by the controller thread alone.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::item::Item;
use crate::pool::{spawn_controller, ControllerHandle};
use crate::producer::{spawn_producer, ProducerHandle};
use crate::queue::BoundedQueue;
use crate::transform::Transform;

/// A running pipeline
///
/// Constructed with [`Pipeline::start`]; torn down with
/// [`Pipeline::shutdown`]. The external Reader feeds [`Pipeline::input`] and
/// the external Writer drains [`Pipeline::output`]; completion signalling
/// between them (for example a known item count) is their contract, not the
/// pipeline's.
pub struct Pipeline {
    input: Arc<BoundedQueue<Item>>,
    worker_queue: Arc<BoundedQueue<Item>>,
    output: Arc<BoundedQueue<Item>>,
    producers: Vec<ProducerHandle>,
    controller: ControllerHandle,
}

impl Pipeline {
    /// Validate the config and start all pipeline threads
    ///
    /// Spawns `producer_count` producers and the pool controller; the
    /// controller starts the pool's first worker as its own first action.
    /// Spawn failures at this stage are returned as
    /// [`crate::PipelineError::Spawn`]; threads already started are stopped
    /// before the error is returned.
    pub fn start(config: Config, transform: Arc<dyn Transform>) -> Result<Self> {
        config.validate()?;

        let input = Arc::new(BoundedQueue::new(config.input_capacity));
        let worker_queue = Arc::new(BoundedQueue::new(config.worker_capacity));
        let output = Arc::new(BoundedQueue::new(config.output_capacity));

        let mut producers = Vec::with_capacity(config.producer_count);
        for id in 0..config.producer_count {
            let spawned = spawn_producer(
                id,
                Arc::clone(&input),
                Arc::clone(&worker_queue),
                Arc::clone(&transform),
            );
            match spawned {
                Ok(handle) => producers.push(handle),
                Err(e) => {
                    stop_producers(producers);
                    return Err(e.into());
                }
            }
        }

        let controller = match spawn_controller(
            Arc::clone(&worker_queue),
            Arc::clone(&output),
            transform,
            &config,
        ) {
            Ok(handle) => handle,
            Err(e) => {
                stop_producers(producers);
                return Err(e.into());
            }
        };

        tracing::info!(
            producers = config.producer_count,
            input_capacity = config.input_capacity,
            worker_capacity = config.worker_capacity,
            output_capacity = config.output_capacity,
            "pipeline started"
        );

        Ok(Self { input, worker_queue, output, producers, controller })
    }

    /// Queue the external Reader feeds
    pub fn input(&self) -> Arc<BoundedQueue<Item>> {
        Arc::clone(&self.input)
    }

    /// Queue the external Writer drains
    pub fn output(&self) -> Arc<BoundedQueue<Item>> {
        Arc::clone(&self.output)
    }

    /// Momentary occupancy of the intermediate worker queue (advisory)
    pub fn worker_queue_len(&self) -> usize {
        self.worker_queue.len()
    }

    /// Current number of live workers (advisory snapshot of the pool gauge)
    pub fn worker_count(&self) -> usize {
        self.controller.worker_count()
    }

    /// Stop all pipeline threads cooperatively
    ///
    /// Producers are stopped and joined first so nothing new enters the
    /// worker queue, then the controller cancels and joins every worker.
    /// Items still buffered in the queues when shutdown begins stay there;
    /// callers that need every result must drain the output queue before
    /// calling this.
    pub fn shutdown(self) -> Result<()> {
        for producer in &self.producers {
            producer.stop();
        }
        for producer in self.producers {
            producer.join();
        }
        self.controller.stop_and_join();
        tracing::info!("pipeline stopped");
        Ok(())
    }
}

/// Stop and join producers spawned before a setup failure
fn stop_producers(producers: Vec<ProducerHandle>) {
    for producer in &producers {
        producer.stop();
    }
    for producer in producers {
        producer.join();
    }
}
