//! # pipeflow
//!
//! A self-scaling, multi-stage concurrent processing pipeline:
//! - Bounded blocking FIFO queues as the backpressure mechanism between stages
//! - A fixed set of producer threads applying the stage-A transform
//! - A dynamic pool of worker threads applying the stage-B transform
//! - A pool controller that grows/shrinks the worker pool from live queue
//!   occupancy
//!
//! ## Architecture Overview
//!
//! ```text
//!                ┌──────────────┐
//!   Reader ────▶ │ input queue  │
//!                └──────┬───────┘
//!                       │
//!            ┌──────────▼──────────┐
//!            │   Producer × k      │  stage-A transform
//!            └──────────┬──────────┘
//!                       │
//!                ┌──────▼───────┐       ┌────────────────┐
//!                │ worker queue │◀────── │ PoolController │
//!                └──────┬───────┘  size │  (grow/shrink) │
//!                       │               └───────┬────────┘
//!            ┌──────────▼──────────┐           │ spawn/cancel
//!            │   Worker × dynamic  │◀──────────┘
//!            └──────────┬──────────┘  stage-B transform
//!                       │
//!                ┌──────▼───────┐
//!                │ output queue │ ────▶ Writer
//!                └──────────────┘
//! ```
//!
//! The external Reader and Writer are not part of this crate; they feed the
//! input queue and drain the output queue through the [`Pipeline::input`] and
//! [`Pipeline::output`] handles.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod item;
pub mod transform;
pub mod queue;
pub mod producer;
pub mod worker;
pub mod pool;
pub mod pipeline;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PipelineError, Result};
pub use config::Config;
pub use item::Item;
pub use transform::{Arithmetic, Identity, Transform};
pub use queue::BoundedQueue;
pub use pipeline::Pipeline;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of pipeflow
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
