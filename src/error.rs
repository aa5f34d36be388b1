//! Error types for pipeflow
//!
//! Provides a unified error type for pipeline construction and shutdown.
//! The data path itself is infallible by design: queue operations block
//! rather than fail, and the pool controller absorbs worker spawn errors
//! (logs and retries on the next tick) instead of propagating them.

use thiserror::Error;

/// Result type alias using PipelineError
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Unified error type for pipeflow operations
#[derive(Debug, Error)]
pub enum PipelineError {
    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Thread Spawn Errors
    // -------------------------------------------------------------------------
    /// Raised only during initial pipeline setup; once the pipeline is
    /// running, spawn failures are absorbed by the controller.
    #[error("Thread spawn failed: {0}")]
    Spawn(#[from] std::io::Error),
}
