//! Configuration for pipeflow
//!
//! Centralized configuration with sensible defaults. The defaults mirror the
//! classic pipeline shape: small bounded buffers between stages, a larger
//! output buffer, and a one-second control tick.

use crate::error::{PipelineError, Result};

/// Main configuration for a [`crate::Pipeline`] instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Queue Configuration
    // -------------------------------------------------------------------------
    /// Max items buffered between the Reader and the producers
    pub input_capacity: usize,

    /// Max items buffered between producers and workers.
    /// Occupancy of this queue is the pool controller's scaling signal.
    pub worker_capacity: usize,

    /// Max items buffered between workers and the Writer
    pub output_capacity: usize,

    // -------------------------------------------------------------------------
    // Producer Configuration
    // -------------------------------------------------------------------------
    /// Number of producer threads draining the input queue
    pub producer_count: usize,

    // -------------------------------------------------------------------------
    // Pool Controller Configuration
    // -------------------------------------------------------------------------
    /// Sampling interval of the pool controller, in microseconds
    pub check_period_us: u64,

    /// Worker-queue occupancy percentage below which the pool shrinks by one
    pub low_threshold: u8,

    /// Worker-queue occupancy percentage above which the pool grows by one
    pub high_threshold: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_capacity: 200,
            worker_capacity: 200,
            output_capacity: 4000,
            producer_count: 4,
            check_period_us: 1_000_000,
            low_threshold: 20,
            high_threshold: 80,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validate all constraints
    ///
    /// - every queue capacity > 0
    /// - producer count >= 1
    /// - check period > 0
    /// - thresholds in 0..=100 with `low_threshold < high_threshold`
    pub fn validate(&self) -> Result<()> {
        if self.input_capacity == 0 || self.worker_capacity == 0 || self.output_capacity == 0 {
            return Err(PipelineError::Config(
                "queue capacities must be greater than zero".to_string(),
            ));
        }
        if self.producer_count == 0 {
            return Err(PipelineError::Config(
                "producer count must be at least 1".to_string(),
            ));
        }
        if self.check_period_us == 0 {
            return Err(PipelineError::Config(
                "check period must be greater than zero".to_string(),
            ));
        }
        if self.low_threshold > 100 || self.high_threshold > 100 {
            return Err(PipelineError::Config(format!(
                "thresholds must be percentages in 0..=100, got low={} high={}",
                self.low_threshold, self.high_threshold
            )));
        }
        if self.low_threshold >= self.high_threshold {
            return Err(PipelineError::Config(format!(
                "low threshold ({}) must be strictly below high threshold ({})",
                self.low_threshold, self.high_threshold
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the input queue capacity
    pub fn input_capacity(mut self, capacity: usize) -> Self {
        self.config.input_capacity = capacity;
        self
    }

    /// Set the worker queue capacity
    pub fn worker_capacity(mut self, capacity: usize) -> Self {
        self.config.worker_capacity = capacity;
        self
    }

    /// Set the output queue capacity
    pub fn output_capacity(mut self, capacity: usize) -> Self {
        self.config.output_capacity = capacity;
        self
    }

    /// Set the number of producer threads
    pub fn producer_count(mut self, count: usize) -> Self {
        self.config.producer_count = count;
        self
    }

    /// Set the pool controller sampling interval (in microseconds)
    pub fn check_period_us(mut self, period: u64) -> Self {
        self.config.check_period_us = period;
        self
    }

    /// Set the scale-down occupancy threshold (percent)
    pub fn low_threshold(mut self, percent: u8) -> Self {
        self.config.low_threshold = percent;
        self
    }

    /// Set the scale-up occupancy threshold (percent)
    pub fn high_threshold(mut self, percent: u8) -> Self {
        self.config.high_threshold = percent;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
