//! pipeflow Demo Binary
//!
//! Drives the pipeline with synthetic load: a reader thread feeds N items
//! into the input queue and a writer thread drains N results from the output
//! queue, playing the two external collaborators the library deliberately
//! leaves out. Reports throughput and the peak worker count observed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use pipeflow::transform::{Arithmetic, Transform, OP_ADD, OP_SUB, OP_XOR};
use pipeflow::{Config, Item, Pipeline};
use tracing_subscriber::{fmt, EnvFilter};

/// pipeflow load driver
#[derive(Parser, Debug)]
#[command(name = "pipeflow")]
#[command(about = "Self-scaling concurrent processing pipeline demo")]
#[command(version)]
struct Args {
    /// Number of items to push through the pipeline
    #[arg(short = 'n', long, default_value = "100000")]
    items: u64,

    /// Number of producer threads
    #[arg(short, long, default_value = "4")]
    producers: usize,

    /// Input queue capacity
    #[arg(long, default_value = "200")]
    input_cap: usize,

    /// Worker queue capacity
    #[arg(long, default_value = "200")]
    worker_cap: usize,

    /// Output queue capacity
    #[arg(long, default_value = "4000")]
    output_cap: usize,

    /// Pool controller check period in microseconds
    #[arg(long, default_value = "10000")]
    check_period_us: u64,

    /// Scale-down occupancy threshold (percent)
    #[arg(long, default_value = "20")]
    low: u8,

    /// Scale-up occupancy threshold (percent)
    #[arg(long, default_value = "80")]
    high: u8,

    /// Artificial per-item stage-B cost in microseconds, to make the worker
    /// queue back up and the pool scale visibly
    #[arg(long, default_value = "0")]
    slow_us: u64,

    /// Operand folded into every value by the arithmetic transform
    #[arg(long, default_value = "7")]
    operand: u64,
}

/// Wraps a transform with an artificial stage-B delay
struct Throttled<T> {
    inner: T,
    delay: Duration,
}

impl<T: Transform> Transform for Throttled<T> {
    fn stage_a(&self, opcode: u8, value: u64) -> u64 {
        self.inner.stage_a(opcode, value)
    }

    fn stage_b(&self, opcode: u8, value: u64) -> u64 {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.inner.stage_b(opcode, value)
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pipeflow=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("pipeflow v{}", pipeflow::VERSION);
    tracing::info!(items = args.items, producers = args.producers, "starting load run");

    let config = Config::builder()
        .input_capacity(args.input_cap)
        .worker_capacity(args.worker_cap)
        .output_capacity(args.output_cap)
        .producer_count(args.producers)
        .check_period_us(args.check_period_us)
        .low_threshold(args.low)
        .high_threshold(args.high)
        .build();

    let transform = Arc::new(Throttled {
        inner: Arithmetic::new(args.operand),
        delay: Duration::from_micros(args.slow_us),
    });

    let pipeline = match Pipeline::start(config, transform) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Failed to start pipeline: {}", e);
            std::process::exit(1);
        }
    };

    let input = pipeline.input();
    let output = pipeline.output();
    let items = args.items;
    let start = Instant::now();

    let mut peak_workers = 1;
    let done = std::sync::atomic::AtomicBool::new(false);
    let checksum = crossbeam::thread::scope(|s| {
        // Reader: feed N synthetic items, cycling through the opcodes
        s.spawn(|_| {
            for key in 0..items {
                let opcode = match key % 3 {
                    0 => OP_ADD,
                    1 => OP_SUB,
                    _ => OP_XOR,
                };
                input.put(Item::new(key, key.wrapping_mul(31), opcode));
            }
        });

        // Writer: drain N results, folding them into a checksum
        let writer = s.spawn(|_| {
            let mut checksum = 0u64;
            for _ in 0..items {
                let item = output.take();
                checksum ^= item.value.wrapping_add(item.key);
            }
            done.store(true, std::sync::atomic::Ordering::Release);
            checksum
        });

        // Sample the pool size while the run is in flight
        while !done.load(std::sync::atomic::Ordering::Acquire) {
            peak_workers = peak_workers.max(pipeline.worker_count());
            std::thread::sleep(Duration::from_millis(5));
        }

        writer.join().expect("writer thread panicked")
    })
    .expect("driver thread panicked");

    let elapsed = start.elapsed();
    let throughput = items as f64 / elapsed.as_secs_f64();
    tracing::info!(
        items,
        elapsed_ms = elapsed.as_millis() as u64,
        throughput = format!("{throughput:.0} items/s"),
        peak_workers,
        checksum = format!("{checksum:#018x}"),
        "run complete"
    );

    if let Err(e) = pipeline.shutdown() {
        tracing::error!("Shutdown error: {}", e);
        std::process::exit(1);
    }
}
