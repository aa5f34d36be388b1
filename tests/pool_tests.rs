//! Tests for the scaling policy and the pool controller
//!
//! These tests verify:
//! - The pure scaling decision at and around both thresholds
//! - Pool growth under sustained worker-queue backlog
//! - Pool shrinkage back to exactly one worker once the backlog drains
//! - No item lost or duplicated while the pool churns

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pipeflow::pool::{scale_action, ScaleAction};
use pipeflow::transform::OP_ADD;
use pipeflow::{Config, Item, Pipeline, Transform};

// =============================================================================
// Scaling Policy Tests
// =============================================================================

#[test]
fn test_grow_only_strictly_above_high_threshold() {
    // 80% of 200 is 160: exactly at the threshold holds, one above grows.
    assert_eq!(scale_action(160, 200, 1, 20, 80), ScaleAction::Hold);
    assert_eq!(scale_action(161, 200, 1, 20, 80), ScaleAction::Grow);
    assert_eq!(scale_action(200, 200, 5, 20, 80), ScaleAction::Grow);
}

#[test]
fn test_shrink_only_strictly_below_low_threshold() {
    // 20% of 200 is 40: exactly at the threshold holds, one below shrinks.
    assert_eq!(scale_action(40, 200, 2, 20, 80), ScaleAction::Hold);
    assert_eq!(scale_action(39, 200, 2, 20, 80), ScaleAction::Shrink);
    assert_eq!(scale_action(0, 200, 2, 20, 80), ScaleAction::Shrink);
}

#[test]
fn test_never_shrinks_last_worker() {
    assert_eq!(scale_action(0, 200, 1, 20, 80), ScaleAction::Hold);
    assert_eq!(scale_action(39, 200, 1, 20, 80), ScaleAction::Hold);
}

#[test]
fn test_holds_inside_hysteresis_band() {
    for occupancy in 40..=160 {
        assert_eq!(
            scale_action(occupancy, 200, 3, 20, 80),
            ScaleAction::Hold,
            "unexpected action at occupancy {occupancy}"
        );
    }
}

// =============================================================================
// Controller Behavior Tests
// =============================================================================

/// Identity values with an artificial stage-B cost, so the worker queue
/// backs up and scaling becomes observable.
struct SlowStageB {
    delay: Duration,
}

impl Transform for SlowStageB {
    fn stage_a(&self, _opcode: u8, value: u64) -> u64 {
        value
    }

    fn stage_b(&self, _opcode: u8, value: u64) -> u64 {
        thread::sleep(self.delay);
        value
    }
}

/// Poll `probe` until it returns true or the timeout elapses.
fn wait_until(timeout: Duration, mut probe: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if probe() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn test_pool_scales_with_backlog_and_loses_nothing() {
    const ITEMS: u64 = 400;

    let config = Config::builder()
        .input_capacity(100)
        .worker_capacity(10)
        .output_capacity(1000)
        .producer_count(2)
        .check_period_us(5_000)
        .low_threshold(20)
        .high_threshold(80)
        .build();

    let transform = Arc::new(SlowStageB { delay: Duration::from_millis(2) });
    let pipeline = Pipeline::start(config, transform).unwrap();
    let input = pipeline.input();
    let output = pipeline.output();

    crossbeam::thread::scope(|s| {
        s.spawn(|_| {
            for key in 0..ITEMS {
                input.put(Item::new(key, key, OP_ADD));
            }
        });

        // Sustained occupancy above the high threshold must grow the pool.
        let grew = wait_until(Duration::from_secs(5), || pipeline.worker_count() >= 3);
        assert!(grew, "pool never grew past {} workers", pipeline.worker_count());

        // Once the backlog drains, occupancy sits below the low threshold and
        // the controller retires workers one per tick back down to the floor.
        let shrank = wait_until(Duration::from_secs(20), || pipeline.worker_count() == 1);
        assert!(shrank, "pool stuck at {} workers", pipeline.worker_count());

        // The floor holds no matter how long occupancy stays low.
        for _ in 0..20 {
            assert!(pipeline.worker_count() >= 1);
            thread::sleep(Duration::from_millis(10));
        }
    })
    .unwrap();

    // Every item fed during the churn must come out exactly once.
    let mut received = Vec::with_capacity(ITEMS as usize);
    for _ in 0..ITEMS {
        received.push(output.take());
    }
    assert!(output.try_take().is_none(), "duplicate item left in the output queue");

    received.sort_by_key(|item| item.key);
    for (expected_key, item) in (0..ITEMS).zip(&received) {
        assert_eq!(item.key, expected_key);
        assert_eq!(item.value, expected_key);
    }

    pipeline.shutdown().unwrap();
}
