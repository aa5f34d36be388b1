//! Tests for the bounded blocking queue
//!
//! These tests verify:
//! - Strict FIFO ordering
//! - Blocking behavior of put/take at the capacity boundaries
//! - Occupancy staying inside [0, capacity] under concurrent hammering
//! - Exactly-once delivery with many producers and consumers

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use pipeflow::BoundedQueue;

// =============================================================================
// FIFO Ordering Tests
// =============================================================================

#[test]
fn test_fifo_single_producer_single_consumer() {
    let queue: BoundedQueue<u64> = BoundedQueue::new(8);

    crossbeam::thread::scope(|s| {
        s.spawn(|_| {
            for i in 0..1000u64 {
                queue.put(i);
            }
        });

        for expected in 0..1000u64 {
            assert_eq!(queue.take(), expected);
        }
    })
    .unwrap();

    assert!(queue.is_empty());
}

#[test]
fn test_try_take_returns_none_on_empty() {
    let queue: BoundedQueue<u64> = BoundedQueue::new(4);

    assert_eq!(queue.try_take(), None);

    queue.put(42);
    assert_eq!(queue.try_take(), Some(42));
    assert_eq!(queue.try_take(), None);
}

#[test]
fn test_capacity_is_fixed_at_construction() {
    let queue: BoundedQueue<u64> = BoundedQueue::new(17);
    assert_eq!(queue.capacity(), 17);
    assert_eq!(queue.len(), 0);
}

#[test]
#[should_panic(expected = "capacity must be greater than zero")]
fn test_zero_capacity_rejected() {
    let _queue: BoundedQueue<u64> = BoundedQueue::new(0);
}

// =============================================================================
// Blocking Behavior Tests
// =============================================================================

#[test]
fn test_put_blocks_while_full_until_take() {
    let queue: BoundedQueue<u64> = BoundedQueue::new(1);
    let second_put_done = AtomicBool::new(false);

    queue.put(1);

    crossbeam::thread::scope(|s| {
        s.spawn(|_| {
            queue.put(2);
            second_put_done.store(true, Ordering::Release);
        });

        // The queue is full, so the second put must still be parked.
        thread::sleep(Duration::from_millis(100));
        assert!(!second_put_done.load(Ordering::Acquire));

        assert_eq!(queue.take(), 1);
    })
    .unwrap();

    assert!(second_put_done.load(Ordering::Acquire));
    assert_eq!(queue.take(), 2);
}

#[test]
fn test_take_blocks_while_empty_until_put() {
    let queue: BoundedQueue<u64> = BoundedQueue::new(4);
    let take_done = AtomicBool::new(false);

    crossbeam::thread::scope(|s| {
        s.spawn(|_| {
            assert_eq!(queue.take(), 7);
            take_done.store(true, Ordering::Release);
        });

        thread::sleep(Duration::from_millis(100));
        assert!(!take_done.load(Ordering::Acquire));

        queue.put(7);
    })
    .unwrap();

    assert!(take_done.load(Ordering::Acquire));
}

// =============================================================================
// Concurrent Invariant Tests
// =============================================================================

#[test]
fn test_occupancy_bounded_and_exactly_once_under_contention() {
    const PRODUCERS: usize = 4;
    const CONSUMERS: usize = 4;
    const PER_PRODUCER: usize = 500;
    const TOTAL: usize = PRODUCERS * PER_PRODUCER;

    let queue: BoundedQueue<usize> = BoundedQueue::new(4);
    let consumed = AtomicUsize::new(0);
    let queue = &queue;
    let consumed = &consumed;

    let mut all: Vec<usize> = crossbeam::thread::scope(|s| {
        for p in 0..PRODUCERS {
            s.spawn(move |_| {
                for i in 0..PER_PRODUCER {
                    queue.put(p * PER_PRODUCER + i);
                }
            });
        }

        // Advisory occupancy must never escape [0, capacity] at any
        // observation point.
        s.spawn(|_| {
            while consumed.load(Ordering::Acquire) < TOTAL {
                assert!(queue.len() <= queue.capacity());
                thread::yield_now();
            }
        });

        let consumers: Vec<_> = (0..CONSUMERS)
            .map(|_| {
                s.spawn(|_| {
                    let mut got = Vec::with_capacity(TOTAL / CONSUMERS);
                    for _ in 0..TOTAL / CONSUMERS {
                        got.push(queue.take());
                        consumed.fetch_add(1, Ordering::Release);
                    }
                    got
                })
            })
            .collect();

        consumers.into_iter().flat_map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    // Every produced value consumed exactly once, none lost or duplicated.
    all.sort_unstable();
    let expected: Vec<usize> = (0..TOTAL).collect();
    assert_eq!(all, expected);
    assert!(queue.is_empty());
}
