//! Bounded blocking FIFO queue
//!
//! The backpressure mechanism between pipeline stages. A fixed-capacity
//! channel with blocking `put`/`take`: a full queue stalls its producers, an
//! empty queue stalls its consumers. There is no timeout and no cancellation
//! inside the queue itself; callers that need cancellation build it above the
//! queue with [`BoundedQueue::try_take`].
//!
//! ## Invariants
//!
//! - Strict FIFO: items dequeue in the exact order their `put` calls were
//!   serialized by the internal lock, regardless of calling thread.
//! - `0 <= len <= capacity` at every observation point.
//! - No item is ever lost, duplicated, or reordered.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// Fixed-capacity thread-safe FIFO channel with blocking put/take
pub struct BoundedQueue<T> {
    /// Buffer holding queued items, guarded by the serializing lock
    inner: Mutex<VecDeque<T>>,

    /// Signalled when an item is added (wakes one blocked `take`)
    not_empty: Condvar,

    /// Signalled when an item is removed (wakes one blocked `put`)
    not_full: Condvar,

    /// Maximum number of buffered items, fixed at construction
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Create a queue with the given capacity
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be greater than zero");
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    /// Append an item to the end of the queue
    ///
    /// Blocks while the queue is full, then appends and wakes one blocked
    /// [`take`](Self::take).
    pub fn put(&self, item: T) {
        let mut buffer = self.inner.lock();
        while buffer.len() == self.capacity {
            self.not_full.wait(&mut buffer);
        }
        buffer.push_back(item);
        self.not_empty.notify_one();
    }

    /// Remove and return the oldest item
    ///
    /// Blocks while the queue is empty, then removes the head and wakes one
    /// blocked [`put`](Self::put).
    pub fn take(&self) -> T {
        let mut buffer = self.inner.lock();
        while buffer.is_empty() {
            self.not_empty.wait(&mut buffer);
        }
        let item = buffer.pop_front().expect("queue non-empty after wait");
        self.not_full.notify_one();
        item
    }

    /// Remove and return the oldest item without blocking
    ///
    /// Returns `None` if the queue is empty at the moment the lock is taken.
    /// This is the hook cancellable loops use: checking emptiness and
    /// dequeuing happen under one lock acquisition, so a caller is never left
    /// blocked on a queue another consumer drained first.
    pub fn try_take(&self) -> Option<T> {
        let mut buffer = self.inner.lock();
        let item = buffer.pop_front()?;
        self.not_full.notify_one();
        Some(item)
    }

    /// Momentary occupancy snapshot
    ///
    /// Advisory only: the value may be stale immediately after this returns.
    /// It is the scaling signal for the pool controller, never a correctness
    /// input.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the queue is momentarily empty (advisory, see [`len`](Self::len))
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Maximum number of buffered items
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
