//! Safe producer and consumer endpoints for a [`RingBuffer`].
//!
//! [`RingBuffer::split`] moves the buffer behind an `Arc` and returns one
//! [`Producer`] and one [`Consumer`]. Neither is `Clone`, and every operation
//! that moves a cursor takes `&mut self`, so the single-producer /
//! single-consumer discipline holds by construction. The buffer is freed
//! when both endpoints have been dropped.
//!
//! ```
//! use spsc_ring::RingBuffer;
//! use std::thread;
//!
//! let (mut tx, mut rx) = RingBuffer::<u64>::new(64).split();
//!
//! let producer = thread::spawn(move || {
//!     for i in 0..1_000 {
//!         while !tx.push(i) {
//!             std::hint::spin_loop();
//!         }
//!     }
//! });
//!
//! let mut sum = 0;
//! let mut received = 0;
//! while received < 1_000 {
//!     received += rx.consume_batch(|v| sum += v);
//! }
//!
//! producer.join().unwrap();
//! assert_eq!(sum, 999 * 1_000 / 2);
//! ```

use crate::{MetricsSnapshot, PushError, RingBuffer};
use std::fmt;
use std::sync::Arc;

/// The writing endpoint of a split [`RingBuffer`].
pub struct Producer<T> {
    ring: Arc<RingBuffer<T>>,
}

impl<T> Producer<T> {
    pub(crate) fn new(ring: Arc<RingBuffer<T>>) -> Self {
        Self { ring }
    }

    /// Pushes a value, returning `false` (and dropping it) if the buffer is full.
    #[inline]
    pub fn push(&mut self, value: T) -> bool {
        // SAFETY: `&mut self` on the only Producer makes this the only producer.
        unsafe { self.ring.push(value) }
    }

    /// Pushes a value, handing it back if the buffer is full.
    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<(), PushError<T>> {
        // SAFETY: `&mut self` on the only Producer makes this the only producer.
        unsafe { self.ring.try_push(value) }
    }

    /// Number of values that could be pushed right now (snapshot).
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.ring.usable_capacity() - self.ring.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.ring.metrics()
    }
}

/// The reading endpoint of a split [`RingBuffer`].
pub struct Consumer<T> {
    ring: Arc<RingBuffer<T>>,
}

impl<T> Consumer<T> {
    pub(crate) fn new(ring: Arc<RingBuffer<T>>) -> Self {
        Self { ring }
    }

    /// Pops the oldest value, or `None` if the buffer is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        // SAFETY: `&mut self` on the only Consumer makes this the only consumer.
        unsafe { self.ring.pop() }
    }

    /// Pops every value visible now with a single cursor update.
    pub fn consume_batch<F>(&mut self, handler: F) -> usize
    where
        F: FnMut(T),
    {
        // SAFETY: `&mut self` on the only Consumer makes this the only consumer.
        unsafe { self.ring.consume_batch(handler) }
    }

    /// Pops at most `max_items` values with a single cursor update.
    pub fn consume_up_to<F>(&mut self, max_items: usize, handler: F) -> usize
    where
        F: FnMut(T),
    {
        // SAFETY: `&mut self` on the only Consumer makes this the only consumer.
        unsafe { self.ring.consume_up_to(max_items, handler) }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.ring.metrics()
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").field("ring", &self.ring).finish()
    }
}

impl<T> fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer").field("ring", &self.ring).finish()
    }
}
