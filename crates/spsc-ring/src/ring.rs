use crate::invariants::{
    debug_assert_cursor_in_range, debug_assert_slot_occupied, debug_assert_slot_vacant,
};
use crate::{Config, Consumer, Metrics, MetricsSnapshot, Producer, PushError, RingError};
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// ## Wrapped Cursors With A Sentinel Slot
//
// `head` and `tail` are slot indices in `[0, capacity)` that wrap to 0 after
// the last slot. With only two cursors, `head == tail` has to mean one
// thing, so it means "empty", and the producer refuses to advance `tail`
// onto `head`. One slot therefore stays unused and the ring holds at most
// `capacity - 1` values.
//
// ## Memory Ordering Protocol
//
// **Producer (push):**
// 1. Load `tail` with Relaxed (only the producer writes tail)
// 2. Load `head` with Acquire (synchronizes with the consumer's clear)
// 3. If `next(tail) == head`: full, nothing changes
// 4. Write the value into `slots[tail]`
// 5. Store `next(tail)` into `tail` with Release (publishes the slot)
//
// **Consumer (pop):**
// 1. Load `head` with Relaxed (only the consumer writes head)
// 2. Load `tail` with Acquire (synchronizes with the producer's write)
// 3. If `head == tail`: empty, nothing changes
// 4. Take the value out of `slots[head]`, leaving the slot empty
// 5. Store `next(head)` into `head` with Release (hands the slot back)
//
// ## Single-Writer Invariants
//
// - `tail`: written only by the producer
// - `head`: written only by the consumer
// - `slots[i]`: touched by the producer while `i` is outside `[head, tail)`,
//   by the consumer while `i` is inside it
//
// No compare-and-swap is needed anywhere because no cursor ever has two
// writers. The unsafe `push`/`pop` entry points make the caller promise
// this; `Producer`/`Consumer` promise it through `&mut self`.
//
// ## Layout
//
// Both cursors sit in `CachePadded` so each owns a full cache line (128
// bytes on x86_64 and aarch64, where the adjacent-line prefetcher pulls
// pairs of 64-byte lines). The read-only fields after `tail` are pushed
// onto their own line by tail's padding.
//
// =============================================================================

/// Alignment of each cursor; consecutive cursors are at least this far apart.
pub const CURSOR_ALIGN: usize = std::mem::align_of::<CachePadded<AtomicUsize>>();

type Slot<T> = UnsafeCell<Option<T>>;

/// Bounded single-producer single-consumer ring buffer.
///
/// A fixed array of `capacity` slots shared between exactly one producer and
/// one consumer through two cache-padded atomic cursors. Holds at most
/// `capacity - 1` values.
///
/// The shared-reference `push`/`pop` methods are `unsafe` because calling
/// either from two threads at once is a data race. [`split`](Self::split)
/// hands out a [`Producer`] and a [`Consumer`] whose methods are safe.
#[repr(C)]
pub struct RingBuffer<T> {
    // === CONSUMER HOT ===
    /// Next slot to read (written by consumer, read by producer)
    head: CachePadded<AtomicUsize>,

    // === PRODUCER HOT ===
    /// Next slot to write (written by producer, read by consumer)
    tail: CachePadded<AtomicUsize>,

    // === COLD STATE === (read-only after construction, except counters)
    capacity: usize,
    config: Config,
    metrics: Metrics,

    // === DATA BUFFER ===
    /// Fixed-size slot array; `None` marks an empty slot.
    slots: Box<[Slot<T>]>,
}

// Safety: values move from the producer thread to the consumer thread, so
// `T: Send` is required and sufficient. Slot access is serialized by the
// cursor protocol described above.
unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Send> Sync for RingBuffer<T> {}

impl<T> RingBuffer<T> {
    /// Creates an empty ring buffer with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2`: the sentinel slot would leave no room for a
    /// value. Use [`try_new`](Self::try_new) to get an error instead.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(ring) => ring,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates an empty ring buffer with `capacity` slots and metrics off.
    pub fn try_new(capacity: usize) -> Result<Self, RingError> {
        Self::with_config(Config::default().with_capacity(capacity))
    }

    /// Creates an empty ring buffer from a full configuration.
    pub fn with_config(config: Config) -> Result<Self, RingError> {
        config.validate()?;

        let capacity = config.capacity();
        let slots = (0..capacity)
            .map(|_| UnsafeCell::new(None))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
            capacity,
            config,
            metrics: Metrics::new(),
            slots,
        })
    }

    /// Moves the buffer behind an `Arc` and returns its two endpoints.
    pub fn split(self) -> (Producer<T>, Consumer<T>) {
        let ring = Arc::new(self);
        (Producer::new(Arc::clone(&ring)), Consumer::new(ring))
    }

    // ---------------------------------------------------------------------
    // STATUS
    // ---------------------------------------------------------------------

    /// Returns the number of slots, including the sentinel slot.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns how many values fit at once (`capacity - 1`).
    #[inline]
    pub fn usable_capacity(&self) -> usize {
        self.capacity - 1
    }

    /// Returns the configuration the buffer was built with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of queued values.
    ///
    /// Only a snapshot: the other side may have moved by the time the caller
    /// looks at it. `push` and `pop` never rely on it.
    #[inline]
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Relaxed);
        if tail >= head {
            tail - head
        } else {
            tail + self.capacity - head
        }
    }

    /// Returns true if no value is queued (snapshot).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Relaxed) == self.tail.load(Ordering::Relaxed)
    }

    /// Returns true if a push would currently be rejected (snapshot).
    ///
    /// Same condition `push` rejects on: `capacity - 1` values queued. The
    /// wrapped `len()` never reaches `capacity` itself.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= self.usable_capacity()
    }

    /// Get a snapshot of metrics if enabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        if self.config.enable_metrics {
            self.metrics.snapshot()
        } else {
            MetricsSnapshot::default()
        }
    }

    #[inline]
    fn next_index(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.capacity {
            0
        } else {
            next
        }
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Pushes a value, returning `false` if the buffer is full.
    ///
    /// A rejected value is dropped. Use [`try_push`](Self::try_push) to get
    /// it back.
    ///
    /// # Safety
    ///
    /// Only one thread may act as producer: `push` and `try_push` must never
    /// run concurrently with each other on the same buffer.
    #[inline]
    pub unsafe fn push(&self, value: T) -> bool {
        // SAFETY: forwarded to the caller.
        unsafe { self.try_push(value) }.is_ok()
    }

    /// Pushes a value, handing it back inside `PushError::Full` if the
    /// buffer is full.
    ///
    /// # Safety
    ///
    /// Same contract as [`push`](Self::push).
    pub unsafe fn try_push(&self, value: T) -> Result<(), PushError<T>> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        debug_assert_cursor_in_range!("tail", tail, self.capacity);
        debug_assert_cursor_in_range!("head", head, self.capacity);

        let next_tail = self.next_index(tail);
        if next_tail == head {
            if self.config.enable_metrics {
                self.metrics.add_full_rejection();
            }
            return Err(PushError::Full(value));
        }

        // SAFETY: Slot access is safe because:
        // 1. `tail` is in bounds (cursor invariant)
        // 2. `tail` is outside [head, tail), so the consumer is not touching it
        // 3. The Acquire load of `head` ordered the consumer's clear of this
        //    slot before this write
        // 4. The caller guarantees no other producer is writing
        unsafe {
            let slot = &mut *self.slots[tail].get();
            debug_assert_slot_vacant!(slot, tail);
            *slot = Some(value);
        }

        // Release: publishes the slot write to the consumer
        self.tail.store(next_tail, Ordering::Release);

        if self.config.enable_metrics {
            self.metrics.add_pushed(1);
        }

        Ok(())
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Pops the oldest value, or returns `None` if the buffer is empty.
    ///
    /// The slot is cleared before `head` moves past it, so the buffer never
    /// keeps a popped value alive.
    ///
    /// # Safety
    ///
    /// Only one thread may act as consumer: `pop`, `consume_batch` and
    /// `consume_up_to` must never run concurrently with each other on the
    /// same buffer.
    pub unsafe fn pop(&self) -> Option<T> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        debug_assert_cursor_in_range!("head", head, self.capacity);
        debug_assert_cursor_in_range!("tail", tail, self.capacity);

        if head == tail {
            if self.config.enable_metrics {
                self.metrics.add_empty_poll();
            }
            return None;
        }

        // SAFETY: Slot access is safe because:
        // 1. `head` is in bounds (cursor invariant)
        // 2. `head` is inside [head, tail), so the producer finished writing
        //    it and published the write with its Release store of `tail`
        // 3. The producer will not reuse the slot until `head` moves past it
        // 4. The caller guarantees no other consumer is reading
        let value = unsafe {
            let slot = &mut *self.slots[head].get();
            debug_assert_slot_occupied!(slot, head);
            slot.take()
        };

        // Release: hands the cleared slot back to the producer
        self.head.store(self.next_index(head), Ordering::Release);

        if self.config.enable_metrics {
            self.metrics.add_popped(1);
        }

        value
    }

    // ---------------------------------------------------------------------
    // BATCH CONSUMPTION
    // ---------------------------------------------------------------------

    /// Pops every value that is visible now, with a single `head` update.
    ///
    /// # Safety
    ///
    /// Same contract as [`pop`](Self::pop).
    pub unsafe fn consume_batch<F>(&self, handler: F) -> usize
    where
        F: FnMut(T),
    {
        // SAFETY: forwarded to the caller.
        unsafe { self.consume_up_to(usize::MAX, handler) }
    }

    /// Pops up to `max_items` values with a single `head` update, handing
    /// each one to `handler` by value.
    ///
    /// If `handler` panics, the values already handed out stay consumed and
    /// the rest stay queued.
    ///
    /// # Safety
    ///
    /// Same contract as [`pop`](Self::pop).
    pub unsafe fn consume_up_to<F>(&self, max_items: usize, mut handler: F) -> usize
    where
        F: FnMut(T),
    {
        if max_items == 0 {
            return 0;
        }

        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        if head == tail {
            if self.config.enable_metrics {
                self.metrics.add_empty_poll();
            }
            return 0;
        }

        // Publishes whatever was taken, even when `handler` unwinds.
        let mut guard = HeadGuard {
            ring: self,
            pos: head,
            count: 0,
        };

        while guard.pos != tail && guard.count < max_items {
            let idx = guard.pos;
            // SAFETY: same argument as in `pop`; every slot in [head, tail)
            // was published by the Acquire load of `tail` above.
            let value = unsafe {
                let slot = &mut *self.slots[idx].get();
                debug_assert_slot_occupied!(slot, idx);
                slot.take()
            };
            guard.pos = self.next_index(idx);
            guard.count += 1;

            if let Some(value) = value {
                handler(value);
            }
        }

        guard.count
    }
}

/// Stores the consumer's progress into `head` on drop.
struct HeadGuard<'a, T> {
    ring: &'a RingBuffer<T>,
    pos: usize,
    count: usize,
}

impl<T> Drop for HeadGuard<'_, T> {
    fn drop(&mut self) {
        self.ring.head.store(self.pos, Ordering::Release);
        if self.ring.config.enable_metrics {
            self.ring.metrics.add_popped(self.count as u64);
        }
    }
}

impl<T> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity)
            .field("head", &self.head.load(Ordering::Relaxed))
            .field("tail", &self.tail.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
