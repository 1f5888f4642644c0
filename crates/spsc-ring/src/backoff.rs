use crate::{Producer, PushError};
use std::hint;
use std::thread;
use std::time::{Duration, Instant};

/// Sleep between retries once spinning and yielding are exhausted.
const RETRY_SLEEP: Duration = Duration::from_micros(10);

/// Caller-side waiting policy for a full or empty ring (Crossbeam-style).
///
/// The ring itself never waits: `push` and `pop` return immediately. A
/// producer or consumer that wants to retry wraps its attempts in a
/// `Backoff`, which spins with PAUSE hints, then yields to the OS, then
/// reports that patience is exhausted so the caller can drop, sleep or bail.
///
/// ```
/// use spsc_ring::{Backoff, RingBuffer};
///
/// let (mut tx, _rx) = RingBuffer::<u32>::new(2).split();
/// assert!(tx.push(1));
///
/// // Nobody is consuming, so a bounded retry gives up instead of spinning forever.
/// let mut backoff = Backoff::new();
/// let mut pending = Some(2);
/// while let Some(value) = pending.take() {
///     if let Err(err) = tx.try_push(value) {
///         if backoff.is_completed() {
///             break;
///         }
///         pending = Some(err.into_inner());
///         backoff.snooze();
///     }
/// }
/// assert!(backoff.is_completed());
/// ```
#[derive(Debug, Clone)]
pub struct Backoff {
    step: u32,
    spin_limit: u32,
    yield_limit: u32,
}

impl Backoff {
    const SPIN_LIMIT: u32 = 6; // 2^6 = 64 spins max before yielding
    const YIELD_LIMIT: u32 = 10; // Then give up

    /// Creates a new backoff instance with the default limits.
    #[inline]
    pub fn new() -> Self {
        Self::with_limits(Self::SPIN_LIMIT, Self::YIELD_LIMIT)
    }

    /// Creates a backoff that spins for `spin_limit` steps and gives up after
    /// `yield_limit` steps. `yield_limit` is raised to `spin_limit` if lower.
    #[inline]
    pub fn with_limits(spin_limit: u32, yield_limit: u32) -> Self {
        Self {
            step: 0,
            spin_limit,
            yield_limit: yield_limit.max(spin_limit),
        }
    }

    /// Light spin with PAUSE hints.
    #[inline]
    pub fn spin(&mut self) {
        let spins = 1u32 << self.step.min(self.spin_limit).min(16);
        for _ in 0..spins {
            hint::spin_loop();
        }
        if self.step <= self.spin_limit {
            self.step += 1;
        }
    }

    /// Heavier backoff: spin then yield.
    #[inline]
    pub fn snooze(&mut self) {
        if self.step <= self.spin_limit {
            self.spin();
        } else {
            thread::yield_now();
            if self.step <= self.yield_limit {
                self.step += 1;
            }
        }
    }

    /// Check if we've exhausted patience.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.step > self.yield_limit
    }

    /// Reset for next wait cycle.
    #[inline]
    pub fn reset(&mut self) {
        self.step = 0;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}

/// Pushes `value`, waiting up to `patience` for the consumer to free a slot.
///
/// Spins and yields through a [`Backoff`] first, then falls back to short
/// sleeps. The deadline starts when the first attempt is rejected, and any
/// pop in that window makes room, so an `Err` means the consumer made no
/// progress for the whole of `patience`. The rejected value is handed back.
pub fn push_with_patience<T>(
    producer: &mut Producer<T>,
    value: T,
    patience: Duration,
) -> Result<(), PushError<T>> {
    let mut value = match producer.try_push(value) {
        Ok(()) => return Ok(()),
        Err(err) => err.into_inner(),
    };

    let deadline = Instant::now() + patience;
    let mut backoff = Backoff::new();

    loop {
        if backoff.is_completed() {
            if Instant::now() >= deadline {
                return Err(PushError::Full(value));
            }
            thread::sleep(RETRY_SLEEP);
        } else {
            backoff.snooze();
        }

        match producer.try_push(value) {
            Ok(()) => return Ok(()),
            Err(err) => value = err.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_progression() {
        let mut b = Backoff::new();

        // Should start at step 0
        assert_eq!(b.step, 0);

        // Spin should increment
        b.spin();
        assert!(b.step > 0);

        // Should eventually complete
        while !b.is_completed() {
            b.snooze();
        }
        assert!(b.step > Backoff::YIELD_LIMIT);

        // Reset
        b.reset();
        assert_eq!(b.step, 0);
        assert!(!b.is_completed());
    }

    #[test]
    fn test_custom_limits() {
        let mut b = Backoff::with_limits(1, 3);
        let mut snoozes = 0;
        while !b.is_completed() {
            b.snooze();
            snoozes += 1;
        }
        assert_eq!(snoozes, 4);

        // A yield limit below the spin limit is raised to it.
        let b = Backoff::with_limits(4, 0);
        assert_eq!(b.yield_limit, 4);
    }

    #[test]
    fn test_patient_push_outlasts_sleeping_consumer() {
        use crate::RingBuffer;

        const N: u64 = 20_000;
        let (mut tx, mut rx) = RingBuffer::<u64>::new(16).split();

        // Consumer naps whenever the ring looks empty, far longer than a
        // full Backoff cycle
        let consumer = thread::spawn(move || {
            let mut sum = 0u64;
            let mut count = 0u64;
            while count < N {
                match rx.pop() {
                    Some(v) => {
                        sum += v;
                        count += 1;
                    }
                    None => thread::sleep(Duration::from_micros(50)),
                }
            }
            sum
        });

        let mut dropped = 0u64;
        for i in 0..N {
            if push_with_patience(&mut tx, i, Duration::from_millis(500)).is_err() {
                dropped += 1;
            }
        }

        assert_eq!(dropped, 0, "values dropped while the consumer was only sleeping");
        assert_eq!(consumer.join().unwrap(), N * (N - 1) / 2);
    }

    #[test]
    fn test_patient_push_gives_up_on_stalled_consumer() {
        use crate::RingBuffer;

        let (mut tx, rx) = RingBuffer::<String>::new(2).split();
        assert!(tx.push("queued".to_string()));

        let patience = Duration::from_millis(20);
        let start = Instant::now();
        let err = push_with_patience(&mut tx, "late".to_string(), patience).unwrap_err();

        assert!(start.elapsed() >= patience);
        assert_eq!(err.into_inner(), "late");
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn test_patient_push_with_room_returns_immediately() {
        use crate::RingBuffer;

        let (mut tx, mut rx) = RingBuffer::<u8>::new(4).split();
        assert!(push_with_patience(&mut tx, 1, Duration::ZERO).is_ok());
        assert_eq!(rx.pop(), Some(1));
    }
}
