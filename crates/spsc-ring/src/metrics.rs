use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicU64, Ordering};

/// Optional counters for monitoring a ring buffer.
///
/// Producer-side and consumer-side counters live on separate cache lines so
/// that recording them does not reintroduce the false sharing the padded
/// cursors avoid.
#[derive(Debug, Default)]
pub struct Metrics {
    producer: CachePadded<ProducerCounters>,
    consumer: CachePadded<ConsumerCounters>,
}

#[derive(Debug, Default)]
struct ProducerCounters {
    pushed: AtomicU64,
    full_rejections: AtomicU64,
}

#[derive(Debug, Default)]
struct ConsumerCounters {
    popped: AtomicU64,
    empty_polls: AtomicU64,
}

/// Point-in-time copy of [`Metrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Successful pushes.
    pub pushed: u64,
    /// Pushes rejected because the buffer was full.
    pub full_rejections: u64,
    /// Successful pops.
    pub popped: u64,
    /// Pops that found the buffer empty.
    pub empty_polls: u64,
}

impl MetricsSnapshot {
    /// Values pushed but not yet popped when the snapshot was taken.
    #[inline]
    pub fn in_flight(&self) -> u64 {
        self.pushed.saturating_sub(self.popped)
    }
}

// Each counter has a single writer (the side that owns it), so Relaxed
// increments are enough; readers only ever want an approximate view.
impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn add_pushed(&self, n: u64) {
        self.producer.pushed.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_full_rejection(&self) {
        self.producer.full_rejections.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_popped(&self, n: u64) {
        self.consumer.popped.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_empty_poll(&self) {
        self.consumer.empty_polls.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pushed: self.producer.pushed.load(Ordering::Relaxed),
            full_rejections: self.producer.full_rejections.load(Ordering::Relaxed),
            popped: self.consumer.popped.load(Ordering::Relaxed),
            empty_polls: self.consumer.empty_polls.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_snapshot() {
        let metrics = Metrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());

        metrics.add_pushed(3);
        metrics.add_full_rejection();
        metrics.add_popped(1);
        metrics.add_empty_poll();
        metrics.add_empty_poll();

        let snap = metrics.snapshot();
        assert_eq!(snap.pushed, 3);
        assert_eq!(snap.full_rejections, 1);
        assert_eq!(snap.popped, 1);
        assert_eq!(snap.empty_polls, 2);
        assert_eq!(snap.in_flight(), 2);
    }
}
