use crate::RingError;

/// Smallest slot count that leaves a usable slot next to the sentinel.
pub const MIN_CAPACITY: usize = 2;

/// Configuration for [`RingBuffer`](crate::RingBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of slots, including the sentinel slot (default: 1024)
    pub capacity: usize,
    /// Enable metrics collection (slight overhead)
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration with custom settings.
    pub const fn new(capacity: usize, enable_metrics: bool) -> Self {
        Self {
            capacity,
            enable_metrics,
        }
    }

    /// Returns the number of slots.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns how many values can be queued at once (`capacity - 1`).
    #[inline]
    pub const fn usable_capacity(&self) -> usize {
        self.capacity.saturating_sub(1)
    }

    /// Sets the number of slots.
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Turns metrics collection on or off.
    pub const fn with_metrics(mut self, enable_metrics: bool) -> Self {
        self.enable_metrics = enable_metrics;
        self
    }

    /// Checks that the capacity leaves at least one usable slot.
    pub const fn validate(&self) -> Result<(), RingError> {
        if self.capacity < MIN_CAPACITY {
            return Err(RingError::CapacityTooSmall {
                capacity: self.capacity,
                min: MIN_CAPACITY,
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1024,
            enable_metrics: false,
        }
    }
}

/// Low latency configuration (256 slots, stays hot in L1 for small `T`)
pub const LOW_LATENCY_CONFIG: Config = Config::new(256, false);

/// High throughput configuration (64K slots)
pub const HIGH_THROUGHPUT_CONFIG: Config = Config::new(65536, false);
