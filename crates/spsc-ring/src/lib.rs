//! spsc-ring - Bounded Lock-Free Single-Producer Single-Consumer Ring Buffer
//!
//! A fixed-capacity circular buffer shared by exactly one writer and one
//! reader. Synchronization is two atomic cursors and nothing else: no locks,
//! no compare-and-swap, no internal waiting.
//!
//! # Key Features
//!
//! - Cache-padded `head`/`tail` cursors (no false sharing between the two sides)
//! - Acquire/release handoff: a visible `tail` implies a visible slot
//! - Sentinel slot: `capacity - 1` usable slots, any capacity ≥ 2
//! - Popped slots are cleared immediately, so the ring never extends a value's lifetime
//! - Safe split endpoints ([`Producer`] / [`Consumer`]) plus an `unsafe` shared API
//! - Optional metrics counters
//!
//! Full and empty are ordinary results (`false` / `Err(PushError::Full)` /
//! `None`). Whether to retry, drop or sleep is up to the caller; [`Backoff`]
//! and [`push_with_patience`] are one such policy.
//!
//! # Example
//!
//! ```
//! use spsc_ring::RingBuffer;
//!
//! let (mut producer, mut consumer) = RingBuffer::<u32>::new(4).split();
//!
//! // 4 slots, 3 usable
//! assert!(producer.push(1));
//! assert!(producer.push(2));
//! assert!(producer.push(3));
//! assert!(!producer.push(4));
//!
//! assert_eq!(consumer.pop(), Some(1));
//! assert!(producer.push(4));
//!
//! let mut rest = Vec::new();
//! consumer.consume_batch(|v| rest.push(v));
//! assert_eq!(rest, [2, 3, 4]);
//! assert_eq!(consumer.pop(), None);
//! ```

mod backoff;
mod config;
mod error;
mod handle;
mod invariants;
mod metrics;
mod ring;

pub use backoff::{push_with_patience, Backoff};
pub use config::{Config, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG, MIN_CAPACITY};
pub use error::{PushError, RingError};
pub use handle::{Consumer, Producer};
pub use metrics::{Metrics, MetricsSnapshot};
pub use ring::{RingBuffer, CURSOR_ALIGN};
