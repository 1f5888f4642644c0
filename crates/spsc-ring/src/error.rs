//! Error types for ring buffer construction and producer operations.

use std::fmt;
use thiserror::Error;

/// Errors that can occur when building a ring buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// The requested capacity leaves no usable slot next to the sentinel.
    #[error("capacity {capacity} is too small (min: {min})")]
    CapacityTooSmall {
        /// The requested number of slots.
        capacity: usize,
        /// The smallest accepted number of slots.
        min: usize,
    },
}

/// Error returned by `try_push` when the ring buffer is full.
///
/// The rejected value is handed back so the caller can retry or drop it.
#[derive(Clone, Copy, PartialEq, Eq, Error)]
pub enum PushError<T> {
    /// The ring buffer has no free slot.
    #[error("ring buffer is full")]
    Full(T),
}

impl<T> PushError<T> {
    /// Returns the value that could not be pushed.
    #[inline]
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(value) => value,
        }
    }

    /// Returns `true` if the push failed because the buffer was full.
    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }
}

// Hand-written so the error can carry payloads that are not `Debug`.
impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => f.write_str("Full(..)"),
        }
    }
}
