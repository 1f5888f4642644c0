//! Debug assertion macros for ring buffer invariants.
//!
//! Only active in debug builds (`debug_assert!`), so release builds pay
//! nothing for them. Used by `RingBuffer<T>` and the split handles.

// =============================================================================
// Cursor Range
// =============================================================================

/// Assert that a cursor is a valid slot index.
///
/// **Invariant**: `0 ≤ cursor < capacity`
///
/// Used in: `try_push()` and `pop()` after loading both cursors
macro_rules! debug_assert_cursor_in_range {
    ($name:literal, $cursor:expr, $capacity:expr) => {
        debug_assert!(
            $cursor < $capacity,
            "{} cursor {} out of range for capacity {}",
            $name,
            $cursor,
            $capacity
        )
    };
}

// =============================================================================
// Slot Occupancy
// =============================================================================

/// Assert that the producer is writing into a cleared slot.
///
/// **Invariant**: slot `tail` is empty whenever the buffer is not full.
/// A stale value here means the consumer advanced `head` without clearing.
///
/// Used in: `try_push()` before storing the value
macro_rules! debug_assert_slot_vacant {
    ($slot:expr, $idx:expr) => {
        debug_assert!(
            $slot.is_none(),
            "slot {} still holds a value when the producer writes it",
            $idx
        )
    };
}

/// Assert that the consumer is reading a published slot.
///
/// **Invariant**: every slot in `[head, tail)` holds a value.
///
/// Used in: `pop()` and batch consumption before taking the value
macro_rules! debug_assert_slot_occupied {
    ($slot:expr, $idx:expr) => {
        debug_assert!(
            $slot.is_some(),
            "slot {} is empty although it lies between head and tail",
            $idx
        )
    };
}

// =============================================================================
// Re-exports for crate-internal use
// =============================================================================

pub(crate) use debug_assert_cursor_in_range;
pub(crate) use debug_assert_slot_occupied;
pub(crate) use debug_assert_slot_vacant;
