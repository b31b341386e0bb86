//! Wrap-aware slot arithmetic shared by the write, read and historical paths.
//!
//! Slot indices always live in `[0, capacity)`. Cursors only ever move forward
//! by at most `capacity` slots at a time, so a single conditional subtraction is
//! enough to bring them back into range.

use crate::error::{Error, Result};

/// Fold an index that stepped at most one capacity past the end back into range.
#[inline]
pub fn wrap(idx: usize, capacity: usize) -> usize {
    debug_assert!(idx < 2 * capacity, "wrap() called with unbounded index");
    if idx >= capacity {
        idx - capacity
    } else {
        idx
    }
}

/// Move a cursor forward by `n` slots.
#[inline]
pub fn advance(idx: usize, capacity: usize, n: usize) -> usize {
    debug_assert!(n <= capacity);
    wrap(idx + n, capacity)
}

/// Split a span of `n` slots starting at `start` into the part that fits before
/// the end of storage and the part that continues from slot 0.
#[inline]
pub fn split_span(start: usize, n: usize, capacity: usize) -> (usize, usize) {
    let first = n.min(capacity - start);
    (first, n - first)
}

/// Historical index validity: `[0, capacity)` forward, `[-capacity, -1]` backward.
///
/// `-capacity` is valid (it aliases index `0`) while `capacity` is not.
#[inline]
pub fn is_valid_index(requested: isize, capacity: usize) -> bool {
    if requested >= 0 {
        (requested as usize) < capacity
    } else {
        requested.unsigned_abs() <= capacity
    }
}

/// Map a historical index onto a storage slot.
///
/// Non-negative indices count forward from the oldest retained item (`tail`).
/// Negative indices count backward from the most recent write, so `-1` is the
/// slot just behind `head`. For a full buffer `head == tail` and `-capacity`
/// lands on the same slot as `0`.
pub fn resolve(requested: isize, tail: usize, head: usize, capacity: usize) -> Result<usize> {
    if !is_valid_index(requested, capacity) {
        return Err(Error::InvalidIndex {
            index: requested,
            capacity,
        });
    }

    let slot = if requested >= 0 {
        wrap(tail + requested as usize, capacity)
    } else {
        wrap(head + capacity - requested.unsigned_abs(), capacity)
    };
    Ok(slot)
}
