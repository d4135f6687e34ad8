//! Placeholder identifiers for listings with no recoverable product code.

use std::sync::{Mutex, PoisonError};

/// Width of an allocated identifier, matching a JAN-13 code.
const ID_WIDTH: usize = 13;

/// Thread-safe monotonic counter that hands out zero-padded 13-digit ids.
///
/// Construct one per process (or per test) and pass it by reference into
/// [`crate::aggregate`]; every caller observes a distinct value.
#[derive(Debug)]
pub struct SyntheticIdAllocator {
    next: Mutex<u64>,
}

impl SyntheticIdAllocator {
    /// Creates an allocator whose first id is `0000000000001`.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates an allocator whose first id is `start`.
    #[must_use]
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: Mutex::new(start),
        }
    }

    /// Returns the current value and advances the counter.
    pub fn next(&self) -> String {
        let mut guard = self.next.lock().unwrap_or_else(PoisonError::into_inner);
        let value = *guard;
        *guard += 1;
        drop(guard);
        format_id(value)
    }

    /// Returns the value the next call to [`Self::next`] will hand out,
    /// without advancing. Diagnostic use only: another caller may claim it.
    #[must_use]
    pub fn current(&self) -> String {
        format_id(*self.next.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Default for SyntheticIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

fn format_id(value: u64) -> String {
    format!("{value:0width$}", width = ID_WIDTH)
}
