//! Atomic operation guard.
//!
//! Replaces checked-then-set boolean flags with a compare-and-swap
//! acquire and an RAII release, so two triggers arriving in the same
//! tick cannot both pass the check.

use std::sync::atomic::{AtomicBool, Ordering};

/// A non-blocking mutual-exclusion flag for one kind of operation.
#[derive(Debug, Default)]
pub struct OpGuard {
    busy: AtomicBool,
}

impl OpGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the guard, or returns `None` when an operation is
    /// already outstanding. The permit releases on drop.
    pub fn try_acquire(&self) -> Option<OpPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| OpPermit { guard: self })
    }

    /// Whether an operation currently holds the guard.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of one guarded operation.
#[derive(Debug)]
pub struct OpPermit<'a> {
    guard: &'a OpGuard,
}

impl Drop for OpPermit<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}
