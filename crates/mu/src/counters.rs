//! Run counters.
//!
//! Both counters share one 64-bit atomic word: assertions in the high half,
//! failures in the low half. Every read, increment, fold and reset is a single
//! atomic operation, so `failures <= assertions` holds for every observer,
//! including one racing with a concurrent reset.
//!
//! Each count is 32 bits wide and saturates at `u32::MAX` (4 294 967 295)
//! instead of wrapping; a run that reaches the ceiling keeps reporting it.

use std::sync::atomic::{AtomicU64, Ordering};

const ASSERTION_SHIFT: u32 = 32;
const FAILURE_MASK: u64 = 0xFFFF_FFFF;

/// A `(failures, assertions)` snapshot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tally {
    /// Assertions that evaluated false.
    pub failures: u32,
    /// Assertions evaluated.
    pub assertions: u32,
}

impl Tally {
    pub const ZERO: Self = Self {
        failures: 0,
        assertions: 0,
    };

    /// A single passing assertion.
    pub const PASS: Self = Self {
        failures: 0,
        assertions: 1,
    };

    /// A single failing assertion.
    pub const FAIL: Self = Self {
        failures: 1,
        assertions: 1,
    };

    /// Build a tally; `failures` is clamped to `assertions`.
    #[must_use]
    pub const fn new(failures: u32, assertions: u32) -> Self {
        let failures = if failures > assertions {
            assertions
        } else {
            failures
        };
        Self {
            failures,
            assertions,
        }
    }

    /// True when no assertion failed.
    #[must_use]
    pub const fn passed(self) -> bool {
        self.failures == 0
    }

    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        let assertions = self.assertions.saturating_add(other.assertions);
        Self::new(self.failures.saturating_add(other.failures), assertions)
    }

    #[must_use]
    pub(crate) const fn pack(self) -> u64 {
        ((self.assertions as u64) << ASSERTION_SHIFT) | self.failures as u64
    }

    #[must_use]
    pub(crate) const fn unpack(word: u64) -> Self {
        Self::new(
            (word & FAILURE_MASK) as u32,
            (word >> ASSERTION_SHIFT) as u32,
        )
    }
}

/// Atomic assertion/failure counters for one run.
#[derive(Debug)]
pub struct RunCounters {
    word: AtomicU64,
}

impl RunCounters {
    /// Zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            word: AtomicU64::new(0),
        }
    }

    /// Count one assertion outcome. Returns the tally after the update.
    pub fn record(&self, passed: bool) -> Tally {
        let delta = if passed { Tally::PASS } else { Tally::FAIL };
        self.absorb(delta)
    }

    /// Add `tally` to the counters. Returns the tally after the update.
    pub fn absorb(&self, tally: Tally) -> Tally {
        let prev = self.update(|current| current.saturating_add(tally));
        prev.saturating_add(tally)
    }

    /// Replace the counters with `tally`, returning the previous value.
    pub fn store(&self, tally: Tally) -> Tally {
        self.update(|_| tally)
    }

    /// Read the counters and reset them to zero in one step.
    pub fn take(&self) -> Tally {
        Tally::unpack(self.word.swap(0, Ordering::SeqCst))
    }

    #[must_use]
    pub fn load(&self) -> Tally {
        Tally::unpack(self.word.load(Ordering::SeqCst))
    }

    fn update(&self, f: impl Fn(Tally) -> Tally) -> Tally {
        let result = self
            .word
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |word| {
                Some(f(Tally::unpack(word)).pack())
            });
        match result {
            Ok(prev) | Err(prev) => Tally::unpack(prev),
        }
    }
}

impl Default for RunCounters {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn record_counts_passes_and_failures() {
        let counters = RunCounters::new();
        counters.record(true);
        counters.record(false);
        let after = counters.record(true);
        assert_eq!(after, Tally::new(1, 3));
        assert_eq!(counters.load(), after);
    }

    #[test]
    fn take_resets_to_zero() {
        let counters = RunCounters::new();
        counters.record(false);
        assert_eq!(counters.take(), Tally::FAIL);
        assert_eq!(counters.load(), Tally::ZERO);
        assert_eq!(counters.take(), Tally::ZERO);
    }

    #[test]
    fn absorb_adds_rather_than_replaces() {
        let counters = RunCounters::new();
        counters.record(true);
        counters.absorb(Tally::new(2, 5));
        counters.absorb(Tally::new(0, 1));
        assert_eq!(counters.load(), Tally::new(2, 7));
    }

    #[test]
    fn store_returns_previous_value() {
        let counters = RunCounters::new();
        counters.record(false);
        let prev = counters.store(Tally::new(3, 4));
        assert_eq!(prev, Tally::FAIL);
        assert_eq!(counters.load(), Tally::new(3, 4));
    }

    #[test]
    fn new_clamps_failures_to_assertions() {
        assert_eq!(Tally::new(9, 2), Tally::new(2, 2));
    }

    #[test]
    fn pack_unpack_preserves_both_halves() {
        let tally = Tally::new(7, u32::MAX);
        assert_eq!(Tally::unpack(tally.pack()), tally);
    }

    #[test]
    fn saturating_add_keeps_invariant_at_limit() {
        let near = Tally::new(u32::MAX - 1, u32::MAX);
        let sum = near.saturating_add(Tally::new(5, 5));
        assert_eq!(sum.assertions, u32::MAX);
        assert!(sum.failures <= sum.assertions);
    }

    #[test]
    fn default_counters_start_at_zero() {
        let counters = RunCounters::default();
        assert_eq!(counters.load(), Tally::ZERO);
        assert_eq!(counters.record(true), Tally::PASS);
    }

    #[test]
    fn record_saturates_at_ceiling() {
        let counters = RunCounters::new();
        counters.store(Tally::new(u32::MAX - 1, u32::MAX));
        assert_eq!(counters.record(false), Tally::new(u32::MAX, u32::MAX));
        assert_eq!(counters.record(true), Tally::new(u32::MAX, u32::MAX));
        assert_eq!(counters.take(), Tally::new(u32::MAX, u32::MAX));
    }

    #[test]
    fn concurrent_records_are_not_lost() {
        let counters = Arc::new(RunCounters::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let counters = Arc::clone(&counters);
                std::thread::spawn(move || {
                    for i in 0..1_000 {
                        counters.record((i + t) % 4 != 0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let tally = counters.load();
        assert_eq!(tally.assertions, 8_000);
        assert_eq!(tally.failures, 2_000);
    }

    #[test]
    fn concurrent_take_never_observes_more_failures_than_assertions() {
        let counters = Arc::new(RunCounters::new());
        let writer = {
            let counters = Arc::clone(&counters);
            std::thread::spawn(move || {
                for _ in 0..10_000 {
                    counters.record(false);
                }
            })
        };
        let mut total = Tally::ZERO;
        while !writer.is_finished() {
            let seen = counters.take();
            assert!(seen.failures <= seen.assertions);
            total = total.saturating_add(seen);
        }
        writer.join().unwrap();
        total = total.saturating_add(counters.take());
        assert_eq!(total, Tally::new(10_000, 10_000));
    }
}
