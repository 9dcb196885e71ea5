//! Monotonic tick clock
//!
//! The axis controller never reads a global timer. Every controller is
//! handed a clock at construction, which keeps the step timing testable
//! with a clock the test drives by hand.

use portable_atomic::{AtomicU64, Ordering};

/// Clock resolution: one tick is 100 ns
pub const TICKS_PER_SECOND: u64 = 10_000_000;

/// Monotonic time source in [`TICKS_PER_SECOND`] resolution
///
/// The counter is treated as a circular quantity by the step gate, so an
/// implementation may wrap at `u64::MAX`.
pub trait TickClock {
    /// Current tick count
    fn now_ticks(&self) -> u64;
}

impl<C: TickClock + ?Sized> TickClock for &C {
    fn now_ticks(&self) -> u64 {
        (**self).now_ticks()
    }
}

/// Clock that only moves when told to
///
/// Used for simulation (the UI replays moves without hardware) and for
/// tests. Safe to share between the polling thread and a driver thread.
#[derive(Debug, Default)]
pub struct ManualClock {
    ticks: AtomicU64,
}

impl ManualClock {
    /// Create a clock starting at `ticks`
    pub const fn new(ticks: u64) -> Self {
        Self {
            ticks: AtomicU64::new(ticks),
        }
    }

    /// Jump to an absolute tick count
    pub fn set(&self, ticks: u64) {
        self.ticks.store(ticks, Ordering::Release);
    }

    /// Move forward by `ticks`, wrapping at `u64::MAX`
    ///
    /// Returns the new tick count.
    pub fn advance(&self, ticks: u64) -> u64 {
        self.ticks
            .fetch_add(ticks, Ordering::AcqRel)
            .wrapping_add(ticks)
    }
}

impl TickClock for ManualClock {
    fn now_ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read<C: TickClock>(clock: C) -> u64 {
        clock.now_ticks()
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_ticks(), 100);

        assert_eq!(clock.advance(50), 150);
        assert_eq!(clock.now_ticks(), 150);

        clock.set(10);
        assert_eq!(clock.now_ticks(), 10);
    }

    #[test]
    fn test_manual_clock_wraps() {
        let clock = ManualClock::new(u64::MAX - 1);
        assert_eq!(clock.advance(3), 1);
        assert_eq!(clock.now_ticks(), 1);
    }

    #[test]
    fn test_reference_is_a_clock() {
        let clock = ManualClock::new(42);
        assert_eq!(read(&clock), 42);
        assert_eq!(read(&&clock), 42);
    }
}
