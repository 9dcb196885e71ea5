//! Host clock

use std::time::Instant;

use puckbot_core::traits::{TickClock, TICKS_PER_SECOND};

const NANOS_PER_TICK: u128 = 1_000_000_000 / TICKS_PER_SECOND as u128;

/// [`TickClock`] counting 100 ns ticks since creation
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickClock for StdClock {
    fn now_ticks(&self) -> u64 {
        // Truncation only matters after ~58 000 years
        (self.origin.elapsed().as_nanos() / NANOS_PER_TICK) as u64
    }
}
