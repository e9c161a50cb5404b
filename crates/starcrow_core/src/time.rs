//! Simulation clock: accumulated integer milliseconds.
//!
//! The host supplies elapsed wall time per frame; the clock applies it
//! exactly, so scripted runs replay bit-identically regardless of real
//! pacing. Oversized deltas (a dragged window, a debugger pause) are let
//! through but logged, since a single huge step moves sprites a long way.

/// Deltas above this log a warning.
const LONG_STEP_WARN_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct SimClock {
    now_ms: u64,
    tick_count: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            tick_count: 0,
        }
    }

    /// Advance the clock by one tick's elapsed time and return the delta
    /// unchanged.
    pub fn advance(&mut self, elapsed_ms: u64) -> u64 {
        if elapsed_ms > LONG_STEP_WARN_MS {
            log::warn!(
                "Tick delta of {elapsed_ms}ms exceeds {LONG_STEP_WARN_MS}ms; applying in full"
            );
        }
        self.now_ms += elapsed_ms;
        self.tick_count += 1;
        elapsed_ms
    }

    /// Monotonic simulation time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}
