//! Time sources for driving the game loop
//!
//! The loop never reads a clock itself. Hosts sample a [`Clock`] and pass the
//! reading to `GameLoop::advance_to`.

use std::time::Instant;

/// Milliseconds since the clock's origin
pub type Millis = u64;

pub trait Clock {
    fn now(&self) -> Millis;
}

/// Clock advanced by hand (tests, headless fast-forward)
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: Millis,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self { now: start }
    }

    pub fn advance(&mut self, by: Millis) -> Millis {
        self.now += by;
        self.now
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now
    }
}

/// Monotonic wall clock
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}
