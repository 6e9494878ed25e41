use std::time::Duration;

use tether_shared::{buff_remaining, Tick};

/// A timed buff on one target, counted down on every authority tick.
#[derive(Clone, Debug, PartialEq)]
pub struct BuffInstance {
    name: String,
    duration: Duration,
    applied_tick: Tick,
    remaining: Duration,
}

impl BuffInstance {
    pub(crate) fn new(name: String, duration: Duration, applied_tick: Tick) -> Self {
        Self {
            name,
            duration,
            applied_tick,
            remaining: duration,
        }
    }

    /// Refreshes the buff; the only way `remaining` can grow.
    pub(crate) fn recast(&mut self, duration: Duration, applied_tick: Tick) {
        self.duration = duration;
        self.applied_tick = applied_tick;
        self.remaining = duration;
    }

    pub(crate) fn step(&mut self, tick: Tick, tick_duration: Duration) {
        let remaining = buff_remaining(self.duration, self.applied_tick, tick, tick_duration);
        self.remaining = self.remaining.min(remaining);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn applied_tick(&self) -> Tick {
        self.applied_tick
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }
}
