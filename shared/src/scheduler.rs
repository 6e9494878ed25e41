use std::time::Duration;

use crate::{GameInstant, Tick};

/// Fixed-rate tick source driving both the authority and observer loops.
pub trait Scheduler {
    fn current_tick(&self) -> Tick;

    fn tick_duration(&self) -> Duration;

    fn now(&self) -> GameInstant {
        GameInstant::from_tick(self.current_tick(), self.tick_duration())
    }
}

/// A manually advanced tick counter; hosts call `advance` once per loop iteration.
#[derive(Clone, Debug)]
pub struct TickClock {
    tick: Tick,
    tick_duration: Duration,
}

impl TickClock {
    pub fn new(tick_duration: Duration) -> Self {
        Self {
            tick: 0,
            tick_duration,
        }
    }

    pub fn advance(&mut self) -> Tick {
        self.tick = self.tick.saturating_add(1);
        self.tick
    }

    pub fn advance_by(&mut self, ticks: Tick) -> Tick {
        self.tick = self.tick.saturating_add(ticks);
        self.tick
    }
}

impl Scheduler for TickClock {
    fn current_tick(&self) -> Tick {
        self.tick
    }

    fn tick_duration(&self) -> Duration {
        self.tick_duration
    }
}
