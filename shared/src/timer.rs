use std::time::Duration;

use crate::GameInstant;

/// A polling countdown.
///
/// The timer never fires on its own: it is a pure function of the instant it
/// was last reset and the `now` it is queried with, so it can be asked any
/// number of times per tick. A zero-length timer is always ready.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    duration: Duration,
    last_reset: GameInstant,
}

impl Timer {
    pub fn new(duration: Duration, now: GameInstant) -> Self {
        Self {
            duration,
            last_reset: now,
        }
    }

    /// Sets a new duration and restarts the countdown from `now`.
    pub fn start(&mut self, duration: Duration, now: GameInstant) {
        self.duration = duration;
        self.last_reset = now;
    }

    /// Restarts the countdown from `now`, keeping the duration.
    pub fn reset(&mut self, now: GameInstant) {
        self.last_reset = now;
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_ready(&self, now: GameInstant) -> bool {
        now.elapsed_since(self.last_reset) >= self.duration
    }

    /// Fraction of the duration elapsed, clamped to `[0, 1]`.
    pub fn progress(&self, now: GameInstant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.elapsed_since(self.last_reset);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn time_remaining(&self, now: GameInstant) -> Duration {
        self.duration
            .saturating_sub(now.elapsed_since(self.last_reset))
    }
}
