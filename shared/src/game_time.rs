use std::time::Duration;

use crate::Tick;

/// A point in simulated time, measured from the start of the world.
///
/// Both roles derive it from the tick counter, so the authority and every
/// observer agree on "now" for a given tick without exchanging clocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameInstant(Duration);

impl GameInstant {
    pub const ZERO: GameInstant = GameInstant(Duration::ZERO);

    pub fn from_tick(tick: Tick, tick_duration: Duration) -> Self {
        Self(tick_duration.saturating_mul(tick))
    }

    pub fn from_duration(since_start: Duration) -> Self {
        Self(since_start)
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// Time elapsed since `earlier`, or zero if `earlier` lies in the future.
    pub fn elapsed_since(&self, earlier: GameInstant) -> Duration {
        self.0.saturating_sub(earlier.0)
    }

    pub fn add(&self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration))
    }
}
