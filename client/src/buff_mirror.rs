use std::time::Duration;

use tether_shared::{buff_remaining, EntityId, Tick};

/// The observer's copy of an active buff. Counts down locally with the same
/// closed-form rule the authority uses, so both sides agree on every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct MirroredBuff {
    name: String,
    duration: Duration,
    applied_tick: Tick,
    remaining: Duration,
}

impl MirroredBuff {
    pub(crate) fn applied(name: String, duration: Duration, applied_tick: Tick) -> Self {
        Self {
            name,
            duration,
            applied_tick,
            remaining: duration,
        }
    }

    /// Returns `false` for a replay of the application already mirrored. A
    /// recast on the same tick with another duration is a new application.
    pub(crate) fn reapply(&mut self, duration: Duration, applied_tick: Tick) -> bool {
        if self.applied_tick == applied_tick && self.duration == duration {
            return false;
        }
        self.duration = duration;
        self.applied_tick = applied_tick;
        self.remaining = duration;
        true
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

/// A visual attached to a buffed target for as long as one application of
/// the buff lasts.
#[derive(Clone, Debug, PartialEq)]
pub struct BuffFollowEffect {
    target: EntityId,
    name: String,
    applied_tick: Tick,
    remaining: Duration,
}

impl BuffFollowEffect {
    pub(crate) fn follow(target: EntityId, buff: &MirroredBuff) -> Self {
        Self {
            target,
            name: buff.name().to_string(),
            applied_tick: buff.applied_tick(),
            remaining: buff.remaining(),
        }
    }

    /// Whether `buff` is a fresh application rather than the one this effect
    /// was started for.
    pub(crate) fn is_superseded_by(&self, buff: &MirroredBuff) -> bool {
        buff.applied_tick() != self.applied_tick || buff.remaining() > self.remaining
    }

    pub(crate) fn track(&mut self, buff: &MirroredBuff) {
        self.remaining = buff.remaining();
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remaining duration of the followed buff as of the last step.
    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}
