//! The deterministic stepping rules shared by the authority and every
//! observer. Both sides call these with identical inputs each tick, which is
//! what lets an observer reproduce continuous motion without per-tick traffic.

use std::time::Duration;

use crate::{Tick, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub position: Vec3,
    pub arrived: bool,
}

/// Moves `position` toward `target` by at most `max_distance`.
///
/// Arrival snaps onto the target once the remaining gap is within
/// `max_distance + arrival_epsilon`.
pub fn step_towards(position: Vec3, target: Vec3, max_distance: f32, arrival_epsilon: f32) -> Step {
    let max_distance = max_distance.max(0.0);
    let delta = target - position;
    let distance = delta.length();

    if distance <= max_distance + arrival_epsilon {
        return Step {
            position: target,
            arrived: true,
        };
    }

    Step {
        position: position + delta * (max_distance / distance),
        arrived: false,
    }
}

/// Distance a projectile covers in one tick.
pub fn tick_distance(speed: f32, tick_duration: Duration) -> f32 {
    speed * tick_duration.as_secs_f32()
}

/// Remaining duration of a buff applied on `applied_tick`, after the step of
/// `tick` has run. The tick a buff is applied on already counts against it.
pub fn buff_remaining(
    duration: Duration,
    applied_tick: Tick,
    tick: Tick,
    tick_duration: Duration,
) -> Duration {
    if tick < applied_tick {
        return duration;
    }
    let elapsed_ticks = (tick - applied_tick).saturating_add(1);
    duration.saturating_sub(tick_duration.saturating_mul(elapsed_ticks))
}
