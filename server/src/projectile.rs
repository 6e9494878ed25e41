use std::{fmt, time::Duration};

use tether_shared::{step_towards, tick_distance, DamagePayload, EntityId, ResolveOutcome, Vec3};

use crate::{Combat, World};

/// Identifies one cast invocation. Each cast owns at most one live effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CastId(u32);

impl CastId {
    pub(crate) fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cast({})", self.0)
    }
}

/// Result of advancing a projectile by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileStep {
    InFlight,
    Arrived,
    /// Caster or target is no longer in the world.
    ReferenceLost,
}

/// A skill effect flying from its caster to its target.
#[derive(Clone, Debug)]
pub struct ProjectileEffect {
    effect: EntityId,
    cast: CastId,
    caster: EntityId,
    target: EntityId,
    position: Vec3,
    speed: f32,
    damage: DamagePayload,
    alive: bool,
}

impl ProjectileEffect {
    pub fn new(
        effect: EntityId,
        cast: CastId,
        caster: EntityId,
        target: EntityId,
        origin: Vec3,
        speed: f32,
        damage: DamagePayload,
    ) -> Self {
        Self {
            effect,
            cast,
            caster,
            target,
            position: origin,
            speed,
            damage,
            alive: true,
        }
    }

    pub fn effect(&self) -> EntityId {
        self.effect
    }

    pub fn cast(&self) -> CastId {
        self.cast
    }

    pub fn caster(&self) -> EntityId {
        self.caster
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Moves toward the target by `speed * tick_duration`, as long as both
    /// caster and target are still in the world.
    pub fn advance<W: World>(
        &mut self,
        world: &W,
        tick_duration: Duration,
        arrival_epsilon: f32,
    ) -> ProjectileStep {
        if !world.contains(self.caster) {
            return ProjectileStep::ReferenceLost;
        }
        let Some(target_position) = world.position(self.target) else {
            return ProjectileStep::ReferenceLost;
        };

        let step = step_towards(
            self.position,
            target_position,
            tick_distance(self.speed, tick_duration),
            arrival_epsilon,
        );
        self.position = step.position;

        if step.arrived {
            ProjectileStep::Arrived
        } else {
            ProjectileStep::InFlight
        }
    }

    /// Ends the effect. Damage is applied only for [`ResolveOutcome::Hit`] and
    /// only the first time; later calls return `None` and touch nothing.
    pub fn resolve<C: Combat>(
        &mut self,
        combat: &mut C,
        outcome: ResolveOutcome,
    ) -> Option<ResolveOutcome> {
        if !self.alive {
            return None;
        }
        self.alive = false;

        if outcome == ResolveOutcome::Hit {
            combat.apply_damage(self.target, self.damage.amount, &self.damage.status_effects);
        }
        Some(outcome)
    }

    /// Ends the effect without applying anything. Returns whether it was still
    /// alive.
    pub fn fizzle(&mut self) -> bool {
        std::mem::replace(&mut self.alive, false)
    }
}
