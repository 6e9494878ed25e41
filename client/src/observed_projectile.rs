use std::time::Duration;

use log::trace;

use tether_shared::{step_towards, tick_distance, EntityId, PrefabKind, Tick, Vec3};

use crate::ObserverView;

/// A projectile as the observer sees it: spawned from a received
/// `EffectSpawned`, flown locally with the authority's stepping rule, removed
/// on `EffectResolved`.
///
/// The projectile keeps the next tick it has to simulate, starting at the
/// spawn tick, so an observer that hears about it late catches up to the
/// authority's position instead of starting from the origin.
#[derive(Clone, Debug)]
pub struct ObservedProjectile {
    effect: EntityId,
    caster: EntityId,
    target: EntityId,
    prefab: PrefabKind,
    position: Vec3,
    speed: f32,
    spawn_tick: Tick,
    next_tick: Tick,
    arrived: bool,
    frozen: bool,
}

impl ObservedProjectile {
    pub(crate) fn spawned(
        effect: EntityId,
        caster: EntityId,
        target: EntityId,
        origin: Vec3,
        speed: f32,
        spawn_tick: Tick,
        prefab: PrefabKind,
    ) -> Self {
        Self {
            effect,
            caster,
            target,
            prefab,
            position: origin,
            speed,
            spawn_tick,
            next_tick: spawn_tick,
            arrived: false,
            frozen: false,
        }
    }

    /// Simulates every tick up to and including `tick`. Stays put while the
    /// caster or target is out of view; the missed ticks are caught up once
    /// both are back.
    pub(crate) fn advance_to<V: ObserverView>(
        &mut self,
        view: &V,
        tick: Tick,
        tick_duration: Duration,
        arrival_epsilon: f32,
        max_catch_up_ticks: u32,
    ) {
        if self.arrived || tick < self.next_tick {
            return;
        }
        let (Some(_), Some(target_position)) =
            (view.position(self.caster), view.position(self.target))
        else {
            if !self.frozen {
                trace!("freezing {}: caster or target out of view", self.effect);
            }
            self.frozen = true;
            return;
        };
        self.frozen = false;

        let per_tick = tick_distance(self.speed, tick_duration);

        let pending = tick - self.next_tick + 1;
        let stride = pending.saturating_sub(max_catch_up_ticks);
        if stride > 0 {
            trace!("{} covering {} ticks in one stride", self.effect, stride);
            let step = step_towards(
                self.position,
                target_position,
                per_tick * stride as f32,
                arrival_epsilon,
            );
            self.position = step.position;
            self.next_tick += stride;
            if step.arrived {
                self.arrived = true;
                return;
            }
        }

        while self.next_tick <= tick {
            let step = step_towards(self.position, target_position, per_tick, arrival_epsilon);
            self.position = step.position;
            self.next_tick += 1;
            if step.arrived {
                self.arrived = true;
                return;
            }
        }
    }

    pub fn effect(&self) -> EntityId {
        self.effect
    }

    pub fn caster(&self) -> EntityId {
        self.caster
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn prefab(&self) -> PrefabKind {
        self.prefab
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn spawn_tick(&self) -> Tick {
        self.spawn_tick
    }

    /// Reached the target; waiting for the authority's resolution.
    pub fn has_arrived(&self) -> bool {
        self.arrived
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}
