use std::time::Duration;

use crate::{EntityId, PrefabKind, Tick, Vec3};

/// How a projectile effect ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolveOutcome {
    /// Reached the target; damage was applied.
    Hit,
    /// Caster or target vanished first; no damage.
    Fizzled,
}

/// A discrete state change published by the authority. Each variant is keyed
/// on one entity: mount transitions on the owner, effect transitions on the
/// effect actor, buff transitions on the buff's target.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    MountOn {
        mount: EntityId,
        prefab: PrefabKind,
        speed_multiplier: f32,
        /// Owner speed before the multiplier was applied.
        owner_speed: f32,
    },
    Death {
        mount: EntityId,
        death_animation: Duration,
    },
    MountOff {
        mount: EntityId,
        restored_speed: f32,
    },
    EffectSpawned {
        caster: EntityId,
        target: EntityId,
        origin: Vec3,
        speed: f32,
        spawn_tick: Tick,
        prefab: PrefabKind,
    },
    EffectResolved {
        outcome: ResolveOutcome,
    },
    BuffApplied {
        name: String,
        duration: Duration,
        applied_tick: Tick,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    MountOn,
    Death,
    MountOff,
    EffectSpawned,
    EffectResolved,
    BuffApplied,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Sequenced per entity, never dropped.
    Reliable,
    /// Unsequenced; the transport may drop it.
    Cosmetic,
}

/// Slot a transition occupies in an entity's latest-state record. Buffs are
/// tracked per name so a late joiner learns about every active buff.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SnapshotKey {
    Kind(TransitionKind),
    Buff(String),
}

impl TransitionKind {
    pub fn delivery(&self) -> Delivery {
        match self {
            TransitionKind::EffectSpawned => Delivery::Cosmetic,
            TransitionKind::MountOn
            | TransitionKind::Death
            | TransitionKind::MountOff
            | TransitionKind::EffectResolved
            | TransitionKind::BuffApplied => Delivery::Reliable,
        }
    }

    /// Terminal transitions end the entity's stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransitionKind::EffectResolved)
    }
}

impl Transition {
    pub fn kind(&self) -> TransitionKind {
        match self {
            Transition::MountOn { .. } => TransitionKind::MountOn,
            Transition::Death { .. } => TransitionKind::Death,
            Transition::MountOff { .. } => TransitionKind::MountOff,
            Transition::EffectSpawned { .. } => TransitionKind::EffectSpawned,
            Transition::EffectResolved { .. } => TransitionKind::EffectResolved,
            Transition::BuffApplied { .. } => TransitionKind::BuffApplied,
        }
    }

    pub fn delivery(&self) -> Delivery {
        self.kind().delivery()
    }

    pub fn is_terminal(&self) -> bool {
        self.kind().is_terminal()
    }

    pub fn snapshot_key(&self) -> SnapshotKey {
        match self {
            Transition::BuffApplied { name, .. } => SnapshotKey::Buff(name.clone()),
            other => SnapshotKey::Kind(other.kind()),
        }
    }
}
