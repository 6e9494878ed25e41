use std::time::Duration;

use tether_shared::{EntityId, PrefabKind, ResolveOutcome};

/// Why a buff follow effect stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowEndReason {
    Expired,
    /// The buff was cast again; a fresh follow effect replaces this one.
    Recast,
    TargetLost,
}

/// Visual events for the rendering layer, drained with
/// [`Observer::take_events`](crate::Observer::take_events).
#[derive(Clone, Debug, PartialEq)]
pub enum ObserverEvent {
    MountAttached {
        owner: EntityId,
        mount: EntityId,
        prefab: PrefabKind,
    },
    MountDeathStarted {
        owner: EntityId,
        mount: EntityId,
        death_animation: Duration,
    },
    MountDetached {
        owner: EntityId,
        mount: EntityId,
    },
    ProjectileSpawned {
        effect: EntityId,
        prefab: PrefabKind,
    },
    ProjectileResolved {
        effect: EntityId,
        outcome: ResolveOutcome,
    },
    BuffFollowStarted {
        target: EntityId,
        name: String,
    },
    BuffFollowEnded {
        target: EntityId,
        name: String,
        reason: FollowEndReason,
    },
}
