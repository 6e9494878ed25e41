use std::time::Duration;

use tether_shared::{EntityId, PrefabKind};

/// The observer's copy of one owner's mount. Only ever changed by received
/// transitions.
#[derive(Clone, Debug, PartialEq)]
pub struct MountMirror {
    mount: EntityId,
    prefab: PrefabKind,
    attached: bool,
    dead: bool,
    death_animation: Duration,
}

impl MountMirror {
    pub(crate) fn attached(mount: EntityId, prefab: PrefabKind) -> Self {
        Self {
            mount,
            prefab,
            attached: true,
            dead: false,
            death_animation: Duration::ZERO,
        }
    }

    /// Returns `false` if the mount was already dead.
    pub(crate) fn die(&mut self, death_animation: Duration) -> bool {
        if self.dead {
            return false;
        }
        self.dead = true;
        self.death_animation = death_animation;
        true
    }

    pub fn mount(&self) -> EntityId {
        self.mount
    }

    pub fn prefab(&self) -> PrefabKind {
        self.prefab
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Zero until the mount dies.
    pub fn death_animation(&self) -> Duration {
        self.death_animation
    }
}
