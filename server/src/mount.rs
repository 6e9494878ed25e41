use std::time::Duration;

use tether_shared::{EntityId, GameInstant, MountDescriptor, PrefabKind, Timer};

/// Lifecycle of a mount from the owner's point of view.
///
/// ```text
///  Unmounted --consume item--> Mounting --spawned--> Mounted --health 0--> Dying
///      ^                                                |                    |
///      +------------------- dismount -------------------+                    |
///      +------------------------- death timer ready -------------------------+
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MountPhase {
    Unmounted,
    Mounting,
    Mounted,
    Dying,
}

/// Ground truth for one owner's mount. Lives only on the authority.
#[derive(Clone, Debug)]
pub struct MountState {
    owner: EntityId,
    mount: Option<EntityId>,
    prefab: PrefabKind,
    phase: MountPhase,
    attached: bool,
    dead: bool,
    speed_multiplier: f32,
    previous_speed: f32,
    death_animation: Duration,
    death_timer: Timer,
    pending_dismount: bool,
}

impl MountState {
    pub(crate) fn mounting(owner: EntityId, descriptor: &MountDescriptor) -> Self {
        Self {
            owner,
            mount: None,
            prefab: descriptor.prefab,
            phase: MountPhase::Mounting,
            attached: false,
            dead: false,
            speed_multiplier: descriptor.speed_multiplier,
            previous_speed: 0.0,
            death_animation: descriptor.death_animation,
            death_timer: Timer::default(),
            pending_dismount: false,
        }
    }

    pub(crate) fn attach(&mut self, mount: EntityId, previous_speed: f32) {
        self.mount = Some(mount);
        self.previous_speed = previous_speed;
        self.attached = true;
        self.phase = MountPhase::Mounted;
    }

    pub(crate) fn begin_dying(&mut self, now: GameInstant) {
        self.dead = true;
        self.death_timer.start(self.death_animation, now);
        self.phase = MountPhase::Dying;
    }

    pub(crate) fn defer_dismount(&mut self) {
        self.pending_dismount = true;
    }

    pub(crate) fn death_finished(&self, now: GameInstant) -> bool {
        self.phase == MountPhase::Dying && self.death_timer.is_ready(now)
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn mount(&self) -> Option<EntityId> {
        self.mount
    }

    pub fn prefab(&self) -> PrefabKind {
        self.prefab
    }

    pub fn phase(&self) -> MountPhase {
        self.phase
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Owner speed before the mount's multiplier was applied.
    pub fn previous_speed(&self) -> f32 {
        self.previous_speed
    }

    pub fn death_timer(&self) -> &Timer {
        &self.death_timer
    }

    pub fn has_pending_dismount(&self) -> bool {
        self.pending_dismount
    }
}
