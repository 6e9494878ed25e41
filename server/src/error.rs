use thiserror::Error;

use tether_shared::EntityId;

use crate::MountPhase;

/// Reasons a mount lifecycle request was ignored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MountError {
    #[error("{owner} does not exist in the world")]
    OwnerMissing { owner: EntityId },

    #[error("{owner} already has a mount ({phase:?})")]
    AlreadyMounted { owner: EntityId, phase: MountPhase },

    #[error("{owner} is busy and cannot mount")]
    OwnerBusy { owner: EntityId },

    #[error("{owner} is level {actual}, the mount requires level {required}")]
    RequirementsUnmet {
        owner: EntityId,
        required: u32,
        actual: u32,
    },

    #[error("{owner} is not mounted")]
    NotMounted { owner: EntityId },

    #[error("{owner}'s mount is already dying")]
    AlreadyDying { owner: EntityId },

    /// Dismount arrived while the death animation plays
    #[error("dismount for {owner} deferred until the death animation finishes")]
    DismountDeferred { owner: EntityId },
}

/// Reasons a skill cast was ignored
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CastError {
    #[error("caster {caster} does not exist in the world")]
    CasterMissing { caster: EntityId },

    #[error("target {target} does not exist in the world")]
    TargetMissing { target: EntityId },

    #[error("projectile speed must be positive, got {speed}")]
    InvalidSpeed { speed: f32 },
}
