//! # Tether Shared
//! Common functionality shared between tether-server & tether-client crates:
//! the timer, simulated game time, the deterministic stepping rules, entity
//! ids, transitions and the per-entity transition channel.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod descriptors;
mod entity;
mod game_time;
mod geometry;
mod scheduler;
mod stepping;
mod timer;
mod transition;
mod types;
mod wrapping_number;

pub mod channel;

pub use channel::{
    ChannelConfig, ChannelError, ChannelMessage, LinkConditioner, LinkConditionerConfig,
    TransitionReceiver, TransitionSender,
};
pub use descriptors::{
    DamagePayload, MountDescriptor, PrefabKind, SkillDescriptor, SkillKind, StatusEffect,
    StatusEffectKind,
};
pub use entity::{EntityId, EntityRegistry};
pub use game_time::GameInstant;
pub use geometry::{Rotation, Vec3};
pub use scheduler::{Scheduler, TickClock};
pub use stepping::{buff_remaining, step_towards, tick_distance, Step};
pub use timer::Timer;
pub use transition::{Delivery, ResolveOutcome, SnapshotKey, Transition, TransitionKind};
pub use types::{ObserverKey, Tick, TransitionIndex};
pub use wrapping_number::{next_index, sequence_greater_than, sequence_less_than};
