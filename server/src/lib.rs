//! # Tether Server
//! The authority side of a tether: owns the ground truth for mounts, skill
//! projectiles and buffs, advances it on a fixed tick, and publishes every
//! discrete change as a [`Transition`](tether_shared::Transition) to the
//! observers subscribed to the affected entity.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

mod authority;
mod buff;
mod error;
mod mount;
mod projectile;
mod world;

pub use authority::{Authority, AuthorityConfig};
pub use buff::BuffInstance;
pub use error::{CastError, MountError};
pub use mount::{MountPhase, MountState};
pub use projectile::{CastId, ProjectileEffect, ProjectileStep};
pub use world::{Combat, World};
