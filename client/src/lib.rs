//! # Tether Client
//! The observer side of a tether. Mirrors the authority's discrete state from
//! received transitions and re-simulates continuous motion (projectile
//! flight, buff countdown) locally with the same stepping rules, so nothing
//! continuous ever has to cross the wire.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

mod buff_mirror;
mod events;
mod mount_mirror;
mod observed_projectile;
mod observer;
mod observer_config;
mod view;

pub use buff_mirror::{BuffFollowEffect, MirroredBuff};
pub use events::{FollowEndReason, ObserverEvent};
pub use mount_mirror::MountMirror;
pub use observed_projectile::ObservedProjectile;
pub use observer::Observer;
pub use observer_config::ObserverConfig;
pub use view::ObserverView;
