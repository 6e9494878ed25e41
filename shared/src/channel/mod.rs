//! # Transition Channel
//!
//! Carries discrete [`Transition`](crate::Transition)s from the authority to
//! every interested observer over a transport that may **reorder**,
//! **duplicate**, and (for cosmetic kinds only) **drop** messages.
//!
//! ## Architectural sketch
//! 1. **Publish**
//!    [`TransitionSender::publish`] stamps every reliable transition with the
//!    entity's next `TransitionIndex` (`u16`, wrap-safe) and records it as the
//!    latest transition of its kind. Cosmetic transitions are recorded but go
//!    out unstamped.
//! 2. **Subscribe**
//!    A newly subscribed observer first receives a `Snapshot`: the latest
//!    transition of each kind, in publish order, plus the index live messages
//!    resume from. Late joiners therefore converge without replaying history.
//! 3. **Receive**
//!    [`TransitionReceiver`] owns one `EntityChannelReceiver` per entity.
//!    Each buffers until its snapshot arrives, then releases reliable
//!    messages strictly in index order, dropping duplicates and anything
//!    older than the snapshot.
//!
//! ## Guarantees
//! * **Per-entity order**: an observer never sees `MountOff` before the
//!   `MountOn` that preceded it for the same entity.
//! * **No cross-entity blocking**: a delayed message for one entity never
//!   stalls another entity's stream.
//! * **At-most-once** release per `(entity, index)`.
//! * **Retirement**: once an entity is retired (destroyed, or a terminal
//!   transition was published) the sender refuses new transitions for it and
//!   the receiver closes its stream.
//!
//! | Module | Role |
//! |--------|------|
//! | [`sender`] | authority side: sequencing, latest-state record, per-observer queues |
//! | [`receiver`] | observer side: per-entity demultiplexing |
//! | `entity_channel_receiver` | per-entity reorder buffer + state machine |
//! | [`link_conditioner`] | simulated lossy / reordering transport |

mod config;
mod entity_channel_receiver;
mod error;
mod message;
mod ordered_ids;

pub mod link_conditioner;
pub mod receiver;
pub mod sender;

pub use config::ChannelConfig;
pub use error::ChannelError;
pub use link_conditioner::{LinkConditioner, LinkConditionerConfig};
pub use message::ChannelMessage;
pub use receiver::TransitionReceiver;
pub use sender::TransitionSender;
