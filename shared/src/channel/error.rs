use thiserror::Error;

use crate::{EntityId, ObserverKey};

/// Errors returned by the authority side of the transition channel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The entity was destroyed or its stream already ended
    #[error("{entity} has been retired; no further transitions may be published for it")]
    EntityRetired { entity: EntityId },

    /// Subscription management for an observer that never connected
    #[error("{observer} is not connected to the transition channel")]
    UnknownObserver { observer: ObserverKey },
}
