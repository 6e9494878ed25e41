use crate::{EntityId, Transition, TransitionIndex};

/// The unit the transport moves from the authority to one observer.
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelMessage {
    /// Synthesized current state for a newly subscribed observer.
    Snapshot {
        entity: EntityId,
        resume_at: TransitionIndex,
        transitions: Vec<Transition>,
    },
    Reliable {
        entity: EntityId,
        index: TransitionIndex,
        transition: Transition,
    },
    Cosmetic {
        entity: EntityId,
        transition: Transition,
    },
}

impl ChannelMessage {
    pub fn entity(&self) -> EntityId {
        match self {
            ChannelMessage::Snapshot { entity, .. }
            | ChannelMessage::Reliable { entity, .. }
            | ChannelMessage::Cosmetic { entity, .. } => *entity,
        }
    }

    pub fn is_cosmetic(&self) -> bool {
        matches!(self, ChannelMessage::Cosmetic { .. })
    }
}
