//! ## `EntityChannelReceiver` – per-entity reorder buffer
//!
//! ```text
//!     +--------------------+   Snapshot(resume_at)   +----------+
//!     |  AwaitingSnapshot  | ----------------------> |  Synced  |
//!     +--------------------+                         +----+-----+
//!                                                         | terminal transition
//!                                                         v
//!                                                    +----------+
//!                                                    |  Closed  |
//!                                                    +----------+
//! ```
//!
//! * **`AwaitingSnapshot`**: reliable messages are buffered; nothing is
//!   released because the channel does not yet know which index comes next.
//! * **`Synced`**: the snapshot's transitions are released, buffered messages
//!   older than `resume_at` are discarded, and from then on messages are
//!   released strictly in index order. A snapshot that is not newer than the
//!   current position is a duplicate and is ignored.
//! * **`Closed`**: a terminal transition was released; every later message is
//!   dropped.
//!
//! Cosmetic messages skip the buffer and are released on arrival unless the
//! channel is closed.

use log::trace;

use crate::{
    channel::ordered_ids::OrderedIds, next_index, sequence_greater_than, sequence_less_than,
    EntityId, Transition, TransitionIndex,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntityChannelState {
    AwaitingSnapshot,
    Synced,
    Closed,
}

pub(crate) struct EntityChannelReceiver {
    state: EntityChannelState,
    next_index: TransitionIndex,
    buffered: OrderedIds<Transition>,
    outgoing: Vec<Transition>,
}

impl EntityChannelReceiver {
    pub(crate) fn new() -> Self {
        Self {
            state: EntityChannelState::AwaitingSnapshot,
            next_index: 0,
            buffered: OrderedIds::new(),
            outgoing: Vec::new(),
        }
    }

    pub(crate) fn state(&self) -> EntityChannelState {
        self.state
    }

    pub(crate) fn buffered_len(&self) -> usize {
        self.buffered.len()
    }

    pub(crate) fn accept_snapshot(
        &mut self,
        resume_at: TransitionIndex,
        transitions: Vec<Transition>,
    ) {
        match self.state {
            EntityChannelState::Closed => return,
            EntityChannelState::Synced => {
                if !sequence_greater_than(resume_at, self.next_index) {
                    trace!("ignoring stale snapshot (resume_at={})", resume_at);
                    return;
                }
            }
            EntityChannelState::AwaitingSnapshot => {}
        }

        self.state = EntityChannelState::Synced;
        self.next_index = resume_at;
        self.buffered.pop_front_until_and_excluding(resume_at);

        for transition in transitions {
            if self.release(transition) {
                return;
            }
        }

        self.process_buffered();
    }

    pub(crate) fn accept_reliable(&mut self, index: TransitionIndex, transition: Transition) {
        match self.state {
            EntityChannelState::Closed => return,
            EntityChannelState::Synced if sequence_less_than(index, self.next_index) => {
                trace!("dropping duplicate transition (index={})", index);
                return;
            }
            _ => {}
        }

        if !self.buffered.insert(index, transition) {
            trace!("dropping duplicate buffered transition (index={})", index);
            return;
        }

        if self.state == EntityChannelState::Synced {
            self.process_buffered();
        }
    }

    pub(crate) fn accept_cosmetic(&mut self, transition: Transition) {
        if self.state == EntityChannelState::Closed {
            return;
        }
        self.outgoing.push(transition);
    }

    pub(crate) fn drain_into(&mut self, entity: EntityId, ready: &mut Vec<(EntityId, Transition)>) {
        ready.extend(
            std::mem::take(&mut self.outgoing)
                .into_iter()
                .map(|transition| (entity, transition)),
        );
    }

    fn process_buffered(&mut self) {
        while let Some(front) = self.buffered.peek_front_index() {
            if sequence_less_than(front, self.next_index) {
                self.buffered.pop_front();
                continue;
            }
            if front != self.next_index {
                // gap: wait for the missing index
                break;
            }
            let Some((_, transition)) = self.buffered.pop_front() else {
                break;
            };
            self.next_index = next_index(self.next_index);
            if self.release(transition) {
                return;
            }
        }
    }

    // Returns true if the transition closed the channel
    fn release(&mut self, transition: Transition) -> bool {
        let terminal = transition.is_terminal();
        self.outgoing.push(transition);
        if terminal {
            self.state = EntityChannelState::Closed;
            self.buffered.clear();
        }
        terminal
    }
}
