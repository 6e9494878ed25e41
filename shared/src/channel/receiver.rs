//! Observer side of the transition channel.
//!
//! Messages arrive in whatever order the transport chose; the receiver routes
//! each one to its entity's channel and collects whatever those channels
//! declare ready. Ready transitions are ordered per entity; across entities
//! they come out in arrival order.
//!
//! A closed channel stays behind as a tombstone, so stragglers for a
//! resolved entity are dropped, until [`TransitionReceiver::collect_closed`]
//! forgets it `tombstone_ticks` later.

use std::collections::HashMap;

use log::trace;

use crate::{
    channel::{
        entity_channel_receiver::{EntityChannelReceiver, EntityChannelState},
        ChannelConfig, ChannelMessage,
    },
    EntityId, Tick, Transition,
};

pub struct TransitionReceiver {
    config: ChannelConfig,
    entity_channels: HashMap<EntityId, EntityChannelReceiver>,
    // entity -> tick its channel closed on
    closed: HashMap<EntityId, Tick>,
    ready: Vec<(EntityId, Transition)>,
    tick: Tick,
}

impl Default for TransitionReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionReceiver {
    pub fn new() -> Self {
        Self::with_config(ChannelConfig::default())
    }

    pub fn with_config(config: ChannelConfig) -> Self {
        Self {
            config,
            entity_channels: HashMap::new(),
            closed: HashMap::new(),
            ready: Vec::new(),
            tick: 0,
        }
    }

    pub fn receive(&mut self, message: ChannelMessage) {
        let entity = message.entity();
        let channel = self
            .entity_channels
            .entry(entity)
            .or_insert_with(EntityChannelReceiver::new);

        match message {
            ChannelMessage::Snapshot {
                resume_at,
                transitions,
                ..
            } => channel.accept_snapshot(resume_at, transitions),
            ChannelMessage::Reliable {
                index, transition, ..
            } => channel.accept_reliable(index, transition),
            ChannelMessage::Cosmetic { transition, .. } => channel.accept_cosmetic(transition),
        }

        channel.drain_into(entity, &mut self.ready);
        if channel.state() == EntityChannelState::Closed {
            self.closed.entry(entity).or_insert(self.tick);
        }
    }

    /// Drops channels closed more than `tombstone_ticks` before `tick`.
    /// Channels closing later are stamped with `tick`.
    pub fn collect_closed(&mut self, tick: Tick) {
        self.tick = tick;
        let horizon = self.config.tombstone_ticks;
        let entity_channels = &mut self.entity_channels;
        self.closed.retain(|entity, closed_at| {
            if tick.saturating_sub(*closed_at) <= horizon {
                return true;
            }
            trace!("forgetting closed channel for {}", entity);
            entity_channels.remove(entity);
            false
        });
    }

    /// Entity channels currently held, closed ones included
    pub fn channel_count(&self) -> usize {
        self.entity_channels.len()
    }

    /// Hands over every transition released since the last call.
    pub fn take_ready(&mut self) -> Vec<(EntityId, Transition)> {
        std::mem::take(&mut self.ready)
    }

    pub fn is_synced(&self, entity: &EntityId) -> bool {
        self.channel_state(entity) == Some(EntityChannelState::Synced)
    }

    pub fn is_closed(&self, entity: &EntityId) -> bool {
        self.channel_state(entity) == Some(EntityChannelState::Closed)
    }

    /// Reliable messages held back waiting for a snapshot or a missing index.
    pub fn buffered_len(&self, entity: &EntityId) -> usize {
        self.entity_channels
            .get(entity)
            .map(|channel| channel.buffered_len())
            .unwrap_or(0)
    }

    fn channel_state(&self, entity: &EntityId) -> Option<EntityChannelState> {
        self.entity_channels.get(entity).map(|channel| channel.state())
    }
}
