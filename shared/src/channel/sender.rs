//! Authority side of the transition channel.
//!
//! The sender keeps, per entity, the next index to stamp, the latest
//! transition of each kind (for late-join snapshots), and the set of
//! subscribed observers. Per observer it keeps an outgoing queue that the
//! transport drains with [`TransitionSender::take_outgoing`]. Retired
//! entities are remembered for `tombstone_ticks` and then forgotten by
//! [`TransitionSender::collect_retired`].

use std::collections::{hash_map::Entry, HashMap, HashSet};

use log::{debug, trace, warn};

use crate::{
    channel::{ChannelConfig, ChannelError, ChannelMessage},
    next_index, Delivery, EntityId, ObserverKey, SnapshotKey, Tick, Transition, TransitionIndex,
};

struct EntityRecord {
    next_index: TransitionIndex,
    // publish order, one entry per snapshot key
    latest: Vec<(SnapshotKey, Transition)>,
    subscribers: HashSet<ObserverKey>,
}

impl EntityRecord {
    fn new() -> Self {
        Self {
            next_index: 0,
            latest: Vec::new(),
            subscribers: HashSet::new(),
        }
    }

    fn record_latest(&mut self, transition: &Transition) {
        let key = transition.snapshot_key();
        self.latest.retain(|(old_key, _)| *old_key != key);
        self.latest.push((key, transition.clone()));
    }

    fn snapshot(&self, entity: EntityId) -> ChannelMessage {
        ChannelMessage::Snapshot {
            entity,
            resume_at: self.next_index,
            transitions: self
                .latest
                .iter()
                .map(|(_, transition)| transition.clone())
                .collect(),
        }
    }
}

pub struct TransitionSender {
    config: ChannelConfig,
    entities: HashMap<EntityId, EntityRecord>,
    // entity -> tick it was retired on
    retired: HashMap<EntityId, Tick>,
    outgoing: HashMap<ObserverKey, Vec<ChannelMessage>>,
    tick: Tick,
}

impl TransitionSender {
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            entities: HashMap::new(),
            retired: HashMap::new(),
            outgoing: HashMap::new(),
            tick: 0,
        }
    }

    // Observers

    pub fn add_observer(&mut self, observer: ObserverKey) {
        if self.outgoing.contains_key(&observer) {
            warn!("{} is already connected to the transition channel", observer);
            return;
        }

        let mut queue = Vec::new();
        if self.config.auto_subscribe {
            for (entity, record) in self.entities.iter_mut() {
                record.subscribers.insert(observer);
                queue.push(record.snapshot(*entity));
            }
        }
        debug!("{} connected with {} snapshot(s)", observer, queue.len());
        self.outgoing.insert(observer, queue);
    }

    pub fn remove_observer(&mut self, observer: &ObserverKey) -> bool {
        for record in self.entities.values_mut() {
            record.subscribers.remove(observer);
        }
        self.outgoing.remove(observer).is_some()
    }

    pub fn has_observer(&self, observer: &ObserverKey) -> bool {
        self.outgoing.contains_key(observer)
    }

    pub fn observers(&self) -> Vec<ObserverKey> {
        let mut observers: Vec<ObserverKey> = self.outgoing.keys().copied().collect();
        observers.sort();
        observers
    }

    /// Subscribes `observer` to `entity`, queueing a snapshot of the entity's
    /// latest state. Subscribing twice is a no-op.
    pub fn subscribe(
        &mut self,
        observer: ObserverKey,
        entity: EntityId,
    ) -> Result<(), ChannelError> {
        let Some(queue) = self.outgoing.get_mut(&observer) else {
            return Err(ChannelError::UnknownObserver { observer });
        };
        if self.retired.contains_key(&entity) {
            return Err(ChannelError::EntityRetired { entity });
        }

        let record = self.entities.entry(entity).or_insert_with(EntityRecord::new);
        if record.subscribers.insert(observer) {
            queue.push(record.snapshot(entity));
        }
        Ok(())
    }

    pub fn unsubscribe(&mut self, observer: &ObserverKey, entity: &EntityId) -> bool {
        self.entities
            .get_mut(entity)
            .map(|record| record.subscribers.remove(observer))
            .unwrap_or(false)
    }

    pub fn is_subscribed(&self, observer: &ObserverKey, entity: &EntityId) -> bool {
        self.entities
            .get(entity)
            .map(|record| record.subscribers.contains(observer))
            .unwrap_or(false)
    }

    // Publishing

    /// Queues `transition` for every observer subscribed to `entity`.
    ///
    /// Returns the index the transition was stamped with, or `None` for
    /// cosmetic kinds, which travel unsequenced.
    pub fn publish(
        &mut self,
        entity: EntityId,
        transition: Transition,
    ) -> Result<Option<TransitionIndex>, ChannelError> {
        if self.retired.contains_key(&entity) {
            return Err(ChannelError::EntityRetired { entity });
        }

        let record = match self.entities.entry(entity) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let record = entry.insert(EntityRecord::new());
                if self.config.auto_subscribe {
                    for (observer, queue) in self.outgoing.iter_mut() {
                        record.subscribers.insert(*observer);
                        queue.push(record.snapshot(entity));
                    }
                }
                record
            }
        };

        record.record_latest(&transition);

        let index = match transition.delivery() {
            Delivery::Reliable => {
                let index = record.next_index;
                record.next_index = next_index(index);
                Some(index)
            }
            Delivery::Cosmetic => None,
        };

        for observer in record.subscribers.iter() {
            let Some(queue) = self.outgoing.get_mut(observer) else {
                continue;
            };
            let message = match index {
                Some(index) => ChannelMessage::Reliable {
                    entity,
                    index,
                    transition: transition.clone(),
                },
                None => ChannelMessage::Cosmetic {
                    entity,
                    transition: transition.clone(),
                },
            };
            queue.push(message);
        }

        trace!(
            "published {:?} for {} (index={:?})",
            transition.kind(),
            entity,
            index
        );

        if transition.is_terminal() {
            self.retire(entity);
        }

        Ok(index)
    }

    /// Ends `entity`'s stream: messages already queued are still delivered,
    /// later publishes are refused. Returns `false` if it was already retired.
    pub fn retire(&mut self, entity: EntityId) -> bool {
        self.entities.remove(&entity);
        match self.retired.entry(entity) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(self.tick);
                debug!("retired transition stream for {}", entity);
                true
            }
        }
    }

    pub fn is_retired(&self, entity: &EntityId) -> bool {
        self.retired.contains_key(entity)
    }

    /// Retired entities still remembered
    pub fn retired_len(&self) -> usize {
        self.retired.len()
    }

    /// Forgets entities retired more than `tombstone_ticks` before `tick`.
    /// Later retirements are stamped with `tick`.
    pub fn collect_retired(&mut self, tick: Tick) {
        self.tick = tick;
        let horizon = self.config.tombstone_ticks;
        self.retired.retain(|_, retired_at| tick.saturating_sub(*retired_at) <= horizon);
    }

    /// Drops the latest transition recorded under `key`, so snapshots sent
    /// from now on no longer carry it. Live observers are not told.
    pub fn clear_latest(&mut self, entity: &EntityId, key: &SnapshotKey) {
        if let Some(record) = self.entities.get_mut(entity) {
            record.latest.retain(|(old_key, _)| old_key != key);
        }
    }

    /// The index the next reliable transition for `entity` will carry.
    pub fn next_index(&self, entity: &EntityId) -> Option<TransitionIndex> {
        self.entities.get(entity).map(|record| record.next_index)
    }

    // Transport

    pub fn take_outgoing(&mut self, observer: &ObserverKey) -> Vec<ChannelMessage> {
        self.outgoing
            .get_mut(observer)
            .map(std::mem::take)
            .unwrap_or_default()
    }
}
