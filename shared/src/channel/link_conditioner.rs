//! A simulated transport for tests and soak runs.
//!
//! Reliable messages are never lost, but they may be reordered and
//! duplicated; cosmetic messages may additionally be dropped.

use fastrand::Rng;

use crate::channel::ChannelMessage;

/// Contains Config properties which will be used by a [`LinkConditioner`]
#[derive(Clone, Debug)]
pub struct LinkConditionerConfig {
    /// Shuffle each batch of messages before delivery
    pub reorder: bool,
    /// Chance, in `[0, 1]`, that a message is delivered twice
    pub duplicate_chance: f32,
    /// Chance, in `[0, 1]`, that a cosmetic message is lost
    pub cosmetic_loss: f32,
}

impl LinkConditionerConfig {
    pub fn new(reorder: bool, duplicate_chance: f32, cosmetic_loss: f32) -> Self {
        Self {
            reorder,
            duplicate_chance,
            cosmetic_loss,
        }
    }

    /// Delivers everything once, in order
    pub fn perfect() -> Self {
        Self::new(false, 0.0, 0.0)
    }

    /// Reorders every batch, duplicates a fifth of the traffic and loses half
    /// of the cosmetic messages
    pub fn poor() -> Self {
        Self::new(true, 0.2, 0.5)
    }
}

impl Default for LinkConditionerConfig {
    fn default() -> Self {
        Self::perfect()
    }
}

pub struct LinkConditioner {
    config: LinkConditionerConfig,
    rng: Rng,
}

impl LinkConditioner {
    pub fn new(config: LinkConditionerConfig) -> Self {
        Self {
            config,
            rng: Rng::new(),
        }
    }

    pub fn with_seed(config: LinkConditionerConfig, seed: u64) -> Self {
        Self {
            config,
            rng: Rng::with_seed(seed),
        }
    }

    pub fn config(&self) -> &LinkConditionerConfig {
        &self.config
    }

    /// Passes one batch of outgoing messages through the simulated link.
    pub fn condition(&mut self, messages: Vec<ChannelMessage>) -> Vec<ChannelMessage> {
        let mut delivered = Vec::with_capacity(messages.len());

        for message in messages {
            if message.is_cosmetic() && self.rng.f32() < self.config.cosmetic_loss {
                continue;
            }
            if self.rng.f32() < self.config.duplicate_chance {
                delivered.push(message.clone());
            }
            delivered.push(message);
        }

        if self.config.reorder {
            self.rng.shuffle(&mut delivered);
        }

        delivered
    }
}
