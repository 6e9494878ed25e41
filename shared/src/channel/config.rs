use crate::Tick;

/// Contains Config properties which will be used by the transition channel
#[derive(Clone, Debug)]
pub struct ChannelConfig {
    /// When set, every connected observer is subscribed to every entity: a
    /// new observer receives snapshots of all known entities, and the first
    /// publish for an entity subscribes all connected observers. Turn it off
    /// to drive interest management with explicit `subscribe` calls.
    pub auto_subscribe: bool,
    /// Ticks a retired (sender) or closed (receiver) entity stream is
    /// remembered before it is forgotten. Must exceed the worst transport
    /// delay: a message for a forgotten entity starts a fresh stream.
    pub tombstone_ticks: Tick,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            auto_subscribe: true,
            tombstone_ticks: 600,
        }
    }
}
