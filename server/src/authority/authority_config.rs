use std::default::Default;

use tether_shared::ChannelConfig;

/// Contains Config properties which will be used by the Authority
#[derive(Clone, Debug)]
pub struct AuthorityConfig {
    /// Used to configure the transition channel to observers
    pub channel: ChannelConfig,
    /// A projectile within this distance of its target (beyond its per-tick
    /// travel) counts as arrived. Observers must use the same value.
    pub arrival_epsilon: f32,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            channel: ChannelConfig::default(),
            arrival_epsilon: 0.01,
        }
    }
}
