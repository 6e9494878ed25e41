use std::default::Default;

use tether_shared::ChannelConfig;

/// Contains Config properties which will be used by the Observer
#[derive(Clone, Debug)]
pub struct ObserverConfig {
    /// Must match the authority's value for projectile paths to agree
    pub arrival_epsilon: f32,
    /// Most ticks a projectile steps one by one in a single `step` call. A
    /// late joiner further behind than this covers the remainder in one
    /// stride.
    pub max_catch_up_ticks: u32,
    /// Only `tombstone_ticks` is read on this side: how long a closed
    /// entity stream is remembered before its receiver is dropped
    pub channel: ChannelConfig,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            arrival_epsilon: 0.01,
            max_catch_up_ticks: 600,
            channel: ChannelConfig::default(),
        }
    }
}
