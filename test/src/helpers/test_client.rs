use tether_client::{Observer, ObserverConfig};
use tether_shared::{ChannelMessage, LinkConditioner, LinkConditionerConfig, ObserverKey, Scheduler};

use crate::{TestServer, TestWorld};

/// An observer behind a (possibly lossy) simulated link
pub struct TestClient {
    pub key: ObserverKey,
    pub observer: Observer,
    link: LinkConditioner,
}

impl TestClient {
    pub fn new(key: u64) -> Self {
        Self::with_link(key, LinkConditionerConfig::perfect(), key)
    }

    pub fn with_link(key: u64, config: LinkConditionerConfig, seed: u64) -> Self {
        Self {
            key: ObserverKey::new(key),
            observer: Observer::new(ObserverConfig::default()),
            link: LinkConditioner::with_seed(config, seed),
        }
    }

    pub fn with_config(key: u64, config: ObserverConfig) -> Self {
        Self {
            key: ObserverKey::new(key),
            observer: Observer::new(config),
            link: LinkConditioner::with_seed(LinkConditionerConfig::perfect(), key),
        }
    }

    /// Registers with the server's transition channel
    pub fn connect(&mut self, server: &mut TestServer) {
        server.authority.channel_mut().add_observer(self.key);
    }

    pub fn deliver(&mut self, messages: Vec<ChannelMessage>) {
        let messages = self.link.condition(messages);
        self.observer.receive(messages);
    }

    pub fn step<S: Scheduler>(&mut self, view: &TestWorld, scheduler: &S) {
        self.observer.step(view, scheduler);
    }
}
