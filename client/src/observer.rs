use std::{collections::HashMap, time::Duration};

use log::{debug, info, trace, warn};

use tether_shared::{
    ChannelMessage, EntityId, Scheduler, Tick, Transition, TransitionReceiver,
};

use crate::{
    BuffFollowEffect, FollowEndReason, MirroredBuff, MountMirror, ObservedProjectile,
    ObserverConfig, ObserverEvent, ObserverView,
};

/// A client's mirror of the authority. Discrete state changes when a
/// transition is released by the [`TransitionReceiver`], or when a mirrored
/// mount's actors drop out of view; continuous state (projectile flight, buff
/// countdown) is re-simulated by [`Observer::step`].
/// Nothing here ever applies damage or touches ground truth.
pub struct Observer {
    config: ObserverConfig,
    receiver: TransitionReceiver,
    mounts: HashMap<EntityId, MountMirror>,
    owner_speeds: HashMap<EntityId, f32>,
    projectiles: HashMap<EntityId, ObservedProjectile>,
    buffs: HashMap<EntityId, Vec<MirroredBuff>>,
    follows: Vec<BuffFollowEffect>,
    events: Vec<ObserverEvent>,
}

impl Observer {
    pub fn new(config: ObserverConfig) -> Self {
        Self {
            receiver: TransitionReceiver::with_config(config.channel.clone()),
            mounts: HashMap::new(),
            owner_speeds: HashMap::new(),
            projectiles: HashMap::new(),
            buffs: HashMap::new(),
            follows: Vec::new(),
            events: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    pub fn receiver(&self) -> &TransitionReceiver {
        &self.receiver
    }

    /// Feeds messages from the transport, in whatever order they arrived, and
    /// applies every transition the receiver releases.
    pub fn receive<I: IntoIterator<Item = ChannelMessage>>(&mut self, messages: I) {
        for message in messages {
            self.receiver.receive(message);
        }
        for (entity, transition) in self.receiver.take_ready() {
            self.apply(entity, transition);
        }
    }

    /// Advances local simulation to the scheduler's current tick.
    pub fn step<V: ObserverView, S: Scheduler>(&mut self, view: &V, scheduler: &S) {
        let tick = scheduler.current_tick();
        let tick_duration = scheduler.tick_duration();

        self.receiver.collect_closed(tick);
        self.prune_mounts(view);

        for projectile in self.projectiles.values_mut() {
            projectile.advance_to(
                view,
                tick,
                tick_duration,
                self.config.arrival_epsilon,
                self.config.max_catch_up_ticks,
            );
        }

        self.step_buffs(tick, tick_duration);
        self.reconcile_follows(view);
    }

    /// Drains the visual events produced since the last call.
    pub fn take_events(&mut self) -> Vec<ObserverEvent> {
        std::mem::take(&mut self.events)
    }

    // Queries

    pub fn mount(&self, owner: &EntityId) -> Option<&MountMirror> {
        self.mounts.get(owner)
    }

    /// Owner speed as last reported by a mount transition.
    pub fn owner_speed(&self, owner: &EntityId) -> Option<f32> {
        self.owner_speeds.get(owner).copied()
    }

    pub fn projectile(&self, effect: &EntityId) -> Option<&ObservedProjectile> {
        self.projectiles.get(effect)
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    pub fn buffs(&self, target: &EntityId) -> &[MirroredBuff] {
        self.buffs
            .get(target)
            .map(|buffs| buffs.as_slice())
            .unwrap_or(&[])
    }

    pub fn buff_remaining(&self, target: &EntityId, name: &str) -> Option<Duration> {
        self.buffs(target)
            .iter()
            .find(|buff| buff.name() == name)
            .map(|buff| buff.remaining())
    }

    pub fn follow_effects(&self) -> &[BuffFollowEffect] {
        &self.follows
    }

    // Transitions

    fn apply(&mut self, entity: EntityId, transition: Transition) {
        trace!("applying {:?} for {}", transition.kind(), entity);

        match transition {
            Transition::MountOn {
                mount,
                prefab,
                speed_multiplier,
                owner_speed,
            } => {
                if let Some(mirror) = self.mounts.get(&entity) {
                    if mirror.mount() == mount {
                        return;
                    }
                    warn!(
                        "{} mounted {} while {} was still attached",
                        entity,
                        mount,
                        mirror.mount()
                    );
                }
                self.mounts.insert(entity, MountMirror::attached(mount, prefab));
                self.owner_speeds.insert(entity, owner_speed * speed_multiplier);
                self.events.push(ObserverEvent::MountAttached {
                    owner: entity,
                    mount,
                    prefab,
                });
                info!("{} mounted {}", entity, mount);
            }
            Transition::Death {
                mount,
                death_animation,
            } => match self.mounts.get_mut(&entity) {
                Some(mirror) if mirror.mount() == mount => {
                    if mirror.die(death_animation) {
                        self.events.push(ObserverEvent::MountDeathStarted {
                            owner: entity,
                            mount,
                            death_animation,
                        });
                    }
                }
                _ => debug!("ignoring death of unknown mount {} for {}", mount, entity),
            },
            Transition::MountOff {
                mount,
                restored_speed,
            } => {
                match self.mounts.get(&entity) {
                    Some(mirror) if mirror.mount() != mount => {
                        debug!("ignoring dismount of unknown mount {} for {}", mount, entity);
                        return;
                    }
                    Some(_) => {
                        self.mounts.remove(&entity);
                        self.events.push(ObserverEvent::MountDetached {
                            owner: entity,
                            mount,
                        });
                        info!("{} unmounted {}", entity, mount);
                    }
                    None => {}
                }
                self.owner_speeds.insert(entity, restored_speed);
            }
            Transition::EffectSpawned {
                caster,
                target,
                origin,
                speed,
                spawn_tick,
                prefab,
            } => {
                if self.projectiles.contains_key(&entity) {
                    return;
                }
                let projectile = ObservedProjectile::spawned(
                    entity, caster, target, origin, speed, spawn_tick, prefab,
                );
                self.projectiles.insert(entity, projectile);
                self.events.push(ObserverEvent::ProjectileSpawned {
                    effect: entity,
                    prefab,
                });
            }
            Transition::EffectResolved { outcome } => {
                if self.projectiles.remove(&entity).is_some() {
                    self.events.push(ObserverEvent::ProjectileResolved {
                        effect: entity,
                        outcome,
                    });
                } else {
                    debug!("{} resolved before its spawn was seen", entity);
                }
            }
            Transition::BuffApplied {
                name,
                duration,
                applied_tick,
            } => {
                // follow effects start from `reconcile_follows`, once the buff
                // has been stepped against the current tick
                let buffs = self.buffs.entry(entity).or_default();
                match buffs.iter_mut().find(|buff| buff.name() == name) {
                    Some(buff) => {
                        if !buff.reapply(duration, applied_tick) {
                            trace!("ignoring replayed {} on {}", name, entity);
                        }
                    }
                    None => buffs.push(MirroredBuff::applied(name, duration, applied_tick)),
                }
            }
        }
    }

    // Stepping

    /// Drops mirrors whose owner or mount actor is gone from view. An owner
    /// that leaves mid-ride has its stream retired without a `MountOff`.
    fn prune_mounts<V: ObserverView>(&mut self, view: &V) {
        let mut gone: Vec<(EntityId, EntityId)> = self
            .mounts
            .iter()
            .filter(|(owner, mirror)| {
                view.position(**owner).is_none() || view.position(mirror.mount()).is_none()
            })
            .map(|(owner, mirror)| (*owner, mirror.mount()))
            .collect();
        gone.sort();

        for (owner, mount) in gone {
            self.mounts.remove(&owner);
            self.events.push(ObserverEvent::MountDetached { owner, mount });
            debug!("{} lost mount {} without a dismount", owner, mount);
        }

        self.owner_speeds.retain(|owner, _| view.position(*owner).is_some());
    }

    fn step_buffs(&mut self, tick: Tick, tick_duration: Duration) {
        self.buffs.retain(|_, buffs| {
            for buff in buffs.iter_mut() {
                buff.step(tick, tick_duration);
            }
            buffs.retain(|buff| !buff.is_expired());
            !buffs.is_empty()
        });
    }

    /// Ends follow effects whose buff is gone, was recast, or whose target left
    /// view, then starts one for every visible buff that has none.
    fn reconcile_follows<V: ObserverView>(&mut self, view: &V) {
        let mut kept = Vec::with_capacity(self.follows.len());

        for mut follow in std::mem::take(&mut self.follows) {
            let target = follow.target();
            let buff = self
                .buffs
                .get(&target)
                .and_then(|buffs| buffs.iter().find(|buff| buff.name() == follow.name()));

            let reason = if view.position(target).is_none() {
                FollowEndReason::TargetLost
            } else {
                match buff {
                    None => FollowEndReason::Expired,
                    Some(buff) if follow.is_superseded_by(buff) => FollowEndReason::Recast,
                    Some(buff) => {
                        follow.track(buff);
                        kept.push(follow);
                        continue;
                    }
                }
            };

            trace!("follow effect {} on {} ended: {:?}", follow.name(), target, reason);
            self.events.push(ObserverEvent::BuffFollowEnded {
                target,
                name: follow.name().to_string(),
                reason,
            });
        }

        let mut targets: Vec<EntityId> = self.buffs.keys().copied().collect();
        targets.sort();
        for target in targets {
            if view.position(target).is_none() {
                continue;
            }
            let Some(buffs) = self.buffs.get(&target) else {
                continue;
            };
            for buff in buffs {
                let following = kept
                    .iter()
                    .any(|follow| follow.target() == target && follow.name() == buff.name());
                if following {
                    continue;
                }
                kept.push(BuffFollowEffect::follow(target, buff));
                self.events.push(ObserverEvent::BuffFollowStarted {
                    target,
                    name: buff.name().to_string(),
                });
            }
        }

        self.follows = kept;
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::new(ObserverConfig::default())
    }
}
