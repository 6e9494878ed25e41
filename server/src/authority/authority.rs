use std::{collections::HashMap, time::Duration};

use log::{debug, info, warn};

use tether_shared::{
    EntityId, GameInstant, MountDescriptor, ResolveOutcome, Rotation, Scheduler, SkillDescriptor,
    SkillKind, SnapshotKey, Tick, Transition, TransitionSender,
};

use crate::{
    AuthorityConfig, BuffInstance, CastError, CastId, Combat, MountError, MountPhase, MountState,
    ProjectileEffect, ProjectileStep, World,
};

/// The server-side simulation. Sole writer of ground-truth mount, projectile
/// and buff state; every discrete change it makes is published to observers
/// through its [`TransitionSender`].
///
/// Requests from collaborators (`on_*`) and the per-tick [`Authority::step`]
/// are all expected to run on the same tick loop, so transitions for one
/// entity are applied strictly one after another.
pub struct Authority {
    config: AuthorityConfig,
    sender: TransitionSender,
    mounts: HashMap<EntityId, MountState>,
    projectiles: HashMap<EntityId, ProjectileEffect>,
    buffs: HashMap<EntityId, Vec<BuffInstance>>,
    next_cast: u32,
    // last tick `step` ran for
    stepped_tick: Option<Tick>,
}

impl Authority {
    pub fn new(config: AuthorityConfig) -> Self {
        let sender = TransitionSender::new(config.channel.clone());

        Self {
            config,
            sender,
            mounts: HashMap::new(),
            projectiles: HashMap::new(),
            buffs: HashMap::new(),
            next_cast: 0,
            stepped_tick: None,
        }
    }

    pub fn config(&self) -> &AuthorityConfig {
        &self.config
    }

    /// The transition channel, for the transport and for interest management.
    pub fn channel(&self) -> &TransitionSender {
        &self.sender
    }

    pub fn channel_mut(&mut self) -> &mut TransitionSender {
        &mut self.sender
    }

    // Mount lifecycle

    /// A mount item was consumed; mounts `user` if nothing prevents it.
    pub fn on_item_consumed<W: World>(
        &mut self,
        world: &mut W,
        user: EntityId,
        descriptor: &MountDescriptor,
    ) {
        if let Err(err) = self.try_on_item_consumed(world, user, descriptor) {
            debug!("ignoring mount item: {}", err);
        }
    }

    /// Returns the spawned mount actor.
    pub fn try_on_item_consumed<W: World>(
        &mut self,
        world: &mut W,
        user: EntityId,
        descriptor: &MountDescriptor,
    ) -> Result<EntityId, MountError> {
        if !world.contains(user) {
            return Err(MountError::OwnerMissing { owner: user });
        }
        if let Some(state) = self.mounts.get(&user) {
            return Err(MountError::AlreadyMounted {
                owner: user,
                phase: state.phase(),
            });
        }
        if world.is_busy(user) {
            return Err(MountError::OwnerBusy { owner: user });
        }
        let level = world.level(user);
        if level < descriptor.required_level {
            return Err(MountError::RequirementsUnmet {
                owner: user,
                required: descriptor.required_level,
                actual: level,
            });
        }
        let (Some(position), Some(owner_speed)) = (world.position(user), world.speed(user)) else {
            return Err(MountError::OwnerMissing { owner: user });
        };

        let mut state = MountState::mounting(user, descriptor);
        let mount = world.spawn_actor(descriptor.prefab, position, Rotation::default());
        world.set_speed(user, owner_speed * descriptor.speed_multiplier);
        self.publish(
            user,
            Transition::MountOn {
                mount,
                prefab: descriptor.prefab,
                speed_multiplier: descriptor.speed_multiplier,
                owner_speed,
            },
        );
        // the spawn returning is the acknowledgment; no round trip needed
        state.attach(mount, owner_speed);
        self.mounts.insert(user, state);

        info!("{} mounted {}", user, mount);
        Ok(mount)
    }

    /// The owner's health reached zero.
    pub fn on_health_zero<S: Scheduler>(&mut self, scheduler: &S, owner: EntityId) {
        if let Err(err) = self.try_on_health_zero(scheduler, owner) {
            debug!("ignoring health-zero: {}", err);
        }
    }

    pub fn try_on_health_zero<S: Scheduler>(
        &mut self,
        scheduler: &S,
        owner: EntityId,
    ) -> Result<(), MountError> {
        let state = self
            .mounts
            .get_mut(&owner)
            .ok_or(MountError::NotMounted { owner })?;
        match state.phase() {
            MountPhase::Mounted => {}
            MountPhase::Dying => return Err(MountError::AlreadyDying { owner }),
            MountPhase::Mounting | MountPhase::Unmounted => {
                return Err(MountError::NotMounted { owner })
            }
        }
        let Some(mount) = state.mount() else {
            return Err(MountError::NotMounted { owner });
        };

        state.begin_dying(scheduler.now());
        let death_animation = state.death_timer().duration();
        self.publish(
            owner,
            Transition::Death {
                mount,
                death_animation,
            },
        );

        info!("{}'s mount {} is dying", owner, mount);
        Ok(())
    }

    /// The player asked to dismount.
    pub fn on_dismount_requested<W: World>(&mut self, world: &mut W, owner: EntityId) {
        if let Err(err) = self.try_on_dismount_requested(world, owner) {
            debug!("ignoring dismount: {}", err);
        }
    }

    /// Death takes precedence: during `Dying` the request is recorded and
    /// dropped once the mount is gone.
    pub fn try_on_dismount_requested<W: World>(
        &mut self,
        world: &mut W,
        owner: EntityId,
    ) -> Result<(), MountError> {
        let state = self
            .mounts
            .get_mut(&owner)
            .ok_or(MountError::NotMounted { owner })?;
        match state.phase() {
            MountPhase::Mounted => {}
            MountPhase::Dying => {
                state.defer_dismount();
                return Err(MountError::DismountDeferred { owner });
            }
            MountPhase::Mounting | MountPhase::Unmounted => {
                return Err(MountError::NotMounted { owner })
            }
        }

        if let Some(state) = self.mounts.remove(&owner) {
            self.finish_unmount(world, state);
        }
        Ok(())
    }

    /// The world destroyed `entity` (disconnect, despawn). Its stream is
    /// retired without a final transition; a destroyed effect actor counts as
    /// a fizzle.
    pub fn on_entity_destroyed<W: World>(&mut self, world: &mut W, entity: EntityId) {
        if let Some(mut projectile) = self.projectiles.remove(&entity) {
            if projectile.fizzle() {
                self.publish(
                    entity,
                    Transition::EffectResolved {
                        outcome: ResolveOutcome::Fizzled,
                    },
                );
            }
            return;
        }
        self.drop_entity(world, entity);
    }

    // Skills

    pub fn on_cast_skill<W: World, S: Scheduler>(
        &mut self,
        world: &mut W,
        scheduler: &S,
        caster: EntityId,
        target: EntityId,
        skill: &SkillDescriptor,
    ) -> Option<CastId> {
        match self.try_on_cast_skill(world, scheduler, caster, target, skill) {
            Ok(cast) => Some(cast),
            Err(err) => {
                debug!("ignoring cast of {}: {}", skill.name, err);
                None
            }
        }
    }

    pub fn try_on_cast_skill<W: World, S: Scheduler>(
        &mut self,
        world: &mut W,
        scheduler: &S,
        caster: EntityId,
        target: EntityId,
        skill: &SkillDescriptor,
    ) -> Result<CastId, CastError> {
        let Some(origin) = world.position(caster) else {
            return Err(CastError::CasterMissing { caster });
        };
        let Some(target_position) = world.position(target) else {
            return Err(CastError::TargetMissing { target });
        };
        let tick = scheduler.current_tick();

        match &skill.kind {
            SkillKind::Projectile {
                prefab,
                speed,
                damage,
            } => {
                if speed.is_nan() || *speed <= 0.0 {
                    return Err(CastError::InvalidSpeed { speed: *speed });
                }
                // a cast landing after this tick's step is first advanced on
                // the next one
                let spawn_tick = match self.stepped_tick {
                    Some(stepped) if stepped == tick => tick.saturating_add(1),
                    _ => tick,
                };
                let cast = self.next_cast_id();
                let rotation = Rotation::looking_at(origin, target_position);
                let effect = world.spawn_actor(*prefab, origin, rotation);
                let projectile = ProjectileEffect::new(
                    effect,
                    cast,
                    caster,
                    target,
                    origin,
                    *speed,
                    damage.clone(),
                );
                self.projectiles.insert(effect, projectile);
                self.publish(
                    effect,
                    Transition::EffectSpawned {
                        caster,
                        target,
                        origin,
                        speed: *speed,
                        spawn_tick,
                        prefab: *prefab,
                    },
                );

                info!(
                    "{} cast {} at {} ({}, effect {})",
                    caster, skill.name, target, cast, effect
                );
                Ok(cast)
            }
            SkillKind::Buff { name, duration } => {
                let cast = self.next_cast_id();
                let buffs = self.buffs.entry(target).or_default();
                match buffs.iter_mut().find(|buff| buff.name() == name.as_str()) {
                    Some(buff) => buff.recast(*duration, tick),
                    None => buffs.push(BuffInstance::new(name.clone(), *duration, tick)),
                }
                self.publish(
                    target,
                    Transition::BuffApplied {
                        name: name.clone(),
                        duration: *duration,
                        applied_tick: tick,
                    },
                );

                info!("{} cast {} on {} ({})", caster, skill.name, target, cast);
                Ok(cast)
            }
        }
    }

    // Tick

    /// Advances the authority by one fixed tick.
    pub fn step<W: World, C: Combat, S: Scheduler>(
        &mut self,
        world: &mut W,
        combat: &mut C,
        scheduler: &S,
    ) {
        self.stepped_tick = Some(scheduler.current_tick());
        self.sender.collect_retired(scheduler.current_tick());
        self.step_mounts(world, scheduler.now());
        self.step_projectiles(world, combat, scheduler.tick_duration());
        self.step_buffs(world, scheduler.current_tick(), scheduler.tick_duration());
    }

    fn step_mounts<W: World>(&mut self, world: &mut W, now: GameInstant) {
        let vanished: Vec<EntityId> = self
            .mounts
            .keys()
            .filter(|owner| !world.contains(**owner))
            .copied()
            .collect();
        for owner in vanished {
            self.drop_entity(world, owner);
        }

        let finished: Vec<EntityId> = self
            .mounts
            .values()
            .filter(|state| state.death_finished(now))
            .map(|state| state.owner())
            .collect();
        for owner in finished {
            if let Some(state) = self.mounts.remove(&owner) {
                self.finish_unmount(world, state);
            }
        }
    }

    fn step_projectiles<W: World, C: Combat>(
        &mut self,
        world: &mut W,
        combat: &mut C,
        tick_duration: Duration,
    ) {
        let arrival_epsilon = self.config.arrival_epsilon;
        let mut resolved = Vec::new();

        for projectile in self.projectiles.values_mut() {
            let outcome = match projectile.advance(&*world, tick_duration, arrival_epsilon) {
                ProjectileStep::InFlight => continue,
                ProjectileStep::Arrived => ResolveOutcome::Hit,
                ProjectileStep::ReferenceLost => ResolveOutcome::Fizzled,
            };
            if let Some(outcome) = projectile.resolve(combat, outcome) {
                resolved.push((projectile.effect(), outcome));
            }
        }

        for (effect, outcome) in resolved {
            self.projectiles.remove(&effect);
            world.destroy_actor(effect);
            self.publish(effect, Transition::EffectResolved { outcome });
            info!("effect {} resolved: {:?}", effect, outcome);
        }
    }

    fn step_buffs<W: World>(&mut self, world: &W, tick: Tick, tick_duration: Duration) {
        let sender = &mut self.sender;
        self.buffs.retain(|target, buffs| {
            if !world.contains(*target) {
                sender.retire(*target);
                return false;
            }
            for buff in buffs.iter_mut() {
                buff.step(tick, tick_duration);
            }
            buffs.retain(|buff| {
                if !buff.is_expired() {
                    return true;
                }
                debug!("buff {} on {} expired", buff.name(), target);
                sender.clear_latest(target, &SnapshotKey::Buff(buff.name().to_string()));
                false
            });
            !buffs.is_empty()
        });
    }

    // Queries

    pub fn mount(&self, owner: &EntityId) -> Option<&MountState> {
        self.mounts.get(owner)
    }

    pub fn mount_phase(&self, owner: &EntityId) -> MountPhase {
        self.mounts
            .get(owner)
            .map(|state| state.phase())
            .unwrap_or(MountPhase::Unmounted)
    }

    pub fn projectile(&self, effect: &EntityId) -> Option<&ProjectileEffect> {
        self.projectiles.get(effect)
    }

    pub fn projectile_for_cast(&self, cast: CastId) -> Option<&ProjectileEffect> {
        self.projectiles
            .values()
            .find(|projectile| projectile.cast() == cast)
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    pub fn buffs(&self, target: &EntityId) -> &[BuffInstance] {
        self.buffs
            .get(target)
            .map(|buffs| buffs.as_slice())
            .unwrap_or(&[])
    }

    pub fn buff(&self, target: &EntityId, name: &str) -> Option<&BuffInstance> {
        self.buffs(target).iter().find(|buff| buff.name() == name)
    }

    // Private

    fn next_cast_id(&mut self) -> CastId {
        self.next_cast = self.next_cast.wrapping_add(1);
        CastId::new(self.next_cast)
    }

    fn publish(&mut self, entity: EntityId, transition: Transition) {
        if let Err(err) = self.sender.publish(entity, transition) {
            warn!("dropping transition: {}", err);
        }
    }

    fn finish_unmount<W: World>(&mut self, world: &mut W, state: MountState) {
        let owner = state.owner();
        let Some(mount) = state.mount() else {
            return;
        };

        world.destroy_actor(mount);
        world.set_speed(owner, state.previous_speed());
        self.publish(
            owner,
            Transition::MountOff {
                mount,
                restored_speed: state.previous_speed(),
            },
        );

        if state.has_pending_dismount() {
            debug!("dropping dismount deferred while {}'s mount was dying", owner);
        }
        info!("{} unmounted {}", owner, mount);
    }

    fn drop_entity<W: World>(&mut self, world: &mut W, entity: EntityId) {
        if let Some(state) = self.mounts.remove(&entity) {
            if let Some(mount) = state.mount() {
                if world.contains(mount) {
                    world.destroy_actor(mount);
                }
            }
            info!("{} left the world while mounted", entity);
        }
        self.buffs.remove(&entity);
        self.sender.retire(entity);
    }
}
