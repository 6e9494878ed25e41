use std::time::Duration;

use tether_client::{ObserverConfig, ObserverEvent};
use tether_server::{AuthorityConfig, CastError};
use tether_shared::{
    ChannelConfig, DamagePayload, EntityId, LinkConditionerConfig, PrefabKind, ResolveOutcome,
    SkillDescriptor, StatusEffectKind, Vec3,
};
use tether_test::{
    assert_projectile_converged, exchange, init_logging, tick_and_exchange, tick_and_exchange_n,
    TestClient, TestServer,
};

const BOLT: PrefabKind = PrefabKind(9);

fn bolt(speed: f32) -> SkillDescriptor {
    SkillDescriptor::projectile(
        "frost bolt",
        BOLT,
        speed,
        DamagePayload::new(10).with_status_effect(StatusEffectKind::Slow, Duration::from_secs(1)),
    )
}

fn duel(server: &mut TestServer, distance: f32) -> (EntityId, EntityId) {
    let caster = server.world.spawn_player(Vec3::ZERO, 5.0);
    let target = server.world.spawn_player(Vec3::new(distance, 0.0, 0.0), 5.0);
    (caster, target)
}

fn cast(
    server: &mut TestServer,
    caster: EntityId,
    target: EntityId,
    skill: &SkillDescriptor,
) -> EntityId {
    let cast = server
        .authority
        .try_on_cast_skill(&mut server.world, &server.clock, caster, target, skill)
        .unwrap();
    server
        .authority
        .projectile_for_cast(cast)
        .map(|projectile| projectile.effect())
        .unwrap()
}

#[test]
fn arrival_damages_target_exactly_once() {
    init_logging();

    let mut server = TestServer::new();
    let mut client = TestClient::new(1);
    client.connect(&mut server);
    let (caster, target) = duel(&mut server, 5.0);

    let effect = cast(&mut server, caster, target, &bolt(10.0));
    tick_and_exchange_n(&mut server, &mut [&mut client], 20);

    let hits = server.combat.hits();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].target, target);
    assert_eq!(hits[0].amount, 10);
    assert_eq!(hits[0].status_effects.len(), 1);
    assert_eq!(server.world.health(&target), Some(90));

    assert!(server.authority.projectile(&effect).is_none());
    assert!(server.world.actor(&effect).is_none());
    assert_eq!(client.observer.projectile_count(), 0);
    assert_eq!(
        client.observer.take_events(),
        vec![
            ObserverEvent::ProjectileSpawned {
                effect,
                prefab: BOLT,
            },
            ObserverEvent::ProjectileResolved {
                effect,
                outcome: ResolveOutcome::Hit,
            },
        ]
    );
}

#[test]
fn authority_and_observer_agree_every_tick() {
    init_logging();

    let mut server = TestServer::new();
    let mut client = TestClient::new(1);
    client.connect(&mut server);
    let (caster, target) = duel(&mut server, 20.0);

    let effect = cast(&mut server, caster, target, &bolt(15.0));
    for tick in 0..40u32 {
        // the target strafes; both sides read the same position each tick
        server
            .world
            .set_position(&target, Vec3::new(20.0, tick as f32 * 0.5, 0.0));
        tick_and_exchange(&mut server, &mut [&mut client]);
        assert_projectile_converged!(server, client, effect);
    }

    assert_eq!(server.combat.hits_on(target), 1);
    assert_eq!(client.observer.projectile_count(), 0);
}

#[test]
fn late_observer_catches_up_mid_flight() {
    let mut server = TestServer::new();
    let (caster, target) = duel(&mut server, 30.0);

    let effect = cast(&mut server, caster, target, &bolt(10.0));
    tick_and_exchange_n(&mut server, &mut [], 7);

    let mut late = TestClient::new(2);
    late.connect(&mut server);
    tick_and_exchange(&mut server, &mut [&mut late]);

    let observed = late.observer.projectile(&effect).unwrap();
    assert_eq!(observed.spawn_tick(), 0);
    assert_projectile_converged!(server, late, effect);
}

#[test]
fn cast_at_missing_target_does_nothing() {
    let mut server = TestServer::new();
    let (caster, target) = duel(&mut server, 5.0);
    server.world.despawn(&target);

    assert_eq!(
        server.authority.try_on_cast_skill(
            &mut server.world,
            &server.clock,
            caster,
            target,
            &bolt(10.0)
        ),
        Err(CastError::TargetMissing { target })
    );
    tick_and_exchange_n(&mut server, &mut [], 10);

    assert_eq!(server.authority.projectile_count(), 0);
    assert_eq!(server.world.count_prefab(BOLT), 0);
    assert!(server.combat.hits().is_empty());
}

#[test]
fn non_positive_speed_is_rejected() {
    let mut server = TestServer::new();
    let (caster, target) = duel(&mut server, 5.0);

    assert_eq!(
        server.authority.try_on_cast_skill(
            &mut server.world,
            &server.clock,
            caster,
            target,
            &bolt(0.0)
        ),
        Err(CastError::InvalidSpeed { speed: 0.0 })
    );
    assert!(server
        .authority
        .on_cast_skill(&mut server.world, &server.clock, caster, target, &bolt(f32::NAN))
        .is_none());
    assert_eq!(server.world.count_prefab(BOLT), 0);
}

#[test]
fn target_leaving_mid_flight_fizzles() {
    init_logging();

    let mut server = TestServer::new();
    let mut client = TestClient::new(1);
    client.connect(&mut server);
    let (caster, target) = duel(&mut server, 30.0);

    let effect = cast(&mut server, caster, target, &bolt(10.0));
    tick_and_exchange_n(&mut server, &mut [&mut client], 2);
    server.world.despawn(&target);
    tick_and_exchange(&mut server, &mut [&mut client]);

    assert!(server.combat.hits().is_empty());
    assert!(server.world.destroyed().contains(&effect));
    assert!(client.observer.projectile(&effect).is_none());
    assert_eq!(
        client.observer.take_events().last(),
        Some(&ObserverEvent::ProjectileResolved {
            effect,
            outcome: ResolveOutcome::Fizzled,
        })
    );
}

#[test]
fn caster_leaving_mid_flight_fizzles() {
    let mut server = TestServer::new();
    let (caster, target) = duel(&mut server, 30.0);

    let effect = cast(&mut server, caster, target, &bolt(10.0));
    tick_and_exchange(&mut server, &mut []);
    server.world.despawn(&caster);
    tick_and_exchange(&mut server, &mut []);

    assert!(server.combat.hits().is_empty());
    assert!(server.authority.projectile(&effect).is_none());
    assert_eq!(server.world.health(&target), Some(100));
}

#[test]
fn lossy_link_never_stalls_resolution() {
    init_logging();

    let mut server = TestServer::new();
    let mut client = TestClient::with_link(1, LinkConditionerConfig::poor(), 7);
    client.connect(&mut server);
    let (caster, target) = duel(&mut server, 4.0);

    let mut effects = Vec::new();
    for _ in 0..10 {
        effects.push(cast(&mut server, caster, target, &bolt(10.0)));
        tick_and_exchange(&mut server, &mut [&mut client]);
    }
    tick_and_exchange_n(&mut server, &mut [&mut client], 10);

    assert_eq!(server.combat.hits_on(target), 10);
    assert_eq!(client.observer.projectile_count(), 0);
    for effect in effects {
        assert!(client.observer.receiver().is_closed(&effect));
    }
}

#[test]
fn repeated_step_on_the_arrival_tick_hits_once() {
    let mut server = TestServer::new();
    let mut client = TestClient::new(1);
    client.connect(&mut server);
    let (caster, target) = duel(&mut server, 5.0);

    let effect = cast(&mut server, caster, target, &bolt(10.0));
    tick_and_exchange_n(&mut server, &mut [&mut client], 4);
    assert!(server.authority.projectile(&effect).is_some());

    // the arrival tick runs twice before the clock moves on
    server.step();
    server.step();
    exchange(&mut server, &mut [&mut client]);
    client.step(&server.world, &server.clock);

    assert_eq!(server.combat.hits_on(target), 1);
    assert_eq!(server.world.health(&target), Some(90));
    assert!(server.authority.projectile(&effect).is_none());
    assert_eq!(client.observer.projectile_count(), 0);
}

#[test]
fn cast_after_the_step_starts_on_the_next_tick() {
    let mut server = TestServer::new();
    let mut client = TestClient::new(1);
    client.connect(&mut server);
    let (caster, target) = duel(&mut server, 20.0);
    tick_and_exchange_n(&mut server, &mut [&mut client], 2);

    server.step();
    let effect = cast(&mut server, caster, target, &bolt(10.0));
    exchange(&mut server, &mut [&mut client]);
    client.step(&server.world, &server.clock);
    server.clock.advance();

    assert_eq!(client.observer.projectile(&effect).unwrap().spawn_tick(), 3);
    assert_projectile_converged!(server, client, effect);

    for _ in 0..25 {
        tick_and_exchange(&mut server, &mut [&mut client]);
        assert_projectile_converged!(server, client, effect);
    }
    assert_eq!(server.combat.hits_on(target), 1);
}

#[test]
fn resolved_effects_are_forgotten_on_both_sides() {
    let channel = ChannelConfig {
        tombstone_ticks: 10,
        ..Default::default()
    };
    let mut server = TestServer::with_config(
        AuthorityConfig {
            channel: channel.clone(),
            ..Default::default()
        },
        Duration::from_millis(100),
    );
    let mut client = TestClient::with_config(
        1,
        ObserverConfig {
            channel,
            ..Default::default()
        },
    );
    client.connect(&mut server);
    let (caster, target) = duel(&mut server, 3.0);

    for _ in 0..5 {
        cast(&mut server, caster, target, &bolt(10.0));
        tick_and_exchange(&mut server, &mut [&mut client]);
    }
    tick_and_exchange_n(&mut server, &mut [&mut client], 5);

    assert_eq!(server.combat.hits_on(target), 5);
    assert_eq!(server.authority.channel().retired_len(), 5);
    assert_eq!(client.observer.receiver().channel_count(), 5);

    tick_and_exchange_n(&mut server, &mut [&mut client], 12);

    assert_eq!(server.authority.channel().retired_len(), 0);
    assert_eq!(client.observer.receiver().channel_count(), 0);
}
