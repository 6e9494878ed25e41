use std::time::Duration;

use tether_client::ObserverEvent;
use tether_server::{MountError, MountPhase};
use tether_shared::{MountDescriptor, PrefabKind, Vec3};
use tether_test::{
    assert_mount_phase, init_logging, tick_and_exchange, tick_and_exchange_n, TestClient,
    TestServer,
};

const HORSE: PrefabKind = PrefabKind(3);

fn horse() -> MountDescriptor {
    MountDescriptor::new(HORSE, 2.0).with_death_animation(Duration::from_secs(2))
}

fn death_events(events: &[ObserverEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, ObserverEvent::MountDeathStarted { .. }))
        .count()
}

fn detach_events(events: &[ObserverEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, ObserverEvent::MountDetached { .. }))
        .count()
}

#[test]
fn mount_dies_and_speed_is_restored_everywhere() {
    init_logging();

    let mut server = TestServer::new();
    let mut client = TestClient::new(1);
    client.connect(&mut server);
    let owner = server.world.spawn_player(Vec3::ZERO, 5.0);

    server
        .authority
        .on_item_consumed(&mut server.world, owner, &horse());
    tick_and_exchange(&mut server, &mut [&mut client]);

    assert_mount_phase!(server, owner, MountPhase::Mounted);
    assert_eq!(server.world.actor(&owner).map(|actor| actor.speed), Some(10.0));
    assert_eq!(client.observer.owner_speed(&owner), Some(10.0));
    let mount = client.observer.mount(&owner).unwrap().mount();
    assert_eq!(server.authority.mount(&owner).unwrap().mount(), Some(mount));

    // tick 1: the owner's health hits zero
    server.damage(owner, 100);
    assert_mount_phase!(server, owner, MountPhase::Dying);

    // the death animation spans 20 ticks, the last of which is tick 21
    tick_and_exchange_n(&mut server, &mut [&mut client], 20);
    assert_mount_phase!(server, owner, MountPhase::Dying);
    assert!(client.observer.mount(&owner).unwrap().is_dead());
    assert!(server.world.actor(&mount).is_some());

    tick_and_exchange(&mut server, &mut [&mut client]);
    assert_mount_phase!(server, owner, MountPhase::Unmounted);
    assert!(server.world.actor(&mount).is_none());
    assert_eq!(server.world.actor(&owner).map(|actor| actor.speed), Some(5.0));

    assert!(client.observer.mount(&owner).is_none());
    assert_eq!(client.observer.owner_speed(&owner), Some(5.0));
    assert_eq!(
        client.observer.take_events(),
        vec![
            ObserverEvent::MountAttached {
                owner,
                mount,
                prefab: HORSE,
            },
            ObserverEvent::MountDeathStarted {
                owner,
                mount,
                death_animation: Duration::from_secs(2),
            },
            ObserverEvent::MountDetached { owner, mount },
        ]
    );
}

#[test]
fn repeated_health_zero_starts_one_death() {
    init_logging();

    let mut server = TestServer::new();
    let mut client = TestClient::new(1);
    client.connect(&mut server);
    let owner = server.world.spawn_player(Vec3::ZERO, 5.0);
    server
        .authority
        .on_item_consumed(&mut server.world, owner, &horse());

    server.authority.on_health_zero(&server.clock, owner);
    assert_eq!(
        server.authority.try_on_health_zero(&server.clock, owner),
        Err(MountError::AlreadyDying { owner })
    );
    server.authority.on_health_zero(&server.clock, owner);

    tick_and_exchange_n(&mut server, &mut [&mut client], 30);

    let events = client.observer.take_events();
    assert_eq!(death_events(&events), 1);
    assert_eq!(detach_events(&events), 1);
    assert_eq!(server.world.count_prefab(HORSE), 0);
}

#[test]
fn death_takes_precedence_over_dismount() {
    init_logging();

    let mut server = TestServer::new();
    let mut client = TestClient::new(1);
    client.connect(&mut server);
    let owner = server.world.spawn_player(Vec3::ZERO, 5.0);
    let mount = server
        .authority
        .try_on_item_consumed(&mut server.world, owner, &horse())
        .unwrap();

    server.authority.on_health_zero(&server.clock, owner);
    assert_eq!(
        server
            .authority
            .try_on_dismount_requested(&mut server.world, owner),
        Err(MountError::DismountDeferred { owner })
    );
    // the mount is still there while it dies
    assert!(server.world.actor(&mount).is_some());
    assert!(server.authority.mount(&owner).unwrap().has_pending_dismount());

    tick_and_exchange_n(&mut server, &mut [&mut client], 25);

    assert_mount_phase!(server, owner, MountPhase::Unmounted);
    assert_eq!(
        server
            .world
            .destroyed()
            .iter()
            .filter(|entity| **entity == mount)
            .count(),
        1
    );
    assert_eq!(detach_events(&client.observer.take_events()), 1);
}

#[test]
fn dismount_while_mounted_is_immediate() {
    let mut server = TestServer::new();
    let mut client = TestClient::new(1);
    client.connect(&mut server);
    let owner = server.world.spawn_player(Vec3::ZERO, 5.0);
    server
        .authority
        .on_item_consumed(&mut server.world, owner, &horse());
    tick_and_exchange(&mut server, &mut [&mut client]);

    server
        .authority
        .on_dismount_requested(&mut server.world, owner);
    tick_and_exchange(&mut server, &mut [&mut client]);

    assert_mount_phase!(server, owner, MountPhase::Unmounted);
    assert!(client.observer.mount(&owner).is_none());
    assert_eq!(client.observer.owner_speed(&owner), Some(5.0));

    // and the owner can mount again
    server
        .authority
        .on_item_consumed(&mut server.world, owner, &horse());
    tick_and_exchange(&mut server, &mut [&mut client]);
    assert!(client.observer.mount(&owner).is_some());
    assert_eq!(client.observer.owner_speed(&owner), Some(10.0));
}

#[test]
fn stalled_tick_loop_leaves_mount_dying() {
    let mut server = TestServer::new();
    let owner = server.world.spawn_player(Vec3::ZERO, 5.0);
    server
        .authority
        .on_item_consumed(&mut server.world, owner, &horse());
    server.authority.on_health_zero(&server.clock, owner);

    // time passes but nothing steps
    server.clock.advance_by(1_000);
    assert_mount_phase!(server, owner, MountPhase::Dying);
    assert_eq!(server.world.count_prefab(HORSE), 1);

    server.step();
    assert_mount_phase!(server, owner, MountPhase::Unmounted);
    assert_eq!(server.world.count_prefab(HORSE), 0);
}

#[test]
fn mount_requests_are_validated() {
    let mut server = TestServer::new();
    let busy = server.world.spawn_player(Vec3::ZERO, 5.0);
    server.world.actor_mut(&busy).unwrap().busy = true;
    let novice = server.world.spawn_player(Vec3::ZERO, 5.0);
    let missing = server.world.spawn_player(Vec3::ZERO, 5.0);
    server.world.despawn(&missing);

    assert_eq!(
        server
            .authority
            .try_on_item_consumed(&mut server.world, busy, &horse()),
        Err(MountError::OwnerBusy { owner: busy })
    );
    assert_eq!(
        server
            .authority
            .try_on_item_consumed(&mut server.world, novice, &horse().with_required_level(10)),
        Err(MountError::RequirementsUnmet {
            owner: novice,
            required: 10,
            actual: 1,
        })
    );
    assert_eq!(
        server
            .authority
            .try_on_item_consumed(&mut server.world, missing, &horse()),
        Err(MountError::OwnerMissing { owner: missing })
    );
    assert_eq!(
        server
            .authority
            .try_on_health_zero(&server.clock, novice),
        Err(MountError::NotMounted { owner: novice })
    );

    assert_eq!(server.world.count_prefab(HORSE), 0);
    assert_eq!(server.world.actor(&busy).map(|actor| actor.speed), Some(5.0));
}

#[test]
fn late_observer_sees_dying_mount() {
    init_logging();

    let mut server = TestServer::new();
    let mut early = TestClient::new(1);
    early.connect(&mut server);
    let owner = server.world.spawn_player(Vec3::ZERO, 5.0);
    server
        .authority
        .on_item_consumed(&mut server.world, owner, &horse());
    tick_and_exchange_n(&mut server, &mut [&mut early], 3);
    server.damage(owner, 100);
    tick_and_exchange_n(&mut server, &mut [&mut early], 3);

    let mut late = TestClient::new(2);
    late.connect(&mut server);
    tick_and_exchange(&mut server, &mut [&mut early, &mut late]);

    let mirror = late.observer.mount(&owner).unwrap();
    assert!(mirror.is_dead());
    assert_eq!(Some(mirror.mount()), server.authority.mount(&owner).unwrap().mount());

    tick_and_exchange_n(&mut server, &mut [&mut early, &mut late], 20);
    assert!(late.observer.mount(&owner).is_none());
    assert_eq!(late.observer.owner_speed(&owner), Some(5.0));
    assert_eq!(early.observer.owner_speed(&owner), Some(5.0));
}

#[test]
fn owner_leaving_retires_the_stream() {
    let mut server = TestServer::new();
    let mut client = TestClient::new(1);
    client.connect(&mut server);
    let owner = server.world.spawn_player(Vec3::ZERO, 5.0);
    server
        .authority
        .on_item_consumed(&mut server.world, owner, &horse());
    tick_and_exchange(&mut server, &mut [&mut client]);
    client.observer.take_events();
    let mount = client.observer.mount(&owner).unwrap().mount();

    server.world.despawn(&owner);
    tick_and_exchange(&mut server, &mut [&mut client]);

    assert_mount_phase!(server, owner, MountPhase::Unmounted);
    assert_eq!(server.world.count_prefab(HORSE), 0);
    assert!(server.authority.channel().is_retired(&owner));

    // no dismount is ever published; the observer drops the mirror itself
    assert!(client.observer.mount(&owner).is_none());
    assert_eq!(client.observer.owner_speed(&owner), None);
    assert_eq!(
        client.observer.take_events(),
        vec![ObserverEvent::MountDetached { owner, mount }]
    );

    assert_eq!(
        server.authority.try_on_health_zero(&server.clock, owner),
        Err(MountError::NotMounted { owner })
    );
}
