//! StealthAiPlugin integration test
//!
//! Headless Bevy App (MinimalPlugins, FixedUpdate 60Hz, manual time step):
//! - perception через rapier colliders (Collider + Pursuable)
//! - MovementCommand / StateLabel как ECS коллабораторы
//! - AgentEvent для внешних систем

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier3d::prelude::Collider;
use stealth_ai::ai::systems::tick_stealth_agents;
use stealth_ai::*;

/// Собирает события в resource (после тика FSM)
#[derive(Resource, Default)]
struct Collected(Vec<StealthEvent>);

fn collect_events(mut reader: EventReader<AgentEvent>, mut collected: ResMut<Collected>) {
    for event in reader.read() {
        collected.0.push(event.event);
    }
}

fn create_test_app() -> App {
    let mut app = create_headless_app(42);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )))
    .init_resource::<Collected>()
    .add_systems(FixedUpdate, collect_events.after(tick_stealth_agents));
    app
}

fn spawn_guard(app: &mut App, position: Vec3, with_navigation: bool) -> Entity {
    let agent = StealthAgent::new(
        "guard",
        AgentConfig::default(),
        vec![Vec3::new(0.0, 0.0, -10.0)],
    );

    let mut entity = app.world_mut().spawn((
        Transform::from_translation(position).looking_to(Vec3::Z, Vec3::Y),
        agent,
        StateLabel::default(),
        Collider::ball(0.5),
    ));
    if with_navigation {
        entity.insert((MovementCommand::Idle, MovementSpeed::default()));
    }
    entity.id()
}

fn spawn_intruder(app: &mut App, position: Vec3) -> (Entity, EntityId) {
    let entity = app
        .world_mut()
        .spawn((
            Transform::from_translation(position),
            Collider::ball(0.4),
            Pursuable,
        ))
        .id();
    (entity, EntityId::from(entity))
}

fn run(app: &mut App, updates: usize) {
    for _ in 0..updates {
        app.update();
    }
}

#[test]
fn test_plugin_spots_and_chases() {
    let mut app = create_test_app();
    let guard = spawn_guard(&mut app, Vec3::ZERO, true);
    let (_, intruder_body) = spawn_intruder(&mut app, Vec3::new(0.0, 0.0, 5.0));

    run(&mut app, 30);

    let agent = app.world().get::<StealthAgent>(guard).expect("agent");
    assert_eq!(agent.state(), AIState::Chase);
    assert_eq!(agent.target(), Some(intruder_body));
    assert_eq!(agent.body, Some(EntityId::from(guard)));

    let label = app.world().get::<StateLabel>(guard).expect("label");
    assert_eq!(label.text, "Chase");

    let command = app.world().get::<MovementCommand>(guard).expect("command");
    assert_eq!(
        *command,
        MovementCommand::MoveToPosition { target: Vec3::new(0.0, 0.0, 5.0) }
    );

    // Guard двигается к цели (follow_movement_commands)
    let transform = app.world().get::<Transform>(guard).expect("transform");
    assert!(transform.translation.z > 0.0);

    let collected = &app.world().resource::<Collected>().0;
    assert_eq!(
        collected
            .iter()
            .filter(|e| matches!(e, StealthEvent::TargetSpotted { .. }))
            .count(),
        1
    );
}

#[test]
fn test_plugin_catches_stationary_intruder() {
    let mut app = create_test_app();
    spawn_guard(&mut app, Vec3::ZERO, true);
    let (_, intruder_body) = spawn_intruder(&mut app, Vec3::new(0.0, 0.0, 5.0));

    // ~1.75s бега при 2 m/s до catch_distance
    run(&mut app, 240);

    let collected = &app.world().resource::<Collected>().0;
    assert!(collected.contains(&StealthEvent::TargetCaught { target: intruder_body }));
}

#[test]
fn test_plugin_without_navigation_still_senses() {
    let mut app = create_test_app();
    let guard = spawn_guard(&mut app, Vec3::ZERO, false);
    spawn_intruder(&mut app, Vec3::new(0.0, 0.0, 5.0));

    run(&mut app, 30);

    let agent = app.world().get::<StealthAgent>(guard).expect("agent");
    assert_eq!(agent.state(), AIState::Chase);
    assert_eq!(agent.position, Vec3::ZERO);
}

#[test]
fn test_colliders_follow_transforms() {
    let mut app = create_test_app();
    let guard = spawn_guard(&mut app, Vec3::ZERO, false);
    let (intruder, intruder_body) = spawn_intruder(&mut app, Vec3::new(0.0, 0.0, -5.0));

    // За спиной: не видим
    run(&mut app, 10);
    assert_eq!(
        app.world().get::<StealthAgent>(guard).map(|a| a.state()),
        Some(AIState::Patrol)
    );

    // Хост двигает intruder Transform → rapier collider следует → guard видит
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(intruder) {
        transform.translation = Vec3::new(1.0, 0.0, 6.0);
    }
    run(&mut app, 10);

    let agent = app.world().get::<StealthAgent>(guard).expect("agent");
    assert_eq!(agent.state(), AIState::Chase);
    assert_eq!(agent.target(), Some(intruder_body));
}

#[test]
fn test_wall_collider_blocks_sight() {
    let mut app = create_test_app();
    let guard = spawn_guard(&mut app, Vec3::ZERO, false);
    spawn_intruder(&mut app, Vec3::new(0.0, 0.0, 6.0));
    let wall = app
        .world_mut()
        .spawn((
            Transform::from_translation(Vec3::new(0.0, 0.0, 3.0)),
            Collider::cuboid(2.0, 1.5, 0.25),
        ))
        .id();

    run(&mut app, 20);
    assert_eq!(
        app.world().get::<StealthAgent>(guard).map(|a| a.state()),
        Some(AIState::Patrol)
    );

    assert!(app.world_mut().despawn(wall));
    run(&mut app, 10);
    assert_eq!(
        app.world().get::<StealthAgent>(guard).map(|a| a.state()),
        Some(AIState::Chase)
    );
}

#[test]
fn test_child_collider_resolves_to_pursuable_root() {
    let mut app = create_test_app();
    let guard = spawn_guard(&mut app, Vec3::ZERO, false);

    // Root без collider'а, hitbox дочерний
    let intruder = app
        .world_mut()
        .spawn((Transform::from_translation(Vec3::new(0.0, 0.0, 5.0)), Pursuable))
        .with_children(|parent| {
            parent.spawn((Transform::from_xyz(0.0, 0.2, 0.0), Collider::ball(0.4)));
        })
        .id();

    run(&mut app, 30);

    let agent = app.world().get::<StealthAgent>(guard).expect("agent");
    assert_eq!(agent.state(), AIState::Chase);
    assert_eq!(agent.target(), Some(EntityId::from(intruder)));
    assert_eq!(agent.last_known_position(), Some(Vec3::new(0.0, 0.0, 5.0)));
}

#[test]
fn test_agent_snapshot_is_sorted_and_stable() {
    let mut app = create_test_app();
    spawn_guard(&mut app, Vec3::ZERO, true);
    spawn_guard(&mut app, Vec3::new(20.0, 0.0, 0.0), true);

    run(&mut app, 20);

    let snapshot = agent_snapshot(app.world_mut());
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.iter().all(|line| line.contains("Patrol")));

    let indices: Vec<u32> = snapshot
        .iter()
        .filter_map(|line| line.split(':').next())
        .filter_map(|index| index.parse().ok())
        .collect();
    assert_eq!(indices.len(), 2);
    assert!(indices[0] < indices[1]);

    assert_eq!(snapshot, agent_snapshot(app.world_mut()));
}
