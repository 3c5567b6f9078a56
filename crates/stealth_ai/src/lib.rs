//! StealthAI: perception-driven NPC core
//!
//! Patrol / Investigate / Chase FSM поверх vision cone + occlusion raycast.
//!
//! BOUNDARIES:
//! - Physics/spatial queries = внешний коллаборатор (`world::SpatialQuery`),
//!   в ECS хосте реализован поверх bevy_rapier3d
//! - Pathfinding = внешний коллаборатор (`navigation::Navigator`)
//! - Ядро = `StealthAgent::advance(delta, ctx)`, без engine base class
//!
//! Хосты: `StealthAiPlugin` (Bevy ECS, FixedUpdate 60Hz) и `sim::Simulation` (headless).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod config;
pub mod error;
pub mod logger;
pub mod navigation;
pub mod perception;
pub mod sim;
pub mod world;

// Re-export основных типов
pub use ai::{
    AIState, AgentEvent, HandlerOutcome, StateDisplay, StateLabel, StealthAgent, StealthAiPlugin,
    StealthEvent, TickContext, TickReport,
};
pub use config::{AgentConfig, PerceptionConfig};
pub use error::{Collaborator, ConfigError, GeometryError, SetupIssue};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use navigation::{MovementCommand, MovementSpeed, Navigator};
pub use perception::{EyeMount, PerceptionSensor, SensingOrigin, Sighting, VisionGizmo};
pub use sim::{run_patrol_scenario, KinematicNavigator, ScenarioSummary, Simulation};
pub use world::{
    EntityId, EntityRecord, Pursuable, RapierSpatialQuery, RapierWorld, RayHit, Shape, SimWorld,
    SpatialQuery,
};

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции (StealthAiPlugin уже добавлен).
///
/// TransformPlugin нужен rapier'у: colliders берут позицию из GlobalTransform.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, bevy::transform::TransformPlugin))
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)) // 60Hz FixedUpdate
        .add_plugins(StealthAiPlugin);

    app
}

/// Snapshot всех StealthAgent для сравнения детерминизма.
///
/// Сортировка по Entity index, формат: Debug (state, pose, target, таймеры).
pub fn agent_snapshot(world: &mut World) -> Vec<String> {
    let mut query = world.query::<(Entity, &StealthAgent)>();
    let mut agents: Vec<_> = query.iter(world).collect();

    agents.sort_by_key(|(entity, _)| entity.index());

    agents
        .into_iter()
        .map(|(entity, agent)| {
            format!(
                "{}: {:?} pos={:?} fwd={:?} target={:?} last_known={:?} investigate={:?} patrol={}/{:?}",
                entity.index(),
                agent.state(),
                agent.position,
                agent.forward,
                agent.target(),
                agent.last_known_position(),
                agent.investigate_elapsed(),
                agent.patrol_index(),
                agent.dwell_elapsed()
            )
        })
        .collect()
}
