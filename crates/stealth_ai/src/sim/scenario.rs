//! Seeded сценарий: guard патрулирует квадрат, intruder бродит случайно,
//! посередине стена за которой можно спрятаться.
//!
//! Используется headless бинарником и determinism тестами.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{AIState, StealthAgent, StealthEvent};
use crate::config::AgentConfig;
use crate::logger::log_info;
use crate::navigation::{step_towards, MovementSpeed};
use crate::world::SimWorld;
use crate::DeterministicRng;

use super::{KinematicNavigator, Simulation};

/// Fixed timestep сценария (60Hz, как FixedUpdate)
pub const SCENARIO_DELTA: f32 = 1.0 / 60.0;

const ARENA_HALF_SIZE: f32 = 10.0;
const INTRUDER_SPEED: f32 = 1.5;
const INTRUDER_RETARGET_TICKS: u64 = 180;

/// Итоги прогона (PartialEq: для сравнения детерминизма)
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSummary {
    pub seed: u64,
    pub ticks: u64,
    pub spotted: u32,
    pub lost: u32,
    pub caught: u32,
    pub abandoned: u32,
    pub waypoints_reached: u32,
    pub final_state: AIState,
    /// Debug snapshot финального состояния (guard + intruder)
    pub snapshot: String,
}

fn random_point(rng: &mut DeterministicRng) -> Vec3 {
    Vec3::new(
        rng.rng.gen_range(-ARENA_HALF_SIZE..ARENA_HALF_SIZE),
        0.0,
        rng.rng.gen_range(-ARENA_HALF_SIZE..ARENA_HALF_SIZE),
    )
}

pub fn run_patrol_scenario(seed: u64, ticks: u64, config: AgentConfig) -> ScenarioSummary {
    let mut rng = DeterministicRng::new(seed);
    let mut world = SimWorld::new();

    // Стена поперёк арены (z = 0), intruder может спрятаться за ней
    world.spawn_box(Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 1.5, 0.25));

    let guard_start = Vec3::new(-8.0, 0.0, -8.0);
    let guard_body = world.spawn_sphere(guard_start, 0.5, false);
    let mut intruder_position = random_point(&mut rng);
    let intruder = world.spawn_sphere(intruder_position, 0.4, true);

    let route = vec![
        Vec3::new(-8.0, 0.0, -8.0),
        Vec3::new(8.0, 0.0, -8.0),
        Vec3::new(8.0, 0.0, 8.0),
        Vec3::new(-8.0, 0.0, 8.0),
    ];
    let guard = StealthAgent::new("guard", config, route)
        .with_pose(guard_start, Vec3::X)
        .with_body(guard_body);

    let mut sim = Simulation::new(world);
    let handle = sim.add_agent(
        guard,
        Some(KinematicNavigator::new(MovementSpeed::default().speed)),
        true,
    );

    let mut summary = ScenarioSummary {
        seed,
        ticks,
        spotted: 0,
        lost: 0,
        caught: 0,
        abandoned: 0,
        waypoints_reached: 0,
        final_state: AIState::Patrol,
        snapshot: String::new(),
    };

    let mut intruder_goal = random_point(&mut rng);

    for tick in 0..ticks {
        if tick % INTRUDER_RETARGET_TICKS == 0 {
            intruder_goal = random_point(&mut rng);
        }
        intruder_position = step_towards(
            intruder_position,
            intruder_goal,
            INTRUDER_SPEED * SCENARIO_DELTA,
        );
        sim.world.set_position(intruder, intruder_position);

        for (_, report) in sim.step(SCENARIO_DELTA) {
            for event in report.events() {
                match event {
                    StealthEvent::TargetSpotted { .. } => summary.spotted += 1,
                    StealthEvent::TargetLost { .. } => summary.lost += 1,
                    StealthEvent::SearchAbandoned => summary.abandoned += 1,
                    StealthEvent::WaypointAdvanced { .. } => summary.waypoints_reached += 1,
                    StealthEvent::TargetCaught { .. } => {
                        summary.caught += 1;
                        // Пойманный intruder телепортируется в случайную точку
                        intruder_position = random_point(&mut rng);
                        intruder_goal = random_point(&mut rng);
                        sim.world.set_position(intruder, intruder_position);
                        log_info(&format!(
                            "🔁 tick {}: intruder respawned at {:?}",
                            tick, intruder_position
                        ));
                    }
                }
            }
        }
    }

    if let Some(agent) = sim.agent(handle) {
        summary.final_state = agent.state();
        summary.snapshot = format!(
            "{:?} pos={:?} target={:?} last_known={:?} patrol={} | intruder={:?}",
            agent.state(),
            agent.position,
            agent.target(),
            agent.last_known_position(),
            agent.patrol_index(),
            intruder_position
        );
    }

    summary
}
