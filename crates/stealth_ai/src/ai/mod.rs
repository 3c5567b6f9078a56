//! Stealth AI: Patrol / Investigate / Chase FSM
//!
//! Ядро (`StealthAgent::advance`) не зависит от ECS: хост передаёт
//! SpatialQuery, Navigator и StateDisplay через TickContext.
//! `StealthAiPlugin`: ECS хост поверх того же ядра.

use bevy::prelude::*;

pub mod agent;
pub mod display;
pub mod events;
pub mod investigate;
pub mod patrol;
pub mod state;
pub mod systems;

#[cfg(test)]
mod patrol_tests;
#[cfg(test)]
mod state_tests;

pub use agent::{StealthAgent, TickContext, TickReport};
pub use display::{StateDisplay, StateLabel};
pub use events::{AgentEvent, StealthEvent};
pub use investigate::{InvestigateStep, InvestigateTimer};
pub use patrol::{PatrolCursor, PatrolRoute, PatrolStep};
pub use state::{
    after_handler, after_perception, label_for_raw, transition, AIState, HandlerOutcome,
    UNKNOWN_STATE_LABEL,
};

use bevy_rapier3d::plugin::{NoUserData, RapierPhysicsPlugin};

use crate::navigation::{MovementCommand, MovementSpeed};
use crate::world::Pursuable;

/// Stealth AI Plugin
///
/// Регистрирует системы в FixedUpdate для детерминизма.
/// Perception идёт через rapier: хост спавнит `Collider` (+ `Pursuable` для целей).
/// Если RapierPhysicsPlugin ещё не добавлен, добавляет его в fixed schedule.
pub struct StealthAiPlugin;

impl Plugin for StealthAiPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<RapierPhysicsPlugin<NoUserData>>() {
            app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule());
        }

        app.add_event::<AgentEvent>()
            .register_type::<StealthAgent>()
            .register_type::<StateLabel>()
            .register_type::<MovementCommand>()
            .register_type::<MovementSpeed>()
            .register_type::<Pursuable>()
            .add_systems(
                FixedUpdate,
                (
                    systems::sync_agent_pose,
                    systems::report_new_agents,
                    systems::tick_stealth_agents,
                    systems::follow_movement_commands,
                )
                    .chain(), // Последовательное выполнение для детерминизма
            );
    }
}
