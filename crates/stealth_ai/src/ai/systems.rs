//! ECS системы stealth AI (FixedUpdate, `.chain()`).
//!
//! Порядок:
//! 1. sync_agent_pose: Transform → StealthAgent pose (+ собственный body)
//! 2. report_new_agents: setup warnings один раз (Added<StealthAgent>)
//! 3. tick_stealth_agents: StealthAgent::advance через rapier queries + AgentEvent
//! 4. follow_movement_commands: headless kinematic движение к MovementCommand
//!
//! Rapier шагает в FixedPostUpdate: perception видит colliders с прошлого шага.

use bevy::prelude::*;

use crate::logger::log_warning;
use crate::navigation::{step_towards, MovementCommand, MovementSpeed, Navigator};
use crate::world::{EntityId, RapierWorld};

use super::agent::{StealthAgent, TickContext};
use super::display::{StateDisplay, StateLabel};
use super::events::AgentEvent;

/// Навигатор поверх ECS компонента: пишет только реальные изменения,
/// иначе Changed<MovementCommand> срабатывает каждый тик
impl Navigator for Mut<'_, MovementCommand> {
    fn set_destination(&mut self, point: Vec3) {
        self.set_if_neq(MovementCommand::MoveToPosition { target: point });
    }
}

impl StateDisplay for Mut<'_, StateLabel> {
    fn show(&mut self, label: &str) {
        if self.text != label {
            self.text = label.to_string();
        }
    }
}

/// Система: поза агента из Transform (forward = -Z local, как у Bevy).
///
/// Body агента = его entity: colliders всей его hierarchy не сканируются.
pub fn sync_agent_pose(mut agents: Query<(Entity, &Transform, &mut StealthAgent)>) {
    for (entity, transform, mut agent) in agents.iter_mut() {
        let forward = transform.forward().as_vec3();
        if agent.position != transform.translation || agent.forward != forward {
            agent.set_pose(transform.translation, forward);
        }

        let body = Some(EntityId::from(entity));
        if agent.body != body {
            agent.body = body;
        }
    }
}

/// Система: setup validation для только что добавленных агентов
pub fn report_new_agents(
    agents: Query<(&StealthAgent, Has<MovementCommand>, Has<StateLabel>), Added<StealthAgent>>,
) {
    for (agent, has_navigator, has_display) in agents.iter() {
        agent.report_setup(has_navigator, has_display);
    }
}

/// Система: один тик FSM на агента
pub fn tick_stealth_agents(
    mut agents: Query<(
        Entity,
        &mut StealthAgent,
        Option<&mut MovementCommand>,
        Option<&mut StateLabel>,
    )>,
    physics: RapierWorld,
    time: Res<Time<Fixed>>,
    mut events: EventWriter<AgentEvent>,
) {
    let Some(world) = physics.query() else {
        log_warning("⚠️ RapierContext not found, stealth agents skip this tick");
        return;
    };
    let delta = time.delta_secs();

    for (entity, mut agent, mut command, mut label) in agents.iter_mut() {
        let ctx = TickContext {
            world: &world,
            navigator: command.as_mut().map(|c| c as &mut dyn Navigator),
            display: label.as_mut().map(|l| l as &mut dyn StateDisplay),
        };

        let report = agent.advance(delta, ctx);
        for event in report.events() {
            events.write(AgentEvent {
                agent: entity,
                event,
            });
        }
    }
}

/// Система: прямолинейное движение к MovementCommand (без pathfinding).
///
/// Arrival → Idle. Поворот лицом к направлению движения.
pub fn follow_movement_commands(
    mut movers: Query<(&mut Transform, &mut MovementCommand, Option<&MovementSpeed>)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut command, speed) in movers.iter_mut() {
        let MovementCommand::MoveToPosition { target } = *command else {
            continue;
        };

        let speed = speed.copied().unwrap_or_default().speed;
        let from = transform.translation;
        let next = step_towards(from, target, speed * delta);

        let heading = Vec3::new(next.x - from.x, 0.0, next.z - from.z);
        if heading.length_squared() > f32::EPSILON {
            transform.look_to(heading, Vec3::Y);
        }
        transform.translation = next;

        if next == target {
            *command = MovementCommand::Idle;
        }
    }
}
