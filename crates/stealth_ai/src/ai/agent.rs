//! StealthAgent: perception-driven FSM одного NPC.
//!
//! Тик (`advance`):
//! 1. Display label ← состояние ДО perception
//! 2. PerceptionSensor::scan → sighting форсит Chase, перезаписывает target/last known
//! 3. Handler post-perception состояния (не более одного move request)
//! 4. `after_handler` применяет outcome
//!
//! Агент: обычная структура без engine base class. ECS хост держит его как
//! Component (см. `ai::systems`), headless `Simulation` держит в Vec.

use bevy::prelude::*;

use crate::config::AgentConfig;
use crate::error::{Collaborator, SetupIssue};
use crate::logger::{log, log_info, log_warning};
use crate::navigation::{MovementRequester, Navigator};
use crate::perception::{EyeMount, PerceptionSensor, SensingOrigin, Sighting, VisionGizmo};
use crate::world::{EntityId, SpatialQuery};

use super::display::StateDisplay;
use super::events::StealthEvent;
use super::investigate::{InvestigateStep, InvestigateTimer};
use super::patrol::{PatrolCursor, PatrolRoute, PatrolStep};
use super::state::{after_handler, after_perception, AIState, HandlerOutcome};

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct StealthAgent {
    pub name: String,
    /// Собственный collider в world registry (исключается из perception)
    pub body: Option<EntityId>,
    pub position: Vec3,
    pub forward: Vec3,
    /// Крепление "глаза" к телу: None = perception отключён
    pub eye: Option<EyeMount>,
    pub config: AgentConfig,
    pub route: PatrolRoute,

    state: AIState,
    target: Option<EntityId>,
    last_known_position: Option<Vec3>,
    investigate: InvestigateTimer,
    patrol: PatrolCursor,
}

impl Default for StealthAgent {
    fn default() -> Self {
        Self::new("agent", AgentConfig::default(), Vec::new())
    }
}

/// Внешние коллабораторы на один тик
pub struct TickContext<'a> {
    pub world: &'a dyn SpatialQuery,
    pub navigator: Option<&'a mut dyn Navigator>,
    pub display: Option<&'a mut dyn StateDisplay>,
}

impl<'a> TickContext<'a> {
    pub fn new(world: &'a dyn SpatialQuery) -> Self {
        Self {
            world,
            navigator: None,
            display: None,
        }
    }

    pub fn with_navigator(mut self, navigator: &'a mut dyn Navigator) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn with_display(mut self, display: &'a mut dyn StateDisplay) -> Self {
        self.display = Some(display);
        self
    }
}

/// Итог тика (хост может игнорировать)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub previous: AIState,
    pub state: AIState,
    pub sighting: Option<Sighting>,
    pub outcome: HandlerOutcome,
    /// Destination, реально отправленный навигатору
    pub destination: Option<Vec3>,
    pub waypoint_advanced: Option<usize>,
}

impl TickReport {
    pub fn events(&self) -> Vec<StealthEvent> {
        let mut events = Vec::new();

        if let Some(sighting) = self.sighting {
            if self.previous != AIState::Chase {
                events.push(StealthEvent::TargetSpotted {
                    target: sighting.target,
                    position: sighting.position,
                });
            }
        }

        match self.outcome {
            HandlerOutcome::SightLost { last_known } => {
                events.push(StealthEvent::TargetLost { last_known })
            }
            HandlerOutcome::Caught { target } => events.push(StealthEvent::TargetCaught { target }),
            HandlerOutcome::GaveUp => events.push(StealthEvent::SearchAbandoned),
            _ => {}
        }

        if let Some(index) = self.waypoint_advanced {
            events.push(StealthEvent::WaypointAdvanced { index });
        }

        events
    }
}

impl StealthAgent {
    /// Агент в начале координат, смотрит в +Z, глаз совпадает с позицией
    pub fn new(name: impl Into<String>, config: AgentConfig, waypoints: Vec<Vec3>) -> Self {
        let route = PatrolRoute::from_config(waypoints, &config);
        Self {
            name: name.into(),
            body: None,
            position: Vec3::ZERO,
            forward: Vec3::Z,
            eye: Some(EyeMount::default()),
            config,
            route,
            state: AIState::Patrol,
            target: None,
            last_known_position: None,
            investigate: InvestigateTimer::default(),
            patrol: PatrolCursor::default(),
        }
    }

    pub fn with_body(mut self, body: EntityId) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_pose(mut self, position: Vec3, forward: Vec3) -> Self {
        self.set_pose(position, forward);
        self
    }

    /// Глаз смещён относительно позиции агента (например на высоту головы).
    /// Offset в мировых осях для текущей позы, дальше поворачивается вместе с телом.
    pub fn with_eye_offset(mut self, offset: Vec3) -> Self {
        self.eye = Some(EyeMount::with_world_offset(offset, self.forward));
        self
    }

    pub fn without_eye(mut self) -> Self {
        self.eye = None;
        self
    }

    /// Двигает тело; глаз (offset + поворот головы) следует за ним
    pub fn set_pose(&mut self, position: Vec3, forward: Vec3) {
        self.position = position;
        self.forward = forward;
    }

    /// Независимая поза глаза (голова повёрнута отдельно от тела).
    /// Сохраняется относительно тела и переживает следующие `set_pose`.
    pub fn set_eye_pose(&mut self, eye: SensingOrigin) {
        self.eye = Some(EyeMount::from_world(eye, self.position, self.forward));
    }

    /// Мировая поза глаза для текущей позы тела
    pub fn eye(&self) -> Option<SensingOrigin> {
        self.eye.map(|mount| mount.world_pose(self.position, self.forward))
    }

    pub fn state(&self) -> AIState {
        self.state
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn last_known_position(&self) -> Option<Vec3> {
        self.last_known_position
    }

    pub fn investigate_elapsed(&self) -> f32 {
        self.investigate.elapsed
    }

    pub fn patrol_index(&self) -> usize {
        self.patrol.index
    }

    pub fn dwell_elapsed(&self) -> f32 {
        self.patrol.dwell_elapsed
    }

    pub fn sensor(&self) -> PerceptionSensor {
        PerceptionSensor::new(self.config.perception)
    }

    /// Данные для debug overlay (None без глаза)
    pub fn vision_gizmo(&self) -> Option<VisionGizmo> {
        self.eye().map(|eye| self.sensor().gizmo(&eye))
    }

    pub fn setup_issues(&self, has_navigator: bool, has_display: bool) -> Vec<SetupIssue> {
        let mut issues = Vec::new();
        if !has_navigator {
            issues.push(SetupIssue::MissingCollaborator(Collaborator::Navigation));
        }
        if self.eye.is_none() {
            issues.push(SetupIssue::MissingCollaborator(Collaborator::SensingOrigin));
        }
        if !has_display {
            issues.push(SetupIssue::MissingCollaborator(Collaborator::Display));
        }
        if self.route.is_empty() {
            issues.push(SetupIssue::EmptyRoute);
        }
        issues
    }

    /// Логирует setup проблемы. Вызывается хостом один раз при создании агента.
    pub fn report_setup(&self, has_navigator: bool, has_display: bool) -> Vec<SetupIssue> {
        let issues = self.setup_issues(has_navigator, has_display);
        for issue in &issues {
            log_warning(&format!("⚠️ {}: {}", self.name, issue));
        }
        issues
    }

    pub fn advance(&mut self, delta: f32, ctx: TickContext<'_>) -> TickReport {
        let TickContext {
            world,
            navigator,
            display,
        } = ctx;

        let previous = self.state;
        if let Some(display) = display {
            display.show(previous.label());
        }

        let sighting = self
            .eye()
            .and_then(|eye| self.sensor().scan(&eye, self.body, world));

        if let Some(seen) = sighting {
            self.target = Some(seen.target);
            self.last_known_position = Some(seen.position);
        }

        self.state = after_perception(previous, sighting.is_some());
        if let (Some(seen), AIState::Patrol | AIState::Investigate) = (sighting, previous) {
            log(&format!(
                "👁️ {}: {} → Chase (spotted {:?} at {:?})",
                self.name,
                previous.label(),
                seen.target,
                seen.position
            ));
        }

        let mut mover = MovementRequester::new(navigator);
        let mut waypoint_advanced = None;

        let outcome = match self.state {
            AIState::Patrol => {
                waypoint_advanced = self.run_patrol(delta, &mut mover);
                HandlerOutcome::Stay
            }
            AIState::Investigate => self.run_investigate(delta, &mut mover),
            AIState::Chase => self.run_chase(world, &mut mover),
        };

        let handled = self.state;
        self.state = after_handler(handled, outcome);
        if handled != self.state {
            log(&format!(
                "🔄 {}: {} → {} ({:?})",
                self.name,
                handled.label(),
                self.state.label(),
                outcome
            ));
        }

        TickReport {
            previous,
            state: self.state,
            sighting,
            outcome,
            destination: mover.issued(),
            waypoint_advanced,
        }
    }

    /// Patrol без навигатора или маршрута: полный no-op (dwell не копится)
    fn run_patrol(&mut self, delta: f32, mover: &mut MovementRequester<'_>) -> Option<usize> {
        if !mover.is_available() {
            return None;
        }

        match self.patrol.step(&self.route, self.position, delta) {
            PatrolStep::Idle | PatrolStep::Dwelling { .. } => None,
            PatrolStep::MoveTo(waypoint) => {
                mover.request_move(waypoint);
                None
            }
            PatrolStep::Advanced { from, to } => {
                log(&format!("🚩 {}: waypoint {} → {}", self.name, from, to));
                Some(to)
            }
        }
    }

    fn run_investigate(&mut self, delta: f32, mover: &mut MovementRequester<'_>) -> HandlerOutcome {
        let Some(spot) = self.last_known_position else {
            return HandlerOutcome::NothingToInvestigate;
        };

        let step = self.investigate.step(
            self.position,
            spot,
            self.config.investigate_arrival_threshold,
            self.config.investigate_duration,
            delta,
        );

        match step {
            InvestigateStep::Travel(destination) => {
                mover.request_move(destination);
                HandlerOutcome::Stay
            }
            InvestigateStep::Searching => HandlerOutcome::Stay,
            InvestigateStep::GaveUp => {
                self.last_known_position = None;
                self.target = None;
                log_info(&format!("🤷 {}: gave up searching at {:?}", self.name, spot));
                HandlerOutcome::GaveUp
            }
        }
    }

    fn run_chase(
        &mut self,
        world: &dyn SpatialQuery,
        mover: &mut MovementRequester<'_>,
    ) -> HandlerOutcome {
        let Some(target) = self.target else {
            return HandlerOutcome::TargetGone;
        };

        let sensor = self.sensor();
        let visible = self
            .eye()
            .and_then(|eye| sensor.line_of_sight(&eye, target, world))
            .filter(|seen| seen.record.pursuable);
        let target_position = world.entity(target).map(|record| record.position);

        if let (Some(_), Some(position)) = (visible, target_position) {
            self.last_known_position = Some(position);
            mover.request_move(position);

            // Поймал: Patrol даже если цель всё ещё видна
            if self.position.distance(position) <= self.config.catch_distance {
                self.target = None;
                self.last_known_position = None;
                log_info(&format!("🎯 {}: caught {:?}", self.name, target));
                return HandlerOutcome::Caught { target };
            }
            return HandlerOutcome::Stay;
        }

        match self.last_known_position {
            Some(last_known) => {
                self.investigate.reset();
                mover.request_move(last_known);
                HandlerOutcome::SightLost { last_known }
            }
            None => {
                self.target = None;
                HandlerOutcome::TargetGone
            }
        }
    }
}
