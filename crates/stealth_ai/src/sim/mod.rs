//! Headless Simulation: планировщик без ECS.
//!
//! Владеет SimWorld и агентами, на каждый `step(delta)`:
//! 1. `StealthAgent::advance` для каждого агента (в порядке добавления)
//! 2. KinematicNavigator двигает агента по прямой к последнему destination
//! 3. Позиция body агента синхронизируется в SimWorld

use bevy::prelude::*;

use crate::ai::{StateDisplay, StateLabel, StealthAgent, TickContext, TickReport};
use crate::navigation::{step_towards, MovementSpeed, Navigator};
use crate::world::SimWorld;

pub mod scenario;


pub use scenario::{run_patrol_scenario, ScenarioSummary};

/// Прямолинейный навигатор: без pathfinding, без obstacle avoidance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicNavigator {
    pub destination: Option<Vec3>,
    pub speed: f32,
}

impl KinematicNavigator {
    pub fn new(speed: f32) -> Self {
        Self {
            destination: None,
            speed,
        }
    }

    /// Следующая позиция (None = стоим). Arrival сбрасывает destination.
    pub fn advance(&mut self, from: Vec3, delta: f32) -> Option<Vec3> {
        let target = self.destination?;
        let next = step_towards(from, target, self.speed * delta);
        if next == target {
            self.destination = None;
        }
        Some(next)
    }
}

impl Default for KinematicNavigator {
    fn default() -> Self {
        Self::new(MovementSpeed::default().speed)
    }
}

impl Navigator for KinematicNavigator {
    fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentHandle(pub usize);

#[derive(Debug, Clone)]
struct AgentSlot {
    agent: StealthAgent,
    navigator: Option<KinematicNavigator>,
    label: Option<StateLabel>,
}

#[derive(Debug, Clone, Default)]
pub struct Simulation {
    pub world: SimWorld,
    slots: Vec<AgentSlot>,
    tick: u64,
}

impl Simulation {
    pub fn new(world: SimWorld) -> Self {
        Self {
            world,
            slots: Vec::new(),
            tick: 0,
        }
    }

    /// Добавляет агента; setup проблемы логируются здесь, один раз
    pub fn add_agent(
        &mut self,
        agent: StealthAgent,
        navigator: Option<KinematicNavigator>,
        with_label: bool,
    ) -> AgentHandle {
        agent.report_setup(navigator.is_some(), with_label);

        self.slots.push(AgentSlot {
            agent,
            navigator,
            label: with_label.then(StateLabel::default),
        });
        AgentHandle(self.slots.len() - 1)
    }

    pub fn agent(&self, handle: AgentHandle) -> Option<&StealthAgent> {
        self.slots.get(handle.0).map(|slot| &slot.agent)
    }

    pub fn label(&self, handle: AgentHandle) -> Option<&str> {
        self.slots
            .get(handle.0)
            .and_then(|slot| slot.label.as_ref())
            .map(|label| label.text.as_str())
    }

    pub fn navigator(&self, handle: AgentHandle) -> Option<&KinematicNavigator> {
        self.slots.get(handle.0).and_then(|slot| slot.navigator.as_ref())
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn step(&mut self, delta: f32) -> Vec<(AgentHandle, TickReport)> {
        let mut reports = Vec::with_capacity(self.slots.len());

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let ctx = TickContext {
                world: &self.world,
                navigator: slot.navigator.as_mut().map(|n| n as &mut dyn Navigator),
                display: slot.label.as_mut().map(|l| l as &mut dyn StateDisplay),
            };
            let report = slot.agent.advance(delta, ctx);

            if let Some(navigator) = slot.navigator.as_mut() {
                let from = slot.agent.position;
                if let Some(next) = navigator.advance(from, delta) {
                    let heading = Vec3::new(next.x - from.x, 0.0, next.z - from.z);
                    let forward = heading.try_normalize().unwrap_or(slot.agent.forward);
                    slot.agent.set_pose(next, forward);

                    if let Some(body) = slot.agent.body {
                        self.world.set_position(body, next);
                    }
                }
            }

            reports.push((AgentHandle(index), report));
        }

        self.tick += 1;
        reports
    }
}
