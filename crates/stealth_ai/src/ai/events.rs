//! Stealth AI события
//!
//! `StealthAgent::advance` возвращает TickReport → `TickReport::events()`.
//! ECS хост оборачивает их в `AgentEvent` (entity агента + событие).

use bevy::prelude::*;

use crate::world::EntityId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StealthEvent {
    /// Цель замечена (вход в Chase из другого состояния)
    TargetSpotted { target: EntityId, position: Vec3 },
    /// Цель потеряна, агент идёт к last known position
    TargetLost { last_known: Vec3 },
    /// Цель поймана (catch_distance)
    TargetCaught { target: EntityId },
    /// Investigate таймер истёк
    SearchAbandoned,
    /// Patrol: переключились на waypoint `index`
    WaypointAdvanced { index: usize },
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AgentEvent {
    pub agent: Entity,
    pub event: StealthEvent,
}
