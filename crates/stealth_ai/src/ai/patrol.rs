//! PatrolRoute (read-only) + PatrolCursor (state агента).

use bevy::prelude::*;

use crate::config::AgentConfig;

/// Упорядоченные waypoints, возможно пустые
#[derive(Debug, Clone, PartialEq, Default, Reflect)]
pub struct PatrolRoute {
    pub waypoints: Vec<Vec3>,
    pub wait_duration: f32,
    /// "Дошёл" = дистанция строго меньше порога
    pub arrival_threshold: f32,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Vec3>, wait_duration: f32, arrival_threshold: f32) -> Self {
        Self {
            waypoints,
            wait_duration,
            arrival_threshold,
        }
    }

    pub fn from_config(waypoints: Vec<Vec3>, config: &AgentConfig) -> Self {
        Self::new(
            waypoints,
            config.wait_duration,
            config.patrol_arrival_threshold,
        )
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Что сделал cursor за тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatrolStep {
    /// Маршрут пуст
    Idle,
    /// Идём к waypoint (move request каждый тик)
    MoveTo(Vec3),
    /// Стоим у waypoint, копим dwell
    Dwelling { index: usize },
    /// Dwell истёк, переключились на следующий waypoint
    Advanced { from: usize, to: usize },
}

/// Позиция агента на маршруте
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct PatrolCursor {
    pub index: usize,
    pub dwell_elapsed: f32,
}

impl PatrolCursor {
    pub fn step(&mut self, route: &PatrolRoute, position: Vec3, delta: f32) -> PatrolStep {
        let count = route.waypoints.len();
        if count == 0 {
            return PatrolStep::Idle;
        }

        // Маршрут мог укоротиться
        if self.index >= count {
            self.index = count - 1;
        }

        let waypoint = route.waypoints[self.index];
        if position.distance(waypoint) >= route.arrival_threshold {
            return PatrolStep::MoveTo(waypoint);
        }

        self.dwell_elapsed += delta;
        if self.dwell_elapsed < route.wait_duration {
            return PatrolStep::Dwelling { index: self.index };
        }

        let from = self.index;
        self.index = (self.index + 1) % count;
        self.dwell_elapsed = 0.0;
        PatrolStep::Advanced { from, to: self.index }
    }
}
