//! InvestigateTimer: дойти до last known position и подождать.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvestigateStep {
    /// Ещё идём, отсчёт сброшен
    Travel(Vec3),
    /// На месте, отсчёт идёт
    Searching,
    /// Отсчёт истёк
    GaveUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct InvestigateTimer {
    pub elapsed: f32,
}

impl InvestigateTimer {
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Отсчёт копится только когда дистанция <= threshold
    pub fn step(
        &mut self,
        position: Vec3,
        spot: Vec3,
        arrival_threshold: f32,
        duration: f32,
        delta: f32,
    ) -> InvestigateStep {
        if position.distance(spot) > arrival_threshold {
            self.reset();
            return InvestigateStep::Travel(spot);
        }

        self.elapsed += delta;
        if self.elapsed >= duration {
            InvestigateStep::GaveUp
        } else {
            InvestigateStep::Searching
        }
    }
}
