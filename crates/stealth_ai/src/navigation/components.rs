//! Movement компоненты для ECS хоста

use bevy::prelude::*;

use super::requester::Navigator;

/// Команда движения актора (исполняется внешней навигацией)
///
/// Архитектура:
/// - StealthAgent пишет MovementCommand через Navigator trait
/// - Навигация хоста читает и строит путь
/// - В headless режиме `follow_movement_commands` двигает Transform напрямую
#[derive(Component, Debug, Clone, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum MovementCommand {
    /// Стоять на месте
    #[default]
    Idle,
    /// Двигаться к позиции (world coordinates)
    MoveToPosition { target: Vec3 },
}

impl Navigator for MovementCommand {
    fn set_destination(&mut self, point: Vec3) {
        *self = MovementCommand::MoveToPosition { target: point };
    }
}

/// Скорость движения актора (метры/сек)
#[derive(Component, Clone, Copy, Debug, Reflect)]
#[reflect(Component)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 2.0 } // 2 m/s: базовая скорость ходьбы
    }
}
