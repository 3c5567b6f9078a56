//! MovementRequester: пересылает destination навигатору, не ждёт результата.

use bevy::prelude::*;

/// Внешний navigation коллаборатор (pathfinding, obstacle avoidance, arrival)
pub trait Navigator {
    /// Новый destination заменяет предыдущий
    fn set_destination(&mut self, point: Vec3);
}

/// Обёртка на один тик.
///
/// Без навигатора `request_move`: no-op (предупреждение логируется один раз
/// при создании агента, не здесь).
pub struct MovementRequester<'a> {
    navigator: Option<&'a mut dyn Navigator>,
    issued: Option<Vec3>,
}

impl<'a> MovementRequester<'a> {
    pub fn new(navigator: Option<&'a mut dyn Navigator>) -> Self {
        Self {
            navigator,
            issued: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.navigator.is_some()
    }

    pub fn request_move(&mut self, destination: Vec3) {
        if let Some(navigator) = self.navigator.as_mut() {
            navigator.set_destination(destination);
            self.issued = Some(destination);
        }
    }

    /// Последний destination, реально отправленный в этом тике
    pub fn issued(&self) -> Option<Vec3> {
        self.issued
    }
}

/// Прямолинейный шаг к цели не дальше `max_step` (без overshoot)
pub fn step_towards(from: Vec3, to: Vec3, max_step: f32) -> Vec3 {
    let offset = to - from;
    let distance = offset.length();
    if distance <= max_step || distance < f32::EPSILON {
        to
    } else {
        from + offset / distance * max_step
    }
}
