//! PerceptionSensor: FOV cone + occlusion raycast.
//!
//! Порядок проверок для каждого кандидата из overlap:
//! 1. Угол между forward глаза и направлением на кандидата < view_angle / 2 (граница исключена).
//!    Угол считается через atan2(|cross|, dot): точен на границе, в отличие от acos.
//! 2. Raycast от глаза к кандидату (max = view_distance), нулевое направление отбрасывается
//! 3. Попадание в ту же rigid hierarchy (root) + повторная проверка угла
//! 4. Pursuable capability
//!
//! Первый кандидат (в порядке перечисления overlap), прошедший всё: победитель.

use bevy::prelude::*;

use crate::config::PerceptionConfig;
use crate::error::GeometryError;
use crate::world::{EntityId, EntityRecord, SpatialQuery};

/// Мировая поза "глаза"
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SensingOrigin {
    pub position: Vec3,
    pub forward: Vec3,
}

impl SensingOrigin {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }

    /// Yaw (градусы) в XZ плоскости: 0 = +Z, 90 = +X
    pub fn yaw_degrees(&self) -> f32 {
        self.forward.x.atan2(self.forward.z).to_degrees()
    }
}

/// Поворот тела: локальный -Z смотрит в `forward`, +Y вверх (как `Transform::looking_to`)
pub fn body_rotation(forward: Vec3) -> Quat {
    Transform::IDENTITY.looking_to(forward, Vec3::Y).rotation
}

/// Крепление глаза к телу: offset и поворот головы в локальных осях тела.
///
/// Мировая поза выводится из позы тела, так что глаз поворачивается вместе с ним.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct EyeMount {
    pub offset: Vec3,
    pub rotation: Quat,
}

impl Default for EyeMount {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl EyeMount {
    /// Голова смотрит прямо, offset задан в мировых осях для позы тела `forward`
    pub fn with_world_offset(offset: Vec3, forward: Vec3) -> Self {
        Self {
            offset: body_rotation(forward).inverse() * offset,
            rotation: Quat::IDENTITY,
        }
    }

    /// Крепление, при котором тело (position, forward) даёт мировую позу `eye`
    pub fn from_world(eye: SensingOrigin, position: Vec3, forward: Vec3) -> Self {
        let inverse = body_rotation(forward).inverse();
        Self {
            offset: inverse * (eye.position - position),
            rotation: inverse * body_rotation(eye.forward),
        }
    }

    pub fn world_pose(&self, position: Vec3, forward: Vec3) -> SensingOrigin {
        let body = body_rotation(forward);
        // Голова прямо: forward тела без лишнего округления
        let eye_forward = if self.rotation == Quat::IDENTITY {
            forward
        } else {
            body * self.rotation * Vec3::NEG_Z
        };
        SensingOrigin::new(position + body * self.offset, eye_forward)
    }
}

/// Принятый результат perception (transient, не хранится)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    /// Root hierarchy замеченного collider'а
    pub target: EntityId,
    /// Collider, в который попал луч
    pub collider: EntityId,
    /// Snapshot позиции на момент наблюдения
    pub position: Vec3,
}

/// Подтверждённая прямая видимость (результат `line_of_sight`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOfSight {
    pub collider: EntityId,
    pub record: EntityRecord,
}

/// Данные для внешнего debug overlay (sensor сам ничего не рисует)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisionGizmo {
    pub origin: Vec3,
    pub forward: Vec3,
    pub view_distance: f32,
    pub hearing_distance: f32,
    /// Левая граница конуса * view_distance (XZ плоскость)
    pub left_boundary: Vec3,
    /// Правая граница конуса * view_distance (XZ плоскость)
    pub right_boundary: Vec3,
}

/// Нормализованное направление от глаза к точке
pub fn direction_to(eye: &SensingOrigin, point: Vec3) -> Result<Vec3, GeometryError> {
    let offset = point - eye.position;
    if offset.length_squared() < f32::EPSILON {
        return Err(GeometryError::DegenerateDirection);
    }
    Ok(offset.normalize())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceptionSensor {
    config: PerceptionConfig,
}

impl PerceptionSensor {
    pub fn new(config: PerceptionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PerceptionConfig {
        &self.config
    }

    /// Строго внутри конуса (угол == view_angle / 2 отбрасывается)
    pub fn in_view_cone(&self, eye: &SensingOrigin, point: Vec3) -> bool {
        // Точка в самом глазу или нулевой forward: не видим
        if direction_to(eye, point).is_err() || eye.forward.length_squared() < f32::EPSILON {
            return false;
        }

        // NaN forward → сравнение false → не видим
        let offset = point - eye.position;
        let angle = eye
            .forward
            .cross(offset)
            .length()
            .atan2(eye.forward.dot(offset))
            .to_degrees();
        angle < self.config.view_angle_degrees * 0.5
    }

    /// Широкий скан: первый видимый pursuable кандидат.
    ///
    /// `observer`: собственный collider агента (любой в hierarchy);
    /// вся его hierarchy (по root) не сканируется.
    pub fn scan(
        &self,
        eye: &SensingOrigin,
        observer: Option<EntityId>,
        world: &dyn SpatialQuery,
    ) -> Option<Sighting> {
        let observer = observer.map(|body| world.entity(body).map_or(body, |record| record.root));

        for candidate in world.overlap_sphere(eye.position, self.config.view_distance) {
            let Some(record) = world.entity(candidate) else {
                continue;
            };

            if Some(record.root) == observer {
                continue;
            }

            if !self.in_view_cone(eye, record.position) {
                continue;
            }

            let Some(seen) = self.line_of_sight(eye, candidate, world) else {
                continue;
            };

            if seen.record.pursuable {
                return Some(Sighting {
                    target: seen.record.root,
                    collider: seen.collider,
                    position: seen.record.position,
                });
            }
        }

        None
    }

    /// Целевая проверка видимости конкретного collider'а/root'а.
    ///
    /// Возвращает collider, в который попал луч, если он из той же hierarchy
    /// и кандидат всё ещё внутри конуса.
    pub fn line_of_sight(
        &self,
        eye: &SensingOrigin,
        candidate: EntityId,
        world: &dyn SpatialQuery,
    ) -> Option<LineOfSight> {
        let record = world.entity(candidate)?;
        let direction = direction_to(eye, record.position).ok()?;

        let hit = world.raycast(eye.position, direction, self.config.view_distance)?;
        if hit.root != record.root {
            return None;
        }

        // Вторая проверка угла: по точной позиции кандидата
        if !self.in_view_cone(eye, record.position) {
            return None;
        }

        let hit_record = world.entity(hit.collider)?;
        Some(LineOfSight {
            collider: hit.collider,
            record: hit_record,
        })
    }

    pub fn gizmo(&self, eye: &SensingOrigin) -> VisionGizmo {
        let yaw = eye.yaw_degrees();
        let half = self.config.view_angle_degrees * 0.5;

        VisionGizmo {
            origin: eye.position,
            forward: eye.forward,
            view_distance: self.config.view_distance,
            hearing_distance: self.config.hearing_distance,
            left_boundary: direction_from_yaw(yaw - half) * self.config.view_distance,
            right_boundary: direction_from_yaw(yaw + half) * self.config.view_distance,
        }
    }
}

fn direction_from_yaw(yaw_degrees: f32) -> Vec3 {
    let radians = yaw_degrees.to_radians();
    Vec3::new(radians.sin(), 0.0, radians.cos())
}
