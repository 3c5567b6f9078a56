//! World boundary: entity registry handles + spatial query contract.
//!
//! Physics engine: внешний коллаборатор. Core видит мир только через
//! `SpatialQuery`: sphere overlap, raycast, lookup по stable handle.
//! "Жив ли target" = `entity(id).is_some()`, а не null-check на live object.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod rapier;
pub mod sim_world;

#[cfg(test)]
mod sim_world_tests;

pub use rapier::{Pursuable, RapierSpatialQuery, RapierWorld};
pub use sim_world::{Shape, SimWorld};

/// Stable handle в entity registry.
///
/// SimWorld: порядковый номер collider'а. Rapier: `Entity::to_bits()`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize,
)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Bevy Entity для handle из ECS мира (None для невалидных bits)
    pub fn to_entity(self) -> Option<Entity> {
        Entity::try_from_bits(self.0).ok()
    }
}

impl From<Entity> for EntityId {
    fn from(entity: Entity) -> Self {
        Self(entity.to_bits())
    }
}

/// Запись registry для collider'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityRecord {
    /// Reference point (центр collider'а)
    pub position: Vec3,
    /// Корень rigid hierarchy (для collider'а без родителя = он сам)
    pub root: EntityId,
    /// Capability flag: можно ли преследовать
    pub pursuable: bool,
}

/// Результат raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
    pub collider: EntityId,
    pub root: EntityId,
}

/// Spatial query коллаборатор (синхронный, same-thread)
pub trait SpatialQuery {
    /// Colliders, чей reference point лежит внутри сферы.
    /// Порядок перечисления определяет реализация.
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<EntityId>;

    /// Ближайшее попадание луча. `direction` нормализован.
    /// Colliders, внутри которых стоит origin, не считаются.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;

    /// Registry lookup (None = handle больше не валиден)
    fn entity(&self, id: EntityId) -> Option<EntityRecord>;
}
