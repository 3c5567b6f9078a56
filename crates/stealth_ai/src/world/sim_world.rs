//! SimWorld: in-memory registry colliders для headless симуляции и тестов.
//!
//! ECS хост работает через rapier (`world::rapier`), SimWorld нужен там,
//! где Bevy App не поднимается: `sim::Simulation`, бинарник, unit тесты.
//!
//! Формы: сферы (акторы) и AABB (стены/препятствия).
//! Overlap перечисляет colliders в порядке регистрации (детерминизм).

use bevy::prelude::*;

use super::{EntityId, EntityRecord, RayHit, SpatialQuery};

/// Геометрия collider'а (центр = position записи)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    /// Axis-aligned box
    Box { half_extents: Vec3 },
}

#[derive(Debug, Clone, Copy)]
struct Body {
    position: Vec3,
    shape: Shape,
    root: EntityId,
    pursuable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SimWorld {
    // index = EntityId.0, None = despawned (handle не переиспользуется)
    bodies: Vec<Option<Body>>,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Регистрирует корневой collider (root = он сам)
    pub fn spawn(&mut self, position: Vec3, shape: Shape, pursuable: bool) -> EntityId {
        let id = EntityId(self.bodies.len() as u64);
        self.bodies.push(Some(Body {
            position,
            shape,
            root: id,
            pursuable,
        }));
        id
    }

    pub fn spawn_sphere(&mut self, position: Vec3, radius: f32, pursuable: bool) -> EntityId {
        self.spawn(position, Shape::Sphere { radius }, pursuable)
    }

    /// Препятствие (стена): никогда не pursuable
    pub fn spawn_box(&mut self, center: Vec3, half_extents: Vec3) -> EntityId {
        self.spawn(center, Shape::Box { half_extents }, false)
    }

    /// Дочерний collider в hierarchy `parent` (root наследуется)
    pub fn attach(
        &mut self,
        parent: EntityId,
        position: Vec3,
        shape: Shape,
        pursuable: bool,
    ) -> Option<EntityId> {
        let root = self.body(parent)?.root;
        let id = EntityId(self.bodies.len() as u64);
        self.bodies.push(Some(Body {
            position,
            shape,
            root,
            pursuable,
        }));
        Some(id)
    }

    /// Двигает collider. Для root двигается вся hierarchy (rigid).
    pub fn set_position(&mut self, id: EntityId, position: Vec3) -> bool {
        let Some(body) = self.body(id) else {
            return false;
        };

        if body.root != id {
            if let Some(Some(child)) = self.bodies.get_mut(id.0 as usize) {
                child.position = position;
            }
            return true;
        }

        let delta = position - body.position;
        for (index, slot) in self.bodies.iter_mut().enumerate() {
            let Some(member) = slot else {
                continue;
            };
            if index == id.0 as usize {
                member.position = position;
            } else if member.root == id {
                member.position += delta;
            }
        }
        true
    }

    /// Удаляет collider (для root: вместе с детьми)
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let Some(body) = self.body(id) else {
            return false;
        };

        if body.root == id {
            for slot in self.bodies.iter_mut() {
                if matches!(slot, Some(b) if b.root == id) {
                    *slot = None;
                }
            }
        } else if let Some(slot) = self.bodies.get_mut(id.0 as usize) {
            *slot = None;
        }
        true
    }

    pub fn position(&self, id: EntityId) -> Option<Vec3> {
        self.body(id).map(|b| b.position)
    }

    /// Количество живых colliders
    pub fn len(&self) -> usize {
        self.bodies.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn body(&self, id: EntityId) -> Option<Body> {
        self.bodies.get(id.0 as usize).copied().flatten()
    }

    fn live_bodies(&self) -> impl Iterator<Item = (EntityId, Body)> + '_ {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|body| (EntityId(index as u64), body)))
    }
}

impl SpatialQuery for SimWorld {
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<EntityId> {
        self.live_bodies()
            .filter(|(_, body)| body.position.distance(center) <= radius)
            .map(|(id, _)| id)
            .collect()
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let mut nearest: Option<(EntityId, Body, f32)> = None;

        for (id, body) in self.live_bodies() {
            let entry = match body.shape {
                Shape::Sphere { radius } => ray_sphere(origin, direction, body.position, radius),
                Shape::Box { half_extents } => ray_box(
                    origin,
                    direction,
                    body.position - half_extents,
                    body.position + half_extents,
                ),
            };

            let Some(distance) = entry else {
                continue;
            };
            if distance > max_distance {
                continue;
            }

            match nearest {
                Some((_, _, best)) if best <= distance => {}
                _ => nearest = Some((id, body, distance)),
            }
        }

        nearest.map(|(collider, body, distance)| RayHit {
            point: origin + direction * distance,
            distance,
            collider,
            root: body.root,
        })
    }

    fn entity(&self, id: EntityId) -> Option<EntityRecord> {
        self.body(id).map(|body| EntityRecord {
            position: body.position,
            root: body.root,
            pursuable: body.pursuable,
        })
    }
}

/// Дистанция входа луча в сферу. Origin внутри сферы → None.
fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let offset = origin - center;
    let c = offset.length_squared() - radius * radius;
    if c <= 0.0 {
        return None;
    }

    let b = offset.dot(direction);
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = -b - discriminant.sqrt();
    (t >= 0.0).then_some(t)
}

/// Slab test для AABB. Origin внутри box → None.
fn ray_box(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let origin = origin.to_array();
    let direction = direction.to_array();
    let min = min.to_array();
    let max = max.to_array();

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];

        if d.abs() < f32::EPSILON {
            // Луч параллелен slab'у
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    // t_enter < 0: origin внутри box или box позади
    (t_enter >= 0.0).then_some(t_enter)
}
