//! Rapier SpatialQuery для ECS хоста.
//!
//! Colliders живут в bevy_rapier3d (`Collider` компонент), hierarchy = Bevy `ChildOf`,
//! capability = `Pursuable` на collider'е или на его root.
//!
//! Sensors (триггеры, hitbox'ы) не участвуют ни в overlap, ни в occlusion.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, QueryFilter, RapierContext, ReadRapierContext};

use super::{EntityId, EntityRecord, RayHit, SpatialQuery};

/// Capability marker: этого actor'а можно преследовать
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Pursuable;

type BodyQuery<'w, 's> = Query<'w, 's, (&'static GlobalTransform, Has<Pursuable>)>;
type ParentQuery<'w, 's> = Query<'w, 's, &'static ChildOf>;

/// SystemParam: rapier context + transforms/hierarchy для EntityRecord
#[derive(SystemParam)]
pub struct RapierWorld<'w, 's> {
    rapier: ReadRapierContext<'w, 's>,
    bodies: BodyQuery<'w, 's>,
    parents: ParentQuery<'w, 's>,
}

impl<'w, 's> RapierWorld<'w, 's> {
    /// None пока default RapierContext не создан
    pub fn query(&self) -> Option<RapierSpatialQuery<'_, 'w, 's>> {
        let context = self.rapier.single().ok()?;
        Some(RapierSpatialQuery {
            context,
            bodies: &self.bodies,
            parents: &self.parents,
        })
    }
}

pub struct RapierSpatialQuery<'a, 'w, 's> {
    context: RapierContext<'a>,
    bodies: &'a BodyQuery<'w, 's>,
    parents: &'a ParentQuery<'w, 's>,
}

fn vision_filter<'a>() -> QueryFilter<'a> {
    QueryFilter::default().exclude_sensors()
}

impl RapierSpatialQuery<'_, '_, '_> {
    fn root_of(&self, entity: Entity) -> Entity {
        let mut current = entity;
        while let Ok(child_of) = self.parents.get(current) {
            current = child_of.parent();
        }
        current
    }

    fn position(&self, entity: Entity) -> Option<Vec3> {
        self.bodies
            .get(entity)
            .ok()
            .map(|(transform, _)| transform.translation())
    }

    fn record(&self, entity: Entity) -> Option<EntityRecord> {
        let (transform, pursuable) = self.bodies.get(entity).ok()?;
        let root = self.root_of(entity);
        let root_pursuable = self.bodies.get(root).is_ok_and(|(_, flag)| flag);

        Some(EntityRecord {
            position: transform.translation(),
            root: root.into(),
            pursuable: pursuable || root_pursuable,
        })
    }
}

impl SpatialQuery for RapierSpatialQuery<'_, '_, '_> {
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<EntityId> {
        let ball = Collider::ball(radius);
        let mut found = Vec::new();
        self.context.intersect_shape(
            center,
            Quat::IDENTITY,
            &*ball.raw,
            vision_filter(),
            |entity| {
                found.push(entity);
                true
            },
        );

        // Контракт: reference point внутри сферы, а не просто касание формы
        found.retain(|&entity| {
            self.position(entity)
                .is_some_and(|position| position.distance(center) <= radius)
        });

        // Порядок BVH зависит от истории вставок: сортируем для детерминизма
        found.sort();
        found.into_iter().map(EntityId::from).collect()
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        // Собственное тело агента (origin внутри) не заслоняет обзор
        let mut containing = Vec::new();
        self.context.intersect_point(origin, vision_filter(), |entity| {
            containing.push(entity);
            true
        });

        let outside = |entity: Entity| !containing.contains(&entity);
        let filter = vision_filter().predicate(&outside);

        let (collider, distance) = self
            .context
            .cast_ray(origin, direction, max_distance, true, filter)?;

        Some(RayHit {
            point: origin + direction * distance,
            distance,
            collider: collider.into(),
            root: self.root_of(collider).into(),
        })
    }

    fn entity(&self, id: EntityId) -> Option<EntityRecord> {
        self.record(id.to_entity()?)
    }
}
