//! Tests for SimWorld overlap, raycast and hierarchy handling.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::world::{Shape, SimWorld, SpatialQuery};

    #[test]
    fn test_overlap_uses_reference_point_and_registration_order() {
        let mut world = SimWorld::new();
        let far = world.spawn_sphere(Vec3::new(0.0, 0.0, 9.0), 0.5, true);
        let near = world.spawn_sphere(Vec3::new(0.0, 0.0, 2.0), 0.5, true);
        // Центр за радиусом, хотя поверхность сферы внутри
        world.spawn_sphere(Vec3::new(0.0, 0.0, 10.3), 0.5, true);

        let found = world.overlap_sphere(Vec3::ZERO, 10.0);
        assert_eq!(found, vec![far, near]);
    }

    #[test]
    fn test_raycast_returns_nearest_hit() {
        let mut world = SimWorld::new();
        let back = world.spawn_sphere(Vec3::new(0.0, 0.0, 8.0), 1.0, false);
        let front = world.spawn_sphere(Vec3::new(0.0, 0.0, 4.0), 1.0, false);

        let hit = world.raycast(Vec3::ZERO, Vec3::Z, 20.0).expect("hit");
        assert_eq!(hit.collider, front);
        assert!((hit.distance - 3.0).abs() < 1e-5);
        assert!((hit.point - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-5);

        world.despawn(front);
        let hit = world.raycast(Vec3::ZERO, Vec3::Z, 20.0).expect("hit");
        assert_eq!(hit.collider, back);
    }

    #[test]
    fn test_raycast_respects_max_distance() {
        let mut world = SimWorld::new();
        world.spawn_sphere(Vec3::new(0.0, 0.0, 12.0), 1.0, false);

        assert!(world.raycast(Vec3::ZERO, Vec3::Z, 10.0).is_none());
        assert!(world.raycast(Vec3::ZERO, Vec3::Z, 11.5).is_some());
    }

    #[test]
    fn test_raycast_ignores_collider_containing_origin() {
        let mut world = SimWorld::new();
        world.spawn_sphere(Vec3::ZERO, 0.5, false); // "своё" тело
        let other = world.spawn_sphere(Vec3::new(0.0, 0.0, 5.0), 0.5, true);

        let hit = world.raycast(Vec3::new(0.0, 0.2, 0.0), Vec3::Z, 10.0).expect("hit");
        assert_eq!(hit.collider, other);
    }

    #[test]
    fn test_raycast_hits_box_obstacle() {
        let mut world = SimWorld::new();
        let wall = world.spawn_box(Vec3::new(0.0, 0.0, 3.0), Vec3::new(2.0, 1.0, 0.25));
        world.spawn_sphere(Vec3::new(0.0, 0.0, 6.0), 0.5, true);

        let hit = world.raycast(Vec3::ZERO, Vec3::Z, 10.0).expect("hit");
        assert_eq!(hit.collider, wall);
        assert_eq!(hit.root, wall);
        assert!((hit.distance - 2.75).abs() < 1e-5);

        // Луч мимо стены (параллельно оси, вне slab по X)
        let side = world.raycast(Vec3::new(3.0, 0.0, 0.0), Vec3::Z, 10.0);
        assert!(side.is_none());
    }

    #[test]
    fn test_child_collider_shares_root_and_moves_with_it() {
        let mut world = SimWorld::new();
        let body = world.spawn_sphere(Vec3::new(0.0, 0.0, 5.0), 0.4, true);
        let head = world
            .attach(body, Vec3::new(0.0, 1.0, 5.0), Shape::Sphere { radius: 0.2 }, true)
            .expect("attached");

        assert_eq!(world.entity(head).map(|r| r.root), Some(body));

        world.set_position(body, Vec3::new(2.0, 0.0, 5.0));
        assert_eq!(world.position(head), Some(Vec3::new(2.0, 1.0, 5.0)));

        world.despawn(body);
        assert!(world.entity(head).is_none());
        assert!(world.is_empty());
    }

    #[test]
    fn test_despawned_handle_is_not_reused() {
        let mut world = SimWorld::new();
        let first = world.spawn_sphere(Vec3::ZERO, 0.5, false);
        world.despawn(first);
        let second = world.spawn_sphere(Vec3::ZERO, 0.5, false);

        assert_ne!(first, second);
        assert!(world.entity(first).is_none());
        assert!(!world.set_position(first, Vec3::ONE));
    }
}
