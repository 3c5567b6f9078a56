//! Tests for waypoint cycling and dwell timing.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::patrol::{PatrolCursor, PatrolRoute, PatrolStep};
    use crate::config::AgentConfig;

    fn square_route() -> PatrolRoute {
        PatrolRoute::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 10.0),
            ],
            2.0,
            2.0,
        )
    }

    #[test]
    fn test_route_from_config() {
        let config = AgentConfig::default();
        let route = PatrolRoute::from_config(vec![Vec3::ZERO], &config);
        assert_eq!(route.wait_duration, 2.0);
        assert_eq!(route.arrival_threshold, 2.0);
        assert!(PatrolRoute::empty().is_empty());
    }

    #[test]
    fn test_empty_route_is_idle() {
        let mut cursor = PatrolCursor::default();
        let step = cursor.step(&PatrolRoute::empty(), Vec3::ZERO, 1.0);
        assert_eq!(step, PatrolStep::Idle);
        assert_eq!(cursor, PatrolCursor::default());
    }

    #[test]
    fn test_far_from_waypoint_requests_move() {
        let route = square_route();
        let mut cursor = PatrolCursor { index: 1, dwell_elapsed: 0.0 };

        let step = cursor.step(&route, Vec3::ZERO, 1.0);
        assert_eq!(step, PatrolStep::MoveTo(Vec3::new(10.0, 0.0, 0.0)));
        assert_eq!(cursor.dwell_elapsed, 0.0);
    }

    #[test]
    fn test_arrival_threshold_is_strict() {
        let route = square_route();
        let mut cursor = PatrolCursor::default();

        // Ровно 2.0: ещё не дошёл
        let step = cursor.step(&route, Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert_eq!(step, PatrolStep::MoveTo(Vec3::ZERO));

        let step = cursor.step(&route, Vec3::new(1.5, 0.0, 0.0), 1.0);
        assert_eq!(step, PatrolStep::Dwelling { index: 0 });
    }

    #[test]
    fn test_dwell_then_advance_and_wrap() {
        let route = square_route();
        let mut cursor = PatrolCursor { index: 2, dwell_elapsed: 0.0 };
        let at_last = Vec3::new(10.0, 0.0, 10.0);

        assert_eq!(cursor.step(&route, at_last, 1.0), PatrolStep::Dwelling { index: 2 });
        assert_eq!(
            cursor.step(&route, at_last, 1.0),
            PatrolStep::Advanced { from: 2, to: 0 }
        );
        assert_eq!(cursor.index, 0);
        assert_eq!(cursor.dwell_elapsed, 0.0);
    }

    #[test]
    fn test_full_cycle_visits_every_waypoint() {
        let route = square_route();
        let mut cursor = PatrolCursor::default();
        let mut visited = Vec::new();

        for _ in 0..3 {
            let here = route.waypoints[cursor.index];
            loop {
                if let PatrolStep::Advanced { from, .. } = cursor.step(&route, here, 0.5) {
                    visited.push(from);
                    break;
                }
            }
        }

        assert_eq!(visited, vec![0, 1, 2]);
        assert_eq!(cursor.index, 0);
    }

    #[test]
    fn test_index_clamped_when_route_shrinks() {
        let mut route = square_route();
        let mut cursor = PatrolCursor { index: 2, dwell_elapsed: 0.0 };
        route.waypoints.truncate(1);

        let step = cursor.step(&route, Vec3::new(50.0, 0.0, 0.0), 1.0);
        assert_eq!(cursor.index, 0);
        assert_eq!(step, PatrolStep::MoveTo(Vec3::ZERO));
    }
}
