//! Tests for AIState labels and the transition function.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::state::{
        after_perception, label_for_raw, transition, AIState, HandlerOutcome, UNKNOWN_STATE_LABEL,
    };
    use crate::perception::Sighting;
    use crate::world::EntityId;

    fn sighting() -> Sighting {
        Sighting {
            target: EntityId(7),
            collider: EntityId(7),
            position: Vec3::new(0.0, 0.0, 5.0),
        }
    }

    #[test]
    fn test_ai_state_default_is_patrol() {
        assert_eq!(AIState::default(), AIState::Patrol);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AIState::Patrol.label(), "Patrol");
        assert_eq!(AIState::Investigate.label(), "Investigate");
        assert_eq!(AIState::Chase.label(), "Chase");
        assert_eq!(label_for_raw(2), "Chase");
        assert_eq!(label_for_raw(3), UNKNOWN_STATE_LABEL);
        assert_eq!(label_for_raw(255), "N/A");
    }

    #[test]
    fn test_sighting_overrides_every_state() {
        for state in [AIState::Patrol, AIState::Investigate, AIState::Chase] {
            assert_eq!(after_perception(state, true), AIState::Chase);
            assert_eq!(after_perception(state, false), state);
        }
    }

    #[test]
    fn test_transition_table() {
        let seen = sighting();

        // Sighting + handler Chase остаётся
        assert_eq!(
            transition(AIState::Patrol, Some(&seen), HandlerOutcome::Stay),
            AIState::Chase
        );
        // Catch побеждает видимость
        assert_eq!(
            transition(
                AIState::Chase,
                Some(&seen),
                HandlerOutcome::Caught { target: seen.target }
            ),
            AIState::Patrol
        );
        assert_eq!(
            transition(
                AIState::Chase,
                None,
                HandlerOutcome::SightLost { last_known: seen.position }
            ),
            AIState::Investigate
        );
        assert_eq!(
            transition(AIState::Chase, None, HandlerOutcome::TargetGone),
            AIState::Patrol
        );
        assert_eq!(
            transition(AIState::Investigate, None, HandlerOutcome::GaveUp),
            AIState::Patrol
        );
        assert_eq!(
            transition(AIState::Investigate, None, HandlerOutcome::NothingToInvestigate),
            AIState::Patrol
        );
        assert_eq!(
            transition(AIState::Investigate, None, HandlerOutcome::Stay),
            AIState::Investigate
        );
    }
}
