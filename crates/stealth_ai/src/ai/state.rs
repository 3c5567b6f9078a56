//! AIState + чистая функция переходов.
//!
//! Переход за тик = два шага:
//! 1. `after_perception`: положительный sighting всегда форсит Chase
//! 2. `after_handler`: outcome handler'а post-perception состояния
//!
//! `transition` склеивает оба шага (используется в тестах и для документации правил).

use bevy::prelude::*;

use crate::perception::Sighting;
use crate::world::EntityId;

/// Label для состояния, которое не удалось распознать
pub const UNKNOWN_STATE_LABEL: &str = "N/A";

/// Состояние stealth агента (ровно одно из трёх)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
#[repr(u8)]
pub enum AIState {
    #[default]
    Patrol = 0,
    Investigate = 1,
    Chase = 2,
}

impl AIState {
    pub fn label(&self) -> &'static str {
        match self {
            AIState::Patrol => "Patrol",
            AIState::Investigate => "Investigate",
            AIState::Chase => "Chase",
        }
    }
}

impl TryFrom<u8> for AIState {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(AIState::Patrol),
            1 => Ok(AIState::Investigate),
            2 => Ok(AIState::Chase),
            other => Err(other),
        }
    }
}

/// Label для сырого значения состояния (например из save/сети)
pub fn label_for_raw(raw: u8) -> &'static str {
    AIState::try_from(raw)
        .map(|state| state.label())
        .unwrap_or(UNKNOWN_STATE_LABEL)
}

/// Результат handler'а за тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandlerOutcome {
    /// Состояние не меняется
    Stay,
    /// Chase: цель в пределах catch_distance
    Caught { target: EntityId },
    /// Chase: цель потеряна, есть last known position
    SightLost { last_known: Vec3 },
    /// Chase: цель потеряна и идти некуда (или цели нет вообще)
    TargetGone,
    /// Investigate: таймер истёк
    GaveUp,
    /// Investigate: нет last known position
    NothingToInvestigate,
}

/// Шаг 1: perception override (безусловный, до handler'а)
pub fn after_perception(current: AIState, spotted: bool) -> AIState {
    if spotted {
        AIState::Chase
    } else {
        current
    }
}

/// Шаг 2: outcome handler'а → следующее состояние
pub fn after_handler(state: AIState, outcome: HandlerOutcome) -> AIState {
    match outcome {
        HandlerOutcome::Stay => state,
        HandlerOutcome::SightLost { .. } => AIState::Investigate,
        HandlerOutcome::Caught { .. }
        | HandlerOutcome::TargetGone
        | HandlerOutcome::GaveUp
        | HandlerOutcome::NothingToInvestigate => AIState::Patrol,
    }
}

/// `(state, perception, outcome) → next state`
pub fn transition(
    current: AIState,
    sighting: Option<&Sighting>,
    outcome: HandlerOutcome,
) -> AIState {
    after_handler(after_perception(current, sighting.is_some()), outcome)
}
