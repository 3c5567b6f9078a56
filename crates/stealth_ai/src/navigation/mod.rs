//! Navigation boundary: core только просит destination.
//!
//! Содержит:
//! - Navigator (trait внешнего pathfinding коллаборатора)
//! - MovementRequester (fire-and-forget обёртка, no-op без навигатора)
//! - MovementCommand / MovementSpeed (ECS компоненты)

pub mod components;
pub mod requester;


pub use components::*;
pub use requester::{step_towards, MovementRequester, Navigator};
