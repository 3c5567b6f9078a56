//! Perception: vision cone + line-of-sight через SpatialQuery.
//!
//! Слух (hearing_distance) зарезервирован в конфиге, но не реализован.

pub mod sensor;


pub use sensor::{
    body_rotation, direction_to, EyeMount, LineOfSight, PerceptionSensor, SensingOrigin, Sighting,
    VisionGizmo,
};
