//! Ошибки и setup-проблемы.
//!
//! Ни одна из них не фатальна для тика: агент остаётся tickable,
//! зависимая фича деградирует в no-op.

use std::fmt;
use thiserror::Error;

/// Внешний коллаборатор, без которого часть поведения отключается
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collaborator {
    /// Navigation (MovementRequester → set_destination)
    Navigation,
    /// Sensing origin ("глаз" агента)
    SensingOrigin,
    /// Display sink для state label
    Display,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collaborator::Navigation => "navigation",
            Collaborator::SensingOrigin => "sensing origin",
            Collaborator::Display => "display sink",
        };
        f.write_str(name)
    }
}

/// Проблемы конфигурации агента, логируются один раз при создании
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupIssue {
    #[error("{0} is not assigned, dependent behavior is disabled")]
    MissingCollaborator(Collaborator),

    #[error("patrol route is empty, PATROL state will be no-op")]
    EmptyRoute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// Направление нулевой длины (кандидат совпадает с глазом)
    #[error("zero-length sensing direction")]
    DegenerateDirection,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite non-negative number, got {value}")]
    InvalidValue { field: &'static str, value: f32 },

    #[error("view angle must be within (0, 360] degrees, got {0}")]
    ViewAngleOutOfRange(f32),

    #[error("failed to parse agent config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read agent config: {0}")]
    Io(#[from] std::io::Error),
}
