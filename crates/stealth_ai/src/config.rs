//! Конфигурация агента: perception + таймеры + пороги.
//!
//! Все поля имеют defaults, TOML может задавать только часть:
//!
//! ```toml
//! catch_distance = 2.0
//!
//! [perception]
//! view_distance = 12.0
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Параметры зрения (immutable per agent)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Как далеко видит агент (метры)
    pub view_distance: f32,
    /// Полный угол конуса зрения (градусы)
    pub view_angle_degrees: f32,
    /// Радиус слуха. Зарезервировано: слух не реализован
    pub hearing_distance: f32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            view_distance: 10.0,
            view_angle_degrees: 90.0,
            hearing_distance: 5.0,
        }
    }
}

/// Параметры поведения агента
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub perception: PerceptionConfig,
    /// Сколько секунд искать у last known position перед give-up
    pub investigate_duration: f32,
    /// Насколько близко подойти к last known position чтобы начать отсчёт
    pub investigate_arrival_threshold: f32,
    /// Дистанция "поймал"
    pub catch_distance: f32,
    /// Ожидание на каждой patrol точке (секунды)
    pub wait_duration: f32,
    /// Дистанция "дошёл до patrol точки" (строго меньше)
    pub patrol_arrival_threshold: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            perception: PerceptionConfig::default(),
            investigate_duration: 5.0,
            investigate_arrival_threshold: 1.0,
            catch_distance: 1.5,
            wait_duration: 2.0,
            patrol_arrival_threshold: 2.0,
        }
    }
}

impl AgentConfig {
    /// Parse + validate (недостающие поля = defaults)
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: AgentConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("perception.view_distance", self.perception.view_distance),
            ("perception.hearing_distance", self.perception.hearing_distance),
            ("investigate_duration", self.investigate_duration),
            ("investigate_arrival_threshold", self.investigate_arrival_threshold),
            ("catch_distance", self.catch_distance),
            ("wait_duration", self.wait_duration),
            ("patrol_arrival_threshold", self.patrol_arrival_threshold),
        ];

        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        let angle = self.perception.view_angle_degrees;
        if !angle.is_finite() || angle <= 0.0 || angle > 360.0 {
            return Err(ConfigError::ViewAngleOutOfRange(angle));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
