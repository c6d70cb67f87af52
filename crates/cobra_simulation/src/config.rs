//! Steering/level конфигурация (ECS resources)
//!
//! Все пороги stuck detector'а и avoidance planner'а собраны здесь,
//! чтобы внешний загрузчик мог подменить их целиком (serde).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Пороги stuck detection + local avoidance
///
/// Расстояния в world units, времена в секундах (scaled time).
/// Пороги движения заданы "за тик", потому что детектор меряет
/// дельту позиции между соседними FixedUpdate тиками.
#[derive(Resource, Debug, Clone, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
pub struct SteeringConfig {
    /// ε₁: дельта за тик ниже этого значения считается "не двигаемся"
    pub stuck_move_epsilon: f32,
    /// ε₂: дельта выше этого значения сбрасывает stuck таймеры
    pub stuck_release_epsilon: f32,
    /// Потолок unstuck_force_timer → hard escape
    pub hard_escape_after: f32,
    /// Дальность пробы для 8-way escape scan
    pub escape_probe_distance: f32,
    /// На сколько толкаем агента при успешном escape
    pub escape_nudge: f32,
    /// Амплитуда случайного смещения когда все 8 направлений закрыты
    pub escape_jitter: f32,

    /// Soft threshold stuck_timer → принудительная переоценка направлений
    pub soft_stuck_threshold: f32,
    /// Единый порог stuck_timer для переключения alternating sign
    pub sign_flip_threshold: f32,
    /// Look-ahead прямого пути (хит ближе = путь заблокирован)
    pub look_ahead: f32,
    /// Дальность пробы для 4 кандидатов обхода
    pub candidate_probe_distance: f32,
    /// Кандидат с хитом ближе этого считается заблокированным
    pub candidate_min_clearance: f32,
    /// Длительность commit'а на detour
    pub detour_commit_duration: f32,
    /// Дальность 7-лучевого fan probe
    pub fan_probe_distance: f32,

    /// Слои, по которым пробует steering
    pub probe_mask: u32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            stuck_move_epsilon: 0.006,
            stuck_release_epsilon: 0.02,
            hard_escape_after: 1.3,
            escape_probe_distance: 1.0,
            escape_nudge: 0.15,
            escape_jitter: 0.05,

            soft_stuck_threshold: 0.15,
            sign_flip_threshold: 0.3,
            look_ahead: 0.6,
            candidate_probe_distance: 3.0,
            candidate_min_clearance: 0.45,
            detour_commit_duration: 0.6,
            fan_probe_distance: 1.5,

            probe_mask: crate::probe::MASK_STEERING,
        }
    }
}

impl SteeringConfig {
    /// Hard escape толкает только на проверенную пробой дистанцию
    /// (толчок клампится ареной, но не стенами)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.escape_nudge > self.escape_probe_distance {
            return Err(ConfigError::EscapeNudgeBeyondProbe {
                nudge: self.escape_nudge,
                probe: self.escape_probe_distance,
            });
        }
        Ok(())
    }
}

/// Прямоугольная арена (axis-aligned)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct ArenaBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            min: Vec2::splat(-8.0),
            max: Vec2::splat(8.0),
        }
    }
}

impl ArenaBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min.x > self.max.x || self.min.y > self.max.y {
            return Err(ConfigError::InvertedBounds {
                min_x: self.min.x,
                min_y: self.min.y,
                max_x: self.max.x,
                max_y: self.max.y,
            });
        }
        Ok(())
    }
}

/// Level-wide настройки, приходят от внешнего level loader'а
#[derive(Resource, Debug, Clone, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
pub struct LevelConfig {
    pub arena: ArenaBounds,
    /// Instant-kill режим: PlayerCaught несёт флаг, game-over логика снаружи
    pub instant_kill: bool,
    /// Дистанция, на которой агент "поймал" игрока
    pub catch_radius: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            arena: ArenaBounds::default(),
            instant_kill: false,
            catch_radius: 0.35,
        }
    }
}
