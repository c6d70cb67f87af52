//! Ошибки конфигурации (только spawn-time валидация)
//!
//! Runtime системы никогда не возвращают ошибки: невалидные данные в тике
//! обрабатываются локальным no-op fallback'ом (см. steering/ai модули).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("base speed must be positive and finite, got {0}")]
    InvalidSpeed(f32),

    #[error("spawn position is not finite: ({x}, {y})")]
    NonFinitePosition { x: f32, y: f32 },

    #[error("arena bounds are inverted: min ({min_x}, {min_y}) > max ({max_x}, {max_y})")]
    InvertedBounds {
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
    },

    #[error("{name} must be positive, got {value}")]
    NonPositiveRange { name: &'static str, value: f32 },

    #[error("sniper band is inverted: preferred min {min} >= preferred max {max}")]
    InvertedSniperBand { min: f32, max: f32 },

    #[error("escape nudge {nudge} exceeds escape probe distance {probe}")]
    EscapeNudgeBeyondProbe { nudge: f32, probe: f32 },
}
