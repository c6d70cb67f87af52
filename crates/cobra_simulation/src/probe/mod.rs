//! Spatial probe - directional obstacle queries
//!
//! Архитектура:
//! - Collision system внешний (физика host-игры), здесь только trait
//! - Steering видит мир исключительно через probe(): луч ограниченной длины
//! - Нет хита = путь свободен на всю длину луча (не ошибка)
//!
//! Probe read-only, поэтому один ObstacleProbe resource безопасно
//! используется всеми агентами в одном тике.

use bevy::prelude::*;

pub mod walls;

pub use walls::{WallBox, WallField};

// ============================================================================
// Layer битовые маски
// ============================================================================

/// Layer 1: статические стены лабиринта
pub const LAYER_WALLS: u32 = 0b1; // 1

/// Layer 2: внешняя граница арены
pub const LAYER_ARENA_EDGE: u32 = 0b10; // 2

/// Layer 3: агенты (cobras, player)
pub const LAYER_AGENTS: u32 = 0b100; // 4

/// Mask: steering избегает стен и границы, но не других агентов
pub const MASK_STEERING: u32 = LAYER_WALLS | LAYER_ARENA_EDGE;

/// Результат пробы
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Расстояние от origin до препятствия
    pub distance: f32,
    /// Нормаль поверхности в точке хита (unit)
    pub normal: Vec2,
}

/// Directional obstacle query против внешней collision system
///
/// Контракт:
/// - `direction` нормализуется реализацией; нулевой вектор → `None`
/// - хит дальше `max_distance` не возвращается
/// - учитываются только слои из `layer_mask`
pub trait SpatialProbe: Send + Sync {
    fn probe(&self, origin: Vec2, direction: Vec2, max_distance: f32, layer_mask: u32) -> Option<ProbeHit>;

    /// Свободная дистанция вдоль направления (нет хита → max_distance)
    fn clear_distance(&self, origin: Vec2, direction: Vec2, max_distance: f32, layer_mask: u32) -> f32 {
        self.probe(origin, direction, max_distance, layer_mask)
            .map(|hit| hit.distance)
            .unwrap_or(max_distance)
    }
}

/// Пустой мир без препятствий
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl SpatialProbe for OpenField {
    fn probe(&self, _origin: Vec2, _direction: Vec2, _max_distance: f32, _layer_mask: u32) -> Option<ProbeHit> {
        None
    }
}

/// Resource: probe, который видят steering системы
///
/// Host-игра подставляет свою реализацию (адаптер над своей физикой).
#[derive(Resource)]
pub struct ObstacleProbe(pub Box<dyn SpatialProbe>);

impl ObstacleProbe {
    pub fn new(probe: impl SpatialProbe + 'static) -> Self {
        Self(Box::new(probe))
    }

    pub fn get(&self) -> &dyn SpatialProbe {
        self.0.as_ref()
    }
}

impl Default for ObstacleProbe {
    fn default() -> Self {
        Self::new(OpenField)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_field_is_always_clear() {
        let probe = OpenField;
        assert!(probe.probe(Vec2::ZERO, Vec2::X, 10.0, MASK_STEERING).is_none());
        assert_eq!(probe.clear_distance(Vec2::ZERO, Vec2::X, 3.0, MASK_STEERING), 3.0);
    }

    #[test]
    fn test_steering_mask_ignores_agents() {
        assert_eq!(MASK_STEERING & LAYER_AGENTS, 0);
        assert_ne!(MASK_STEERING & LAYER_WALLS, 0);
        assert_ne!(MASK_STEERING & LAYER_ARENA_EDGE, 0);
    }
}
