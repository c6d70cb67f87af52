//! Базовые компоненты агента: CobraAgent, Personality, AgentTuning, Behavior

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::archetype::Archetype;

/// Текущие (уже масштабированные сложностью) параметры агента
///
/// Инвариант: значения = base snapshot × difficulty multiplier
/// (см. ai::difficulty), никогда не накапливаются.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct AgentTuning {
    /// Базовая скорость (units/sec)
    pub speed: f32,
    /// Множитель предсказания позиции игрока (Intercept)
    pub prediction_multiplier: f32,
    /// Множитель радиусов обнаружения (alert/ambush range)
    pub alert_range_multiplier: f32,
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self {
            speed: 3.0,
            prediction_multiplier: 1.0,
            alert_range_multiplier: 1.0,
        }
    }
}

impl AgentTuning {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            ..Default::default()
        }
    }

    /// Потолок скорости с учётом максимального буста архетипа
    pub fn max_speed(&self, archetype: &Archetype) -> f32 {
        self.speed * archetype.max_boost()
    }
}

/// Характер агента - фиксирован на всю жизнь, складывается в base snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum Personality {
    /// Чуть быстрее обычного
    Relentless,
    /// Медленнее, но лучше предсказывает
    Cautious,
    /// Дёргает направление на небольшой случайный угол каждый тик
    Erratic,
    /// Сильнее предсказание (для Intercept)
    #[default]
    Cunning,
}

impl Personality {
    pub fn speed_factor(&self) -> f32 {
        match self {
            Personality::Relentless => 1.1,
            Personality::Cautious => 0.9,
            Personality::Erratic | Personality::Cunning => 1.0,
        }
    }

    pub fn prediction_factor(&self) -> f32 {
        match self {
            Personality::Cunning => 1.3,
            Personality::Cautious => 1.1,
            Personality::Relentless | Personality::Erratic => 1.0,
        }
    }

    /// Максимальный угол случайного отклонения направления (радианы)
    pub fn heading_jitter(&self) -> f32 {
        match self {
            Personality::Erratic => 0.15,
            _ => 0.0,
        }
    }

    /// Применить характер к базовым параметрам (один раз при spawn)
    pub fn shape(&self, tuning: AgentTuning) -> AgentTuning {
        AgentTuning {
            speed: tuning.speed * self.speed_factor(),
            prediction_multiplier: tuning.prediction_multiplier * self.prediction_factor(),
            alert_range_multiplier: tuning.alert_range_multiplier,
        }
    }
}

/// Враждебный NPC ("cobra")
///
/// Автоматически добавляет motion/visual компоненты через Required Components.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(
    super::MotionState,
    super::SteeringVelocity,
    super::VisualState,
    super::PlayerContact,
    crate::ai::DifficultyProfile
)]
pub struct CobraAgent {
    pub personality: Personality,
    pub tuning: AgentTuning,
    /// Instant-kill режим уровня (копируется из LevelConfig при spawn)
    pub instant_kill: bool,
}

/// Архетип агента
///
/// Выбирается один раз при создании. Поле приватное: системы читают его
/// через `archetype()`, публичного пути для смены архетипа нет.
#[derive(Component, Debug, Clone)]
pub struct Behavior {
    archetype: Archetype,
}

impl Behavior {
    pub fn new(archetype: Archetype) -> Self {
        Self { archetype }
    }

    pub fn archetype(&self) -> &Archetype {
        &self.archetype
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personality_shapes_base_values() {
        let shaped = Personality::Relentless.shape(AgentTuning::new(2.0));
        assert!((shaped.speed - 2.2).abs() < 1e-5);
        assert_eq!(shaped.prediction_multiplier, 1.0);

        let shaped = Personality::Cunning.shape(AgentTuning::new(2.0));
        assert_eq!(shaped.speed, 2.0);
        assert!((shaped.prediction_multiplier - 1.3).abs() < 1e-5);
    }

    #[test]
    fn test_max_speed_includes_archetype_boost() {
        let tuning = AgentTuning::new(2.0);
        assert_eq!(tuning.max_speed(&Archetype::Chase), 2.0);

        let ambusher = Archetype::Ambusher(Default::default());
        assert!(tuning.max_speed(&ambusher) > 2.0);
    }

    #[test]
    fn test_only_erratic_jitters() {
        assert!(Personality::Erratic.heading_jitter() > 0.0);
        assert_eq!(Personality::Cunning.heading_jitter(), 0.0);
    }
}
