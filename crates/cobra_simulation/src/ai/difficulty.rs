//! Difficulty scaling adapter
//!
//! Первый вызов запоминает base snapshot текущих параметров агента,
//! каждый вызов пересчитывает current = base × multiplier. Повторный
//! вызов с теми же множителями ничего не меняет (идемпотентно).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{AgentTuning, CobraAgent};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct DifficultyMultipliers {
    pub speed: f32,
    pub prediction: f32,
    pub alert_range: f32,
}

impl Default for DifficultyMultipliers {
    fn default() -> Self {
        Self {
            speed: 1.0,
            prediction: 1.0,
            alert_range: 1.0,
        }
    }
}

impl DifficultyMultipliers {
    pub fn new(speed: f32, prediction: f32, alert_range: f32) -> Self {
        Self {
            speed,
            prediction,
            alert_range,
        }
    }

    pub fn has_nan(&self) -> bool {
        self.speed.is_nan() || self.prediction.is_nan() || self.alert_range.is_nan()
    }

    /// Отрицательные множители → 0
    pub fn clamped(&self) -> Self {
        Self {
            speed: self.speed.max(0.0),
            prediction: self.prediction.max(0.0),
            alert_range: self.alert_range.max(0.0),
        }
    }
}

/// Base snapshot + последние применённые множители
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct DifficultyProfile {
    /// None до первого apply_difficulty
    pub base: Option<AgentTuning>,
    pub applied: DifficultyMultipliers,
}

/// Внешний контроллер прогрессии меняет сложность
///
/// target = None → все агенты.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DifficultyChanged {
    pub target: Option<Entity>,
    pub multipliers: DifficultyMultipliers,
}

/// Применить множители к агенту
///
/// Возвращает false, если множители отклонены (NaN).
pub fn apply_difficulty(
    agent: &mut CobraAgent,
    profile: &mut DifficultyProfile,
    multipliers: DifficultyMultipliers,
) -> bool {
    if multipliers.has_nan() {
        crate::log_warning(&format!("apply_difficulty: NaN multipliers отклонены {:?}", multipliers));
        return false;
    }

    let multipliers = multipliers.clamped();
    let base = *profile.base.get_or_insert(agent.tuning);

    agent.tuning = AgentTuning {
        speed: base.speed * multipliers.speed,
        prediction_multiplier: base.prediction_multiplier * multipliers.prediction,
        alert_range_multiplier: base.alert_range_multiplier * multipliers.alert_range,
    };
    profile.applied = multipliers;
    true
}

/// Система: DifficultyChanged → apply_difficulty
pub fn apply_difficulty_events(
    mut events: EventReader<DifficultyChanged>,
    mut agents: Query<(Entity, &mut CobraAgent, &mut DifficultyProfile)>,
) {
    for event in events.read() {
        for (entity, mut agent, mut profile) in agents.iter_mut() {
            if event.target.is_some_and(|target| target != entity) {
                continue;
            }
            if apply_difficulty(&mut agent, &mut profile, event.multipliers) {
                crate::log(&format!("{:?}: difficulty {:?}", entity, event.multipliers));
            }
        }
    }
}
