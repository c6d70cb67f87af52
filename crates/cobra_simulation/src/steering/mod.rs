//! Steering - stuck detection + local obstacle avoidance
//!
//! Порядок в тике (см. ai::systems::controller):
//! 1. stuck::observe_progress - меряем прогресс по позиции
//! 2. stuck::hard_escape - если застряли дольше потолка (short-circuit тика)
//! 3. стратегия архетипа → желаемое направление
//! 4. avoidance::plan - безопасное направление с учётом probe'ов
//!
//! Всё здесь - чистые функции над MotionState + SpatialProbe,
//! тестируются без App.

use bevy::prelude::*;

pub mod avoidance;
pub mod stuck;

pub use avoidance::{plan, PlannerInput, PlannerOutcome};
pub use stuck::{hard_escape, observe_progress, EscapeOutcome, StuckStatus};

/// Повернуть вектор на угол в градусах (против часовой)
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}
