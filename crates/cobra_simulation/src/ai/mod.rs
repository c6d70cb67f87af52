//! Cobra AI - стратегии поведения + per-tick контроллер
//!
//! Архетип агента фиксирован при spawn, стратегия выбирается match'ем
//! (без trait objects). Steering (stuck/avoidance) живёт в crate::steering.

use bevy::prelude::*;

pub mod difficulty;
pub mod events;
pub mod pack;
pub mod strategies;
pub mod systems;

// Re-export основных типов
pub use difficulty::{apply_difficulty, DifficultyChanged, DifficultyMultipliers, DifficultyProfile};
pub use events::{HardEscapeTriggered, PlayerCaught};
pub use pack::{PackMember, PackRegistry};
pub use strategies::{DesiredMotion, StrategyContext};

use crate::components::{sync_player_snapshot, PlayerSnapshot};
use crate::config::{LevelConfig, SteeringConfig};
use crate::probe::ObstacleProbe;
use crate::shooting::{projectile_gate, tick_launcher_cooldowns, ProjectileFireRequested};
use crate::DeterministicRng;

/// Фазы FixedUpdate тика (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CobraSet {
    /// Снимки входов: игрок, стая, сложность
    Sense,
    /// Стрельба + контроллер
    Decide,
    /// velocity → Transform (headless) или внешний движок
    Integrate,
    /// Реакции на новое положение (PlayerCaught)
    React,
}

/// AI Plugin
///
/// Регистрирует системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. sync_player_snapshot - Player entity → PlayerSnapshot
/// 2. rebuild_pack_registry - снимок позиций стаи
/// 3. apply_difficulty_events - DifficultyChanged → tuning
/// 4. projectile_gate - cooldown + range → ProjectileFireRequested
/// 5. cobra_controller - stuck/strategy/planner → SteeringVelocity
/// 6. (CobraSet::Integrate) - см. HeadlessMotionPlugin
/// 7. detect_player_caught - PlayerCaught
///
/// Cooldown стрельбы тикает в Update по Time<Real>.
pub struct CobraAIPlugin;

impl Plugin for CobraAIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerSnapshot>()
            .init_resource::<PackRegistry>()
            .init_resource::<SteeringConfig>()
            .init_resource::<LevelConfig>()
            .init_resource::<ObstacleProbe>()
            .init_resource::<DeterministicRng>()
            .add_event::<PlayerCaught>()
            .add_event::<DifficultyChanged>()
            .add_event::<ProjectileFireRequested>()
            .add_event::<HardEscapeTriggered>()
            .configure_sets(
                FixedUpdate,
                (CobraSet::Sense, CobraSet::Decide, CobraSet::Integrate, CobraSet::React).chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    sync_player_snapshot,
                    pack::rebuild_pack_registry,
                    difficulty::apply_difficulty_events,
                )
                    .chain()
                    .in_set(CobraSet::Sense),
            )
            .add_systems(
                FixedUpdate,
                (projectile_gate, systems::cobra_controller)
                    .chain()
                    .in_set(CobraSet::Decide),
            )
            .add_systems(FixedUpdate, systems::detect_player_caught.in_set(CobraSet::React))
            .add_systems(Update, tick_launcher_cooldowns);
    }
}

/// Headless интеграция движения (без внешней физики)
///
/// Не добавляйте вместе с внешним physics integrator'ом: он сам
/// читает SteeringVelocity.
pub struct HeadlessMotionPlugin;

impl Plugin for HeadlessMotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            systems::integrate_agent_motion.in_set(CobraSet::Integrate),
        );
    }
}
