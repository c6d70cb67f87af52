//! Behavior strategies - по одной на архетип
//!
//! Каждая стратегия: (агент, снимок игрока, своё ArchetypeState) → DesiredMotion.
//! Стратегии не трогают Transform и не зовут planner сами: контроллер решает,
//! пропускать ли результат через avoidance (bypass_planner).

use bevy::prelude::*;
use rand::Rng;

use crate::components::{AgentTuning, Archetype, ArchetypeState, MotionState, PlayerSnapshot, VisualState};
use crate::config::{ArenaBounds, SteeringConfig};
use crate::probe::SpatialProbe;

use super::pack::PackRegistry;

pub mod ambusher;
pub mod chase;
pub mod intercept;
pub mod pack_hunter;
pub mod patroller;
pub mod sniper;
pub mod wander;


/// Что стратегия хочет сделать в этом тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesiredMotion {
    /// Желаемое направление (ZERO = стоим)
    pub direction: Vec2,
    /// Желаемая скорость (units/sec), контроллер ограничит max_speed
    pub speed: f32,
    /// Точка, к которой стремимся (для оценки detour кандидатов)
    pub target: Vec2,
    /// true - движение применяется напрямую, без avoidance planner'а
    pub bypass_planner: bool,
    pub visual: VisualState,
}

impl DesiredMotion {
    /// Стоим на месте
    pub fn hold(position: Vec2, visual: VisualState) -> Self {
        Self {
            direction: Vec2::ZERO,
            speed: 0.0,
            target: position,
            bypass_planner: true,
            visual,
        }
    }

    /// Движение к точке через planner
    pub fn toward(position: Vec2, target: Vec2, speed: f32, visual: VisualState) -> Self {
        Self {
            direction: (target - position).normalize_or_zero(),
            speed,
            target,
            bypass_planner: false,
            visual,
        }
    }

    pub fn bypassing_planner(mut self) -> Self {
        self.bypass_planner = true;
        self
    }
}

/// Всё, что стратегия может прочитать в тике (read-only)
pub struct StrategyContext<'a> {
    pub entity: Entity,
    pub position: Vec2,
    pub dt: f32,
    pub tuning: &'a AgentTuning,
    pub player: &'a PlayerSnapshot,
    pub arena: &'a ArenaBounds,
    pub pack: &'a PackRegistry,
    pub motion: &'a MotionState,
    pub steering: &'a SteeringConfig,
    /// Для перепроверки запомненных направлений (Sniper escape reuse)
    pub probe: &'a dyn SpatialProbe,
}

impl StrategyContext<'_> {
    /// Дистанция до игрока (None если игрока нет в уровне)
    pub fn player_distance(&self) -> Option<f32> {
        self.player
            .active
            .then(|| self.position.distance(self.player.position))
    }
}

/// Скорость, при которой за тик не перелетаем точку назначения
pub fn arrival_speed(speed: f32, distance: f32, dt: f32) -> f32 {
    if dt > 0.0 {
        speed.min(distance / dt)
    } else {
        speed
    }
}

/// Диспетчер: фиксированный архетип → его стратегия
///
/// Если ArchetypeState почему-то не соответствует архетипу (например, внешний
/// код вставил чужое состояние), состояние пересоздаётся из архетипа.
pub fn decide(
    archetype: &Archetype,
    state: &mut ArchetypeState,
    ctx: &StrategyContext,
    rng: &mut impl Rng,
) -> DesiredMotion {
    if !state.matches(archetype) {
        crate::log_warning(&format!(
            "{:?}: ArchetypeState не соответствует {}, пересоздаём",
            ctx.entity,
            archetype.name()
        ));
        *state = ArchetypeState::for_archetype(archetype, ctx.position, ctx.entity);
    }

    match (archetype, state) {
        (Archetype::Chase, _) => chase::decide(ctx),
        (Archetype::Intercept(config), _) => intercept::decide(config, ctx),
        (
            Archetype::Wander(config),
            ArchetypeState::Wander {
                target,
                retarget_timer,
            },
        ) => wander::decide(config, target, retarget_timer, ctx, rng),
        (
            Archetype::Ambusher(config),
            ArchetypeState::Ambusher {
                is_hiding,
                hide_timer,
                anchor,
                drift_clock,
            },
        ) => ambusher::decide(
            config,
            ambusher::HideState {
                is_hiding,
                hide_timer,
                anchor,
                drift_clock,
            },
            ctx,
            rng,
        ),
        (Archetype::Patroller(config), ArchetypeState::Patroller { is_alerted, route }) => {
            patroller::decide(config, is_alerted, route, ctx)
        }
        (Archetype::PackHunter(config), ArchetypeState::PackHunter { is_coordinating }) => {
            pack_hunter::decide(config, is_coordinating, ctx)
        }
        (Archetype::Sniper(config), ArchetypeState::Sniper { phase, clock }) => {
            sniper::decide(config, *phase, clock, ctx)
        }
        // Недостижимо после пересоздания состояния выше
        _ => DesiredMotion::hold(ctx.position, VisualState::Idle),
    }
}
