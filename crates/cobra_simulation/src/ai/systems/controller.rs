//! Agent controller - per-tick оркестратор
//!
//! Для каждого агента:
//! 1. stuck detector (observe_progress)
//! 2. hard escape → толчок Transform, движение в этом тике пропускается
//! 3. стратегия архетипа → DesiredMotion
//! 4. Erratic jitter + avoidance planner (если стратегия не bypass)
//! 5. velocity ≤ max_speed, visual tag

use bevy::prelude::*;
use rand::Rng;

use crate::ai::events::HardEscapeTriggered;
use crate::ai::pack::PackRegistry;
use crate::ai::strategies::{self, StrategyContext};
use crate::components::{
    Archetype, ArchetypeState, Behavior, CobraAgent, MotionState, PlayerSnapshot, SteeringVelocity, VisualState,
};
use crate::config::{LevelConfig, SteeringConfig};
use crate::probe::{ObstacleProbe, SpatialProbe};
use crate::steering::{self, EscapeOutcome, PlannerInput, StuckStatus};
use crate::DeterministicRng;

/// Общие read-only входы тика
pub struct TickEnv<'a> {
    pub dt: f32,
    pub player: &'a PlayerSnapshot,
    pub level: &'a LevelConfig,
    pub steering: &'a SteeringConfig,
    pub probe: &'a dyn SpatialProbe,
    pub pack: &'a PackRegistry,
}

/// Результат тика одного агента
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentTick {
    pub velocity: Vec2,
    /// Мгновенное смещение (только hard escape)
    pub displacement: Vec2,
    pub visual: VisualState,
    pub escape: Option<EscapeOutcome>,
    /// Planner не нашёл свободного луча и ведёт вдоль стены
    pub wall_sliding: bool,
}

/// Один тик агента без ECS (тестируется напрямую)
#[allow(clippy::too_many_arguments)]
pub fn tick_agent(
    entity: Entity,
    position: Vec2,
    agent: &CobraAgent,
    archetype: &Archetype,
    state: &mut ArchetypeState,
    motion: &mut MotionState,
    env: &TickEnv,
    rng: &mut impl Rng,
) -> AgentTick {
    if steering::observe_progress(motion, position, env.dt, env.steering) == StuckStatus::EscapeDue {
        let preferred = if env.player.active {
            env.player.position - position
        } else {
            Vec2::X
        };
        let outcome = steering::hard_escape(position, preferred, motion, env.probe, env.steering, rng);
        crate::log_info(&format!("{:?}: hard escape {:?}", entity, outcome));

        return AgentTick {
            velocity: Vec2::ZERO,
            displacement: outcome.offset(),
            visual: VisualState::Escaping,
            escape: Some(outcome),
            wall_sliding: false,
        };
    }

    let desired = {
        let ctx = StrategyContext {
            entity,
            position,
            dt: env.dt,
            tuning: &agent.tuning,
            player: env.player,
            arena: &env.level.arena,
            pack: env.pack,
            motion: &*motion,
            steering: env.steering,
            probe: env.probe,
        };
        strategies::decide(archetype, state, &ctx, &mut *rng)
    };

    let speed = desired.speed.clamp(0.0, agent.tuning.max_speed(archetype));
    let mut direction = desired.direction.normalize_or_zero();

    // Stuck detector следующего тика сравнивает фактический шаг с этим
    motion.requested_step = if direction == Vec2::ZERO { 0.0 } else { speed * env.dt };

    if speed <= 0.0 || direction == Vec2::ZERO {
        return AgentTick {
            velocity: Vec2::ZERO,
            displacement: Vec2::ZERO,
            visual: desired.visual,
            escape: None,
            wall_sliding: false,
        };
    }

    let jitter = agent.personality.heading_jitter();
    if jitter > 0.0 {
        direction = Vec2::from_angle(rng.gen_range(-jitter..=jitter)).rotate(direction);
    }

    let mut wall_sliding = false;
    if !desired.bypass_planner {
        let outcome = steering::plan(
            PlannerInput {
                position,
                desired: direction,
                target: desired.target,
                dt: env.dt,
            },
            motion,
            env.probe,
            env.steering,
        );
        if outcome.detour_started {
            crate::log(&format!("{:?}: detour → {:?}", entity, outcome.direction));
        }
        if outcome.detour_cancelled {
            crate::log(&format!("{:?}: detour cancelled, direct path clear", entity));
        }
        if outcome.wall_sliding {
            crate::log(&format!("{:?}: wall slide → {:?}", entity, outcome.direction));
        }
        direction = outcome.direction;
        wall_sliding = outcome.wall_sliding;
    }

    AgentTick {
        velocity: direction.normalize_or_zero() * speed,
        displacement: Vec2::ZERO,
        visual: desired.visual,
        escape: None,
        wall_sliding,
    }
}

/// Система: тик контроллера для всех агентов
#[allow(clippy::too_many_arguments)]
pub fn cobra_controller(
    mut agents: Query<(
        Entity,
        &mut Transform,
        &CobraAgent,
        &Behavior,
        &mut ArchetypeState,
        &mut MotionState,
        &mut SteeringVelocity,
        &mut VisualState,
    )>,
    player: Res<PlayerSnapshot>,
    level: Res<LevelConfig>,
    steering_config: Res<SteeringConfig>,
    probe: Res<ObstacleProbe>,
    pack: Res<PackRegistry>,
    mut rng: ResMut<DeterministicRng>,
    mut escapes: EventWriter<HardEscapeTriggered>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    let env = TickEnv {
        dt,
        player: &player,
        level: &level,
        steering: &steering_config,
        probe: probe.get(),
        pack: &pack,
    };

    for (entity, mut transform, agent, behavior, mut state, mut motion, mut velocity, mut visual) in agents.iter_mut() {
        let position = transform.translation.truncate();
        let tick = tick_agent(
            entity,
            position,
            agent,
            behavior.archetype(),
            &mut state,
            &mut motion,
            &env,
            &mut rng.rng,
        );

        if let Some(outcome) = tick.escape {
            let nudged = level.arena.clamp(position + tick.displacement);
            transform.translation.x = nudged.x;
            transform.translation.y = nudged.y;
            escapes.write(HardEscapeTriggered {
                agent: entity,
                direction: match outcome {
                    EscapeOutcome::Nudged { direction, .. } => Some(direction),
                    EscapeOutcome::Jittered { .. } => None,
                },
            });
        }

        velocity.set(tick.velocity);
        visual.set_if_neq(tick.visual);
    }
}
