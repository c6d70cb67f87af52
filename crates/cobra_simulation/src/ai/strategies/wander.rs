//! Random wander - случайная точка в арене раз в retarget_interval

use bevy::prelude::*;
use rand::Rng;

use super::{arrival_speed, DesiredMotion, StrategyContext};
use crate::components::{VisualState, WanderConfig};
use crate::config::ArenaBounds;

/// Равномерная точка внутри арены
pub fn random_point(arena: &ArenaBounds, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        rng.gen_range(arena.min.x..=arena.max.x),
        rng.gen_range(arena.min.y..=arena.max.y),
    )
}

pub fn decide(
    config: &WanderConfig,
    target: &mut Option<Vec2>,
    retarget_timer: &mut f32,
    ctx: &StrategyContext,
    rng: &mut impl Rng,
) -> DesiredMotion {
    *retarget_timer -= ctx.dt;

    let goal = match *target {
        Some(goal) if *retarget_timer > 0.0 => goal,
        _ => {
            let goal = random_point(ctx.arena, rng);
            *target = Some(goal);
            *retarget_timer = config.retarget_interval;
            crate::log(&format!("{:?}: wander → новая точка {:?}", ctx.entity, goal));
            goal
        }
    };

    let distance = ctx.position.distance(goal);
    if distance <= config.arrive_radius {
        return DesiredMotion::hold(ctx.position, VisualState::Wandering);
    }

    let speed = arrival_speed(ctx.tuning.speed * config.speed_factor, distance, ctx.dt);
    DesiredMotion::toward(ctx.position, goal, speed, VisualState::Wandering)
}
