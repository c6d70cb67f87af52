//! Attack/Intercept - упреждение по скорости игрока
//!
//! Точка перехвата = player + velocity × lookahead × prediction_multiplier,
//! lookahead = min(distance / speed, max_lookahead). Точка клампится в арену.

use bevy::prelude::*;

use super::{DesiredMotion, StrategyContext};
use crate::components::{InterceptConfig, VisualState};

/// Точка перехвата (без учёта препятствий)
pub fn predict_intercept(config: &InterceptConfig, ctx: &StrategyContext) -> Vec2 {
    let distance = ctx.position.distance(ctx.player.position);
    let lookahead = if ctx.tuning.speed > 0.0 {
        (distance / ctx.tuning.speed).min(config.max_lookahead)
    } else {
        config.max_lookahead
    };

    let predicted = ctx.player.position
        + ctx.player.velocity_or_zero() * lookahead * ctx.tuning.prediction_multiplier;
    ctx.arena.clamp(predicted)
}

pub fn decide(config: &InterceptConfig, ctx: &StrategyContext) -> DesiredMotion {
    let Some(distance) = ctx.player_distance() else {
        return DesiredMotion::hold(ctx.position, VisualState::Idle);
    };

    let speed = if distance <= config.close_range {
        ctx.tuning.speed * config.close_boost
    } else {
        ctx.tuning.speed
    };

    let target = predict_intercept(config, ctx);
    DesiredMotion::toward(ctx.position, target, speed, VisualState::Intercepting)
}
