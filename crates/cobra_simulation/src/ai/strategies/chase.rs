//! Chase - прямое преследование на базовой скорости

use super::{DesiredMotion, StrategyContext};
use crate::components::VisualState;

pub fn decide(ctx: &StrategyContext) -> DesiredMotion {
    if !ctx.player.active {
        return DesiredMotion::hold(ctx.position, VisualState::Idle);
    }

    DesiredMotion::toward(ctx.position, ctx.player.position, ctx.tuning.speed, VisualState::Chasing)
}
