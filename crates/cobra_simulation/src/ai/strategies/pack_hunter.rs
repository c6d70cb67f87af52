//! Pack hunter - фланговый заход с ближайшим союзником
//!
//! Вектор игрок→союзник отражается через игрока и поворачивается на
//! flanking_angle в сторону агента: союзник давит с одной стороны,
//! агент заходит с противоположной. Нет союзника в coordination_range → Chase.

use bevy::prelude::*;

use super::{chase, DesiredMotion, StrategyContext};
use crate::components::{PackHunterConfig, VisualState};
use crate::config::ArenaBounds;
use crate::steering::rotate_deg;

/// Ближе этого к фланговой точке - идём прямо на игрока
const FLANK_REACHED: f32 = 0.15;

/// Фланговая точка для агента в `agent` при союзнике в `ally`
pub fn flank_target(player: Vec2, ally: Vec2, agent: Vec2, config: &PackHunterConfig, arena: &ArenaBounds) -> Vec2 {
    let to_ally = (ally - player)
        .try_normalize()
        .or_else(|| (player - agent).try_normalize())
        .unwrap_or(Vec2::X);

    // Сторона агента относительно линии игрок→союзник
    let side = if to_ally.perp_dot(agent - player) >= 0.0 { 1.0 } else { -1.0 };
    let flank_dir = rotate_deg(-to_ally, -config.flanking_angle_deg * side);

    arena.clamp(player + flank_dir * config.flank_offset)
}

pub fn decide(config: &PackHunterConfig, is_coordinating: &mut bool, ctx: &StrategyContext) -> DesiredMotion {
    if !ctx.player.active {
        return DesiredMotion::hold(ctx.position, VisualState::Idle);
    }

    let ally = ctx
        .pack
        .nearest_sibling(ctx.entity, ctx.position)
        .filter(|member| member.position.distance(ctx.position) <= config.coordination_range);

    if ally.is_some() != *is_coordinating {
        *is_coordinating = ally.is_some();
        crate::log(&format!(
            "{:?}: pack coordination {}",
            ctx.entity,
            if *is_coordinating { "on" } else { "off" }
        ));
    }

    let Some(ally) = ally else {
        return chase::decide(ctx);
    };

    let flank = flank_target(ctx.player.position, ally.position, ctx.position, config, ctx.arena);
    if ctx.position.distance(flank) <= FLANK_REACHED {
        return DesiredMotion::toward(ctx.position, ctx.player.position, ctx.tuning.speed, VisualState::Flanking);
    }

    DesiredMotion::toward(ctx.position, flank, ctx.tuning.speed, VisualState::Flanking)
}
