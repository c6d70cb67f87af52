//! Ambusher - Hiding ↔ Striking
//!
//! Hiding: медленный синусоидальный дрейф вокруг якоря (мимо planner'а).
//! Игрок вошёл в ambush_range → Striking. Прячемся дольше hide_time →
//! якорь переезжает в случайную точку в relocation_radius.
//!
//! Striking: прямое преследование на strike speed, пока игрок ближе
//! 2 × ambush_range.

use bevy::prelude::*;
use rand::Rng;

use super::{arrival_speed, DesiredMotion, StrategyContext};
use crate::components::{AmbusherConfig, VisualState};

/// Изменяемые поля ArchetypeState::Ambusher
pub struct HideState<'a> {
    pub is_hiding: &'a mut bool,
    pub hide_timer: &'a mut f32,
    pub anchor: &'a mut Vec2,
    pub drift_clock: &'a mut f32,
}

pub fn decide(config: &AmbusherConfig, state: HideState, ctx: &StrategyContext, rng: &mut impl Rng) -> DesiredMotion {
    let ambush_range = config.ambush_range * ctx.tuning.alert_range_multiplier;
    let distance = ctx.player_distance();

    if !*state.is_hiding {
        if distance.is_some_and(|d| d <= 2.0 * ambush_range) {
            return strike(config, ctx);
        }

        *state.is_hiding = true;
        *state.hide_timer = 0.0;
        *state.anchor = ctx.position;
        crate::log_info(&format!("{:?}: Striking → Hiding", ctx.entity));
        return drift(config, &state, ctx);
    }

    // Таймеры двигаем до проверки дистанции: игрок в радиусе в момент t → переход в t
    *state.hide_timer += ctx.dt;
    *state.drift_clock += ctx.dt;

    if let Some(distance) = distance.filter(|d| *d <= ambush_range) {
        *state.is_hiding = false;
        *state.hide_timer = 0.0;
        crate::log_info(&format!(
            "{:?}: Hiding → Striking (distance {:.2})",
            ctx.entity, distance
        ));
        return strike(config, ctx);
    }

    if *state.hide_timer >= config.hide_time {
        *state.anchor = relocate(*state.anchor, config.relocation_radius, ctx, rng);
        *state.hide_timer = 0.0;
        crate::log(&format!("{:?}: ambusher якорь → {:?}", ctx.entity, *state.anchor));
    }

    drift(config, &state, ctx)
}

fn strike(config: &AmbusherConfig, ctx: &StrategyContext) -> DesiredMotion {
    DesiredMotion::toward(
        ctx.position,
        ctx.player.position,
        ctx.tuning.speed * config.strike_speed_factor,
        VisualState::Striking,
    )
}

/// Точка дрейфа вокруг якоря в момент `clock`
pub fn drift_point(config: &AmbusherConfig, anchor: Vec2, clock: f32) -> Vec2 {
    let phase = clock * config.drift_frequency;
    anchor + Vec2::new(phase.sin(), (phase * 0.5).sin()) * config.drift_amplitude
}

fn drift(config: &AmbusherConfig, state: &HideState, ctx: &StrategyContext) -> DesiredMotion {
    let point = ctx.arena.clamp(drift_point(config, *state.anchor, *state.drift_clock));
    let distance = ctx.position.distance(point);
    let speed = arrival_speed(ctx.tuning.speed * config.idle_speed_factor, distance, ctx.dt);

    DesiredMotion::toward(ctx.position, point, speed, VisualState::Hiding).bypassing_planner()
}

fn relocate(anchor: Vec2, radius: f32, ctx: &StrategyContext, rng: &mut impl Rng) -> Vec2 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let reach = rng.gen_range(0.0..=radius.max(0.0));
    ctx.arena.clamp(anchor + Vec2::from_angle(angle) * reach)
}
