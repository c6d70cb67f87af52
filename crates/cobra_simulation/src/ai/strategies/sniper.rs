//! Sniper - держит дистанцию в полосе [preferred_min, preferred_max]
//!
//! В полосе: стрейф перпендикулярно игроку, знак по синусоиде с per-agent
//! фазой. Слишком близко: отход со стрейфом. Слишком далеко: осторожное
//! сближение. Если застряли - повторяем последнее escape направление,
//! но только если оно всё ещё свободно (стены могли оказаться на пути).

use super::{DesiredMotion, StrategyContext};
use crate::components::{SniperConfig, VisualState};

pub fn decide(config: &SniperConfig, phase: f32, clock: &mut f32, ctx: &StrategyContext) -> DesiredMotion {
    *clock += ctx.dt;

    if !ctx.player.active {
        return DesiredMotion::hold(ctx.position, VisualState::Idle);
    }

    if ctx.motion.stuck_timer > ctx.steering.soft_stuck_threshold {
        let clear_escape = ctx.motion.last_escape_direction.filter(|escape| {
            ctx.probe
                .probe(ctx.position, *escape, ctx.steering.look_ahead, ctx.steering.probe_mask)
                .is_none()
        });
        if let Some(escape) = clear_escape {
            return DesiredMotion {
                direction: escape,
                speed: ctx.tuning.speed * config.strafe_speed_factor,
                target: ctx.position + escape * config.preferred_min,
                bypass_planner: false,
                visual: VisualState::Strafing,
            };
        }
    }

    let to_player = ctx.player.position - ctx.position;
    let distance = to_player.length();
    let Some(toward) = to_player.try_normalize() else {
        return DesiredMotion::hold(ctx.position, VisualState::Strafing);
    };

    let wave = (*clock * config.strafe_frequency + phase).sin();
    let strafe = toward.perp() * if wave >= 0.0 { 1.0 } else { -1.0 };

    if distance < config.preferred_min {
        let direction = (-toward + strafe * 0.5).normalize_or_zero();
        DesiredMotion {
            direction,
            speed: ctx.tuning.speed * config.retreat_speed_factor,
            target: ctx.position + direction * config.preferred_min,
            bypass_planner: false,
            visual: VisualState::Retreating,
        }
    } else if distance > config.preferred_max {
        let direction = (toward + strafe * 0.3).normalize_or_zero();
        DesiredMotion {
            direction,
            speed: ctx.tuning.speed * config.approach_speed_factor,
            target: ctx.player.position,
            bypass_planner: false,
            visual: VisualState::Chasing,
        }
    } else {
        DesiredMotion {
            direction: strafe,
            speed: ctx.tuning.speed * config.strafe_speed_factor * (0.5 + 0.5 * wave.abs()),
            target: ctx.position + strafe * config.preferred_min,
            bypass_planner: false,
            visual: VisualState::Strafing,
        }
    }
}
