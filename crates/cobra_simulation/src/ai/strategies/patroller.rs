//! Patroller - Patrol ↔ Alerted
//!
//! Patrol: циклический обход маршрута мимо planner'а, переход к следующей
//! точке в пределах arrive_radius. Игрок в alert_range → Alerted (погоня
//! на speed × chase_multiplier через planner), вышел из радиуса → Patrol.

use super::{arrival_speed, DesiredMotion, StrategyContext};
use crate::components::{PatrolRoute, PatrollerConfig, VisualState};

pub fn decide(
    config: &PatrollerConfig,
    is_alerted: &mut bool,
    route: &mut PatrolRoute,
    ctx: &StrategyContext,
) -> DesiredMotion {
    let alert_range = config.alert_range * ctx.tuning.alert_range_multiplier;
    let in_range = ctx.player_distance().is_some_and(|d| d <= alert_range);

    if in_range != *is_alerted {
        *is_alerted = in_range;
        crate::log_info(&format!(
            "{:?}: {}",
            ctx.entity,
            if in_range { "Patrol → Alerted" } else { "Alerted → Patrol" }
        ));
    }

    if *is_alerted {
        return DesiredMotion::toward(
            ctx.position,
            ctx.player.position,
            ctx.tuning.speed * config.chase_multiplier,
            VisualState::Alerted,
        );
    }

    let Some(mut waypoint) = route.current() else {
        return DesiredMotion::hold(ctx.position, VisualState::Patrolling);
    };

    if ctx.position.distance(waypoint) <= config.arrive_radius {
        route.advance();
        crate::log(&format!("{:?}: patrol → waypoint {}", ctx.entity, route.index()));
        let Some(next) = route.current() else {
            return DesiredMotion::hold(ctx.position, VisualState::Patrolling);
        };
        waypoint = next;
    }

    let distance = ctx.position.distance(waypoint);
    let speed = arrival_speed(ctx.tuning.speed, distance, ctx.dt);
    DesiredMotion::toward(ctx.position, waypoint, speed, VisualState::Patrolling).bypassing_planner()
}
